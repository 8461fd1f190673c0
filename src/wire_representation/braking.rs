use super::Car;
use crate::geometry::Point;
use crate::types::BrakingPredictable;

/// Number of ticks of coasting the braking point compensates for.
pub const BRAKING_DAMPING: f64 = 0.1;

impl Car {
    /// Aim point that offsets `target` against the current velocity: the car
    /// would coast `speed * damping` on its own, so we aim that much short of
    /// the target. The offset never exceeds the remaining distance to the
    /// target, which keeps the aim point within the disc centred on `target`
    /// passing through the car.
    pub fn braking_point_with(&self, target: Point, damping: f64) -> Point {
        let remaining = (target - self.pos).norm();
        let compensation = (self.speed * damping).clamp_norm(remaining);
        target - compensation
    }
}

impl BrakingPredictable for Car {
    fn braking_point(&self, target: Point) -> Point {
        self.braking_point_with(target, BRAKING_DAMPING)
    }
}
