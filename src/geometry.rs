//! 2-D point math shared by the model, the queries and the policy
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A point (or vector) on the race plane. The wire encodes it as the real and
/// imaginary part of a complex number.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// horizontal component
    pub re: f64,
    /// vertical component
    pub im: f64,
}

impl Point {
    /// build a point from its two components
    pub const fn new(re: f64, im: f64) -> Self {
        Point { re, im }
    }

    /// the origin, also the velocity of a car at rest
    pub const ZERO: Point = Point { re: 0.0, im: 0.0 };

    /// euclidean length of this vector
    pub fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// dot product with another vector
    pub fn dot(&self, other: Point) -> f64 {
        self.re * other.re + self.im * other.im
    }

    /// returns this vector scaled down so that its length is at most `max_len`
    pub fn clamp_norm(self, max_len: f64) -> Point {
        let len = self.norm();
        if len <= max_len || len == 0.0 {
            self
        } else {
            self * (max_len / len)
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.re, -self.im)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.re * rhs, self.im * rhs)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.re, self.im)
    }
}

/// Euclidean distance between two points, truncated toward zero.
///
/// Every threshold check in the policy compares against this truncated value,
/// so `distance(a, b) < 30` holds for a true distance of 30.9.
pub fn distance(a: Point, b: Point) -> i64 {
    (a - b).norm() as i64
}

/// angle in radians of the direction going from `from` to `to`, as expected by
/// the `forceAngle` field of an apply-force order
pub fn angle_to(from: Point, to: Point) -> f64 {
    let d = to - from;
    d.im.atan2(d.re)
}
