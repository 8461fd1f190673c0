//! the closed set of orders a team can send back to the engine, and their wire encoding
use crate::geometry::{angle_to, Point};
use crate::types::{CarId, TeamId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Error raised when building an order from invalid arguments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderError {
    /// the engine only accepts integral power values
    NonIntegralPower(f64),
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::NonIntegralPower(p) => write!(f, "power must be integer, got {}", p),
        }
    }
}

impl Error for OrderError {}

/// Engine power applied by a force order. Only integral values exist, so
/// converting from a float fails for anything with a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Power(i32);

impl Power {
    /// full throttle
    pub const FULL: Power = Power(100);

    #[allow(missing_docs)]
    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Power {
    type Error = OrderError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(Power(value))
    }
}

impl TryFrom<f64> for Power {
    type Error = OrderError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
        if value.fract() == 0.0 && in_range {
            Ok(Power(value as i32))
        } else {
            Err(OrderError::NonIntegralPower(value))
        }
    }
}

/// Severity of a diagnostic line attached to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    #[allow(missing_docs)]
    Info,
    #[allow(missing_docs)]
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// An order for the engine. Encodes as `{"type": "<qualified name>", "info": {...}}`;
/// nested orders are encoded the same way in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "info")]
pub enum PlayerOrder {
    /// do nothing this turn
    #[serde(rename = "com.b12.gamerunning.PlayerOrder$Pass", rename_all = "camelCase")]
    Pass {
        #[allow(missing_docs)]
        team_id: TeamId,
    },
    /// push a car in the direction given by `angle`, in radians
    #[serde(
        rename = "com.b12.gamerunning.PlayerOrder$ApplyForce",
        rename_all = "camelCase"
    )]
    ApplyForce {
        #[allow(missing_docs)]
        car_id: CarId,
        #[allow(missing_docs)]
        team_id: TeamId,
        #[serde(rename = "forceAngle")]
        #[allow(missing_docs)]
        angle: f64,
        #[allow(missing_docs)]
        power: Power,
    },
    /// push a car towards a position
    #[serde(
        rename = "com.b12.gamerunning.PlayerOrder$ForceTowards",
        rename_all = "camelCase"
    )]
    ForceTowards {
        #[allow(missing_docs)]
        car_id: CarId,
        #[allow(missing_docs)]
        team_id: TeamId,
        #[allow(missing_docs)]
        target_position: Point,
        #[allow(missing_docs)]
        power: Power,
    },
    /// spend the single boost of a car
    #[serde(
        rename = "com.b12.gamerunning.PlayerOrder$UseBoost",
        rename_all = "camelCase"
    )]
    UseBoost {
        #[allow(missing_docs)]
        car_id: CarId,
        #[allow(missing_docs)]
        team_id: TeamId,
    },
    /// give up, telling the engine why
    #[serde(rename = "com.b12.gamerunning.PlayerOrder$Crash", rename_all = "camelCase")]
    Crash {
        #[allow(missing_docs)]
        team_id: TeamId,
        #[allow(missing_docs)]
        reason: String,
    },
    /// split the team mass budget between the two cars, only accepted before the start
    #[serde(
        rename = "com.b12.gamerunning.PlayerOrder$SetCarMasses",
        rename_all = "camelCase"
    )]
    SetCarMasses {
        #[allow(missing_docs)]
        team_id: TeamId,
        #[serde(rename = "car1Id")]
        #[allow(missing_docs)]
        car1_id: CarId,
        #[serde(rename = "car1Mass")]
        #[allow(missing_docs)]
        car1_mass: i32,
        #[serde(rename = "car2Id")]
        #[allow(missing_docs)]
        car2_id: CarId,
        #[serde(rename = "car2Mass")]
        #[allow(missing_docs)]
        car2_mass: i32,
    },
    /// one order for each of the two cars of the team
    #[serde(rename = "com.b12.gamerunning.PlayerOrder$OrderForEachCar")]
    OrderForEachCar {
        #[serde(rename = "car1Order")]
        #[allow(missing_docs)]
        car1_order: Box<PlayerOrder>,
        #[serde(rename = "car2Order")]
        #[allow(missing_docs)]
        car2_order: Box<PlayerOrder>,
    },
    /// wraps an order with one diagnostic line
    #[serde(
        rename = "com.b12.gamerunning.PlayerOrder$LoggingOrder",
        rename_all = "camelCase"
    )]
    LoggingOrder {
        #[allow(missing_docs)]
        message: String,
        #[allow(missing_docs)]
        log_level: LogLevel,
        #[allow(missing_docs)]
        order: Box<PlayerOrder>,
    },
}

impl PlayerOrder {
    /// build an apply-force order, failing on a non-integral power
    pub fn apply_force<P>(
        car_id: CarId,
        team_id: TeamId,
        angle: f64,
        power: P,
    ) -> Result<Self, OrderError>
    where
        P: TryInto<Power, Error = OrderError>,
    {
        Ok(PlayerOrder::ApplyForce {
            car_id,
            team_id,
            angle,
            power: power.try_into()?,
        })
    }

    /// build a force-towards order, failing on a non-integral power
    pub fn force_towards<P>(
        car_id: CarId,
        team_id: TeamId,
        target_position: Point,
        power: P,
    ) -> Result<Self, OrderError>
    where
        P: TryInto<Power, Error = OrderError>,
    {
        Ok(PlayerOrder::ForceTowards {
            car_id,
            team_id,
            target_position,
            power: power.try_into()?,
        })
    }

    /// an apply-force order equivalent to pushing a car at `from` towards `to`
    pub fn apply_force_towards(
        car_id: CarId,
        team_id: TeamId,
        from: Point,
        to: Point,
        power: Power,
    ) -> Self {
        PlayerOrder::ApplyForce {
            car_id,
            team_id,
            angle: angle_to(from, to),
            power,
        }
    }

    #[allow(missing_docs)]
    pub fn use_boost(car_id: CarId, team_id: TeamId) -> Self {
        PlayerOrder::UseBoost { car_id, team_id }
    }

    #[allow(missing_docs)]
    pub fn pass(team_id: TeamId) -> Self {
        PlayerOrder::Pass { team_id }
    }

    #[allow(missing_docs)]
    pub fn crash(team_id: TeamId, reason: impl Into<String>) -> Self {
        PlayerOrder::Crash {
            team_id,
            reason: reason.into(),
        }
    }

    #[allow(missing_docs)]
    pub fn set_car_masses(
        team_id: TeamId,
        car1_id: CarId,
        car2_id: CarId,
        car1_mass: i32,
        car2_mass: i32,
    ) -> Self {
        PlayerOrder::SetCarMasses {
            team_id,
            car1_id,
            car1_mass,
            car2_id,
            car2_mass,
        }
    }

    #[allow(missing_docs)]
    pub fn for_each_car(car1_order: PlayerOrder, car2_order: PlayerOrder) -> Self {
        PlayerOrder::OrderForEachCar {
            car1_order: Box::new(car1_order),
            car2_order: Box::new(car2_order),
        }
    }

    /// wrap `self` in one diagnostic line
    pub fn logged(self, message: impl Into<String>, log_level: LogLevel) -> Self {
        PlayerOrder::LoggingOrder {
            message: message.into(),
            log_level,
            order: Box::new(self),
        }
    }

    /// the order under every logging wrapper
    pub fn unwrap_logging(&self) -> &PlayerOrder {
        let mut order = self;
        while let PlayerOrder::LoggingOrder { order: inner, .. } = order {
            order = inner;
        }
        order
    }

    /// short variant name, as used in the qualified type name
    pub fn variant_name(&self) -> &'static str {
        match self {
            PlayerOrder::Pass { .. } => "Pass",
            PlayerOrder::ApplyForce { .. } => "ApplyForce",
            PlayerOrder::ForceTowards { .. } => "ForceTowards",
            PlayerOrder::UseBoost { .. } => "UseBoost",
            PlayerOrder::Crash { .. } => "Crash",
            PlayerOrder::SetCarMasses { .. } => "SetCarMasses",
            PlayerOrder::OrderForEachCar { .. } => "OrderForEachCar",
            PlayerOrder::LoggingOrder { .. } => "LoggingOrder",
        }
    }
}

impl fmt::Display for PlayerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerOrder::Pass { team_id } => write!(f, "pass (team {})", team_id),
            PlayerOrder::ApplyForce {
                car_id,
                angle,
                power,
                ..
            } => write!(f, "car {} force {:.3} rad at {}", car_id, angle, power.value()),
            PlayerOrder::ForceTowards {
                car_id,
                target_position,
                power,
                ..
            } => write!(
                f,
                "car {} towards {} at {}",
                car_id,
                target_position,
                power.value()
            ),
            PlayerOrder::UseBoost { car_id, .. } => write!(f, "car {} boost", car_id),
            PlayerOrder::Crash { team_id, reason } => {
                write!(f, "crash (team {}): {}", team_id, reason)
            }
            PlayerOrder::SetCarMasses {
                car1_id,
                car1_mass,
                car2_id,
                car2_mass,
                ..
            } => write!(
                f,
                "masses car {}={} car {}={}",
                car1_id, car1_mass, car2_id, car2_mass
            ),
            PlayerOrder::OrderForEachCar {
                car1_order,
                car2_order,
            } => write!(f, "[{}] [{}]", car1_order, car2_order),
            PlayerOrder::LoggingOrder { order, .. } => write!(f, "{}", order),
        }
    }
}
