//! The per-turn decision: one order for the whole team out of one snapshot.
//!
//! Before the start the only thing a team can do is split its mass budget.
//! Once running, each car plays a [`Role`]: the racer chases its own next
//! checkpoint, the interceptor goes after an opponent. Every threshold lives
//! in [`PolicyConfig`] so that the tuned variants are presets rather than
//! separate code paths.
mod config;

pub use config::{ConfigError, InterceptTarget, PolicyConfig, Role, Steering, PRESET_NAMES};

use crate::geometry::{distance, Point};
use crate::logger::Logger;
use crate::orders::{PlayerOrder, Power};
use crate::types::{
    CheckpointSequencedGame, GameError, OpponentSelectableGame, StartDeterminableGame, TeamId,
};
use crate::wire_representation::{Car, GameState};
use tracing::instrument;

/// Something that turns a game snapshot into the order of a team
pub trait TurnPolicy: std::fmt::Debug {
    /// Decide the order for this turn. `time` is the engine clock sent with
    /// the snapshot. Diagnostics go to `log`, which the caller folds into the
    /// final order. Errors only come from snapshots breaking the game contract.
    fn decide(
        &self,
        state: &GameState,
        time: i64,
        log: &mut Logger,
    ) -> Result<PlayerOrder, GameError>;

    /// the team this policy plays for
    fn team_id(&self) -> TeamId;
}

/// The reference policy, parameterized by a [`PolicyConfig`]
#[derive(Debug, Clone)]
pub struct RacePolicy {
    team_id: TeamId,
    config: PolicyConfig,
}

impl RacePolicy {
    #[allow(missing_docs)]
    pub fn new(team_id: TeamId, config: PolicyConfig) -> Self {
        RacePolicy { team_id, config }
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    fn order_for(
        &self,
        role: Role,
        car: &Car,
        state: &GameState,
        log: &mut Logger,
    ) -> Result<PlayerOrder, GameError> {
        match role {
            Role::Racer => self.racer(car, state, log),
            Role::Interceptor => self.interceptor(car, state, log),
        }
    }

    fn racer(
        &self,
        car: &Car,
        state: &GameState,
        log: &mut Logger,
    ) -> Result<PlayerOrder, GameError> {
        let config = &self.config;
        let checkpoint = state.next_checkpoint(car)?;
        let remaining = distance(car.pos, checkpoint.pos);

        if !car.boost_used
            && car.passed_checkpoints.len() >= config.boost_min_passed_checkpoints
            && remaining >= config.boost_min_distance
        {
            log.info(format!(
                "car {} boosts towards checkpoint {} ({} away)",
                car.id, checkpoint.checkpoint_index, remaining
            ));
            return Ok(PlayerOrder::use_boost(car.id, self.team_id));
        }

        if remaining < config.braking_distance && car.speed_norm() > config.braking_speed {
            let aim = car.braking_point_with(checkpoint.pos, config.braking_damping);
            return Ok(self.steer(car, aim, config.braking_power));
        }

        Ok(self.steer(car, checkpoint.pos, config.cruise_power))
    }

    fn interceptor(
        &self,
        car: &Car,
        state: &GameState,
        log: &mut Logger,
    ) -> Result<PlayerOrder, GameError> {
        let config = &self.config;
        let opponent = match config.intercept_target {
            InterceptTarget::MostAdvanced => state.most_advanced_opponent(self.team_id)?,
            InterceptTarget::Lightest => state.lightest_opponent(self.team_id)?,
            InterceptTarget::Heaviest => state.heaviest_opponent(self.team_id)?,
        };
        let checkpoint = state.next_checkpoint(opponent)?;
        log.info(format!(
            "car {} tracks car {} (mass {}) heading to checkpoint {}",
            car.id, opponent.id, opponent.mass, checkpoint.checkpoint_index
        ));

        // we get there first: sit on the checkpoint
        if distance(car.pos, checkpoint.pos) < distance(opponent.pos, checkpoint.pos) {
            return Ok(self.steer(car, checkpoint.pos, config.cruise_power));
        }

        let gap = distance(car.pos, opponent.pos);
        if gap < config.ram_distance {
            let too_fast = car.speed_norm() > config.braking_speed;
            let aim = if gap < config.ram_braking_distance && too_fast {
                car.braking_point_with(opponent.pos, config.braking_damping)
            } else {
                opponent.pos
            };
            return Ok(self.steer(car, aim, config.cruise_power));
        }

        let target = if config.pursue_lookahead {
            state.closest_next_checkpoint(opponent)?
        } else {
            checkpoint
        };
        Ok(self.steer(car, target.pos, config.cruise_power))
    }

    fn steer(&self, car: &Car, aim: Point, power: Power) -> PlayerOrder {
        match self.config.steering {
            Steering::ForceTowards => PlayerOrder::ForceTowards {
                car_id: car.id,
                team_id: self.team_id,
                target_position: aim,
                power,
            },
            Steering::ApplyForce => {
                PlayerOrder::apply_force_towards(car.id, self.team_id, car.pos, aim, power)
            }
        }
    }
}

impl TurnPolicy for RacePolicy {
    #[instrument(level = "trace", skip_all, fields(team_id = self.team_id, time = time))]
    fn decide(
        &self,
        state: &GameState,
        time: i64,
        log: &mut Logger,
    ) -> Result<PlayerOrder, GameError> {
        let (car1, car2) = match state.team_cars(self.team_id).as_slice() {
            [car1, car2] => (*car1, *car2),
            cars => {
                return Err(GameError::TeamCarCount {
                    team_id: self.team_id,
                    found: cars.len(),
                })
            }
        };

        if !state.is_started() {
            return Ok(PlayerOrder::set_car_masses(
                self.team_id,
                car1.id,
                car2.id,
                self.config.car1_mass,
                self.config.car2_mass,
            ));
        }

        let car1_order = self.order_for(self.config.car1_role, car1, state, log)?;
        let car2_order = self.order_for(self.config.car2_role, car2, state, log)?;
        Ok(PlayerOrder::for_each_car(car1_order, car2_order))
    }

    fn team_id(&self) -> TeamId {
        self.team_id
    }
}
