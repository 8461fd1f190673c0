#![allow(missing_docs)]
//! types to match the race engine wire representation
mod braking;

pub use braking::BRAKING_DAMPING;

use crate::geometry::{distance, Point};
use crate::types::{
    CarId, CheckpointSequencedGame, GameError, OpponentSelectableGame, StartDeterminableGame,
    TeamId,
};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Struct that matches the `shape` object of cars and checkpoints
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

/// Records that a car went through checkpoint `index` at tick `time`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointInfo {
    #[serde(rename = "checkpointIndex")]
    pub index: usize,
    pub time: i64,
}

/// Struct that matches the `car` object from the wire representation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    pub time: i64,
    pub team_id: TeamId,
    pub pos: Point,
    pub speed: Point,
    pub rotation: f64,
    pub mass: f64,
    pub shape: Circle,
    /// most recent pass first
    pub passed_checkpoints: Vec<CheckpointInfo>,
    pub boost_used: bool,
}

impl Car {
    /// the last checkpoint this car went through
    pub fn last_passed_checkpoint(&self) -> Result<&CheckpointInfo, GameError> {
        self.passed_checkpoints
            .first()
            .ok_or(GameError::EmptyCheckpointHistory { car_id: self.id })
    }

    /// index of the checkpoint `offset` steps after the last one passed
    fn checkpoint_index_after(
        &self,
        offset: usize,
        number_of_checkpoints: usize,
    ) -> Result<usize, GameError> {
        if number_of_checkpoints == 0 {
            return Err(GameError::NoCheckpoints);
        }
        let last = self.last_passed_checkpoint()?.index;
        Ok((last + offset) % number_of_checkpoints)
    }

    pub fn next_checkpoint_index(&self, number_of_checkpoints: usize) -> Result<usize, GameError> {
        self.checkpoint_index_after(1, number_of_checkpoints)
    }

    pub fn next_next_checkpoint_index(
        &self,
        number_of_checkpoints: usize,
    ) -> Result<usize, GameError> {
        self.checkpoint_index_after(2, number_of_checkpoints)
    }

    /// Cumulative number of checkpoint passes, laps included. The engine
    /// appends one entry per pass, so this is the length of the history.
    pub fn progress(&self) -> usize {
        self.passed_checkpoints.len()
    }

    /// magnitude of the velocity
    pub fn speed_norm(&self) -> f64 {
        self.speed.norm()
    }
}

/// Struct that matches the `checkpoint` object from the wire representation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub id: i64,
    pub time: i64,
    pub pos: Point,
    pub shape: Circle,
    pub checkpoint_index: usize,
}

/// Root object describing the race at a given tick
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub time: i64,
    #[serde(rename = "maybeStartedTime", default)]
    pub start_time: Option<i64>,
    #[serde(rename = "maybeEndedTime", default)]
    pub end_time: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cars: Vec<Car>,
    /// ordered by `checkpoint_index` on a well formed track, but lookups never rely on it
    #[serde(default, deserialize_with = "null_as_default")]
    pub checkpoints: Vec<Checkpoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crashed_teams: Vec<(TeamId, bool)>,
    pub total_number_of_laps: u32,
}

/// One line of input: the engine clock plus the game snapshot, you probably
/// want to do:
/// ```
/// # use race_game_types::wire_representation::TurnInput;
/// # let line = r#"{"time":3,"gameState":{"time":3,"maybeStartedTime":null,"maybeEndedTime":null,"cars":[],"checkpoints":[],"crashedTeams":[],"totalNumberOfLaps":3}}"#;
/// let input: Result<TurnInput, _> = serde_json::from_str(line);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TurnInput {
    pub time: i64,
    pub game_state: GameState,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GameState {
    pub fn car(&self, car_id: CarId) -> Option<&Car> {
        self.cars.iter().find(|c| c.id == car_id)
    }

    pub fn is_team_crashed(&self, team_id: TeamId) -> bool {
        self.crashed_teams
            .iter()
            .any(|(team, crashed)| *team == team_id && *crashed)
    }

    fn two_opponents(&self, team_id: TeamId) -> Result<(&Car, &Car), GameError> {
        let opponents = self.opponent_cars(team_id);
        match opponents.as_slice() {
            [first, second, ..] => Ok((*first, *second)),
            _ => Err(GameError::NotEnoughOpponents {
                team_id,
                found: opponents.len(),
            }),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {} ({} laps, {} checkpoints)",
            self.time,
            self.total_number_of_laps,
            self.checkpoints.len()
        )?;
        for car in self.cars.iter() {
            write!(
                f,
                " (car {} team {} pos: {} mass: {} passed: {})",
                car.id,
                car.team_id,
                car.pos,
                car.mass,
                car.progress()
            )?;
        }
        Ok(())
    }
}

impl StartDeterminableGame for GameState {
    fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

impl CheckpointSequencedGame for GameState {
    type CarType = Car;
    type CheckpointType = Checkpoint;

    fn number_of_checkpoints(&self) -> usize {
        self.checkpoints.len()
    }

    fn checkpoint_by_index(&self, index: usize) -> Result<&Checkpoint, GameError> {
        self.checkpoints
            .iter()
            .find(|c| c.checkpoint_index == index)
            .ok_or(GameError::MissingCheckpoint { index })
    }

    fn next_checkpoint(&self, car: &Car) -> Result<&Checkpoint, GameError> {
        self.checkpoint_by_index(car.next_checkpoint_index(self.number_of_checkpoints())?)
    }

    fn next_next_checkpoint(&self, car: &Car) -> Result<&Checkpoint, GameError> {
        self.checkpoint_by_index(car.next_next_checkpoint_index(self.number_of_checkpoints())?)
    }

    fn distance_to_next_checkpoint(&self, car: &Car) -> Result<i64, GameError> {
        Ok(distance(car.pos, self.next_checkpoint(car)?.pos))
    }

    fn closest_next_checkpoint(&self, car: &Car) -> Result<&Checkpoint, GameError> {
        let next_index = car.next_checkpoint_index(self.number_of_checkpoints())?;
        let mut closest = self.next_next_checkpoint(car)?;
        let mut closest_distance = distance(car.pos, closest.pos);
        for checkpoint in self
            .checkpoints
            .iter()
            .filter(|c| c.checkpoint_index != next_index)
        {
            let d = distance(car.pos, checkpoint.pos);
            if d < closest_distance {
                closest = checkpoint;
                closest_distance = d;
            }
        }
        Ok(closest)
    }
}

impl OpponentSelectableGame for GameState {
    type CarType = Car;

    fn team_cars(&self, team_id: TeamId) -> Vec<&Car> {
        self.cars.iter().filter(|c| c.team_id == team_id).collect_vec()
    }

    fn opponent_cars(&self, team_id: TeamId) -> Vec<&Car> {
        self.cars.iter().filter(|c| c.team_id != team_id).collect_vec()
    }

    fn lightest_opponent(&self, team_id: TeamId) -> Result<&Car, GameError> {
        let (first, second) = self.two_opponents(team_id)?;
        Ok(if first.mass < second.mass { first } else { second })
    }

    fn heaviest_opponent(&self, team_id: TeamId) -> Result<&Car, GameError> {
        let (first, second) = self.two_opponents(team_id)?;
        Ok(if second.mass > first.mass { second } else { first })
    }

    fn most_advanced_opponent(&self, team_id: TeamId) -> Result<&Car, GameError> {
        let (first, second) = self.two_opponents(team_id)?;
        let ahead = match first.progress().cmp(&second.progress()) {
            Ordering::Greater => first,
            Ordering::Less => second,
            Ordering::Equal => {
                // whoever reached the shared checkpoint count first is ahead
                let first_time = first.last_passed_checkpoint().map(|c| c.time).ok();
                let second_time = second.last_passed_checkpoint().map(|c| c.time).ok();
                match (first_time, second_time) {
                    (Some(a), Some(b)) if b < a => second,
                    _ => first,
                }
            }
        };
        Ok(ahead)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_fixture;

    fn fixture() -> GameState {
        game_fixture(include_str!("../../fixtures/running_race.json")).game_state
    }

    fn car(g: &GameState, id: CarId) -> Car {
        g.car(id).expect("fixture car").clone()
    }

    #[test]
    fn test_turn_input_decodes() {
        let input = game_fixture(include_str!("../../fixtures/running_race.json"));
        assert_eq!(input.time, 50);
        let g = input.game_state;
        assert!(g.is_started());
        assert!(!g.is_ended());
        assert_eq!(g.number_of_checkpoints(), 4);
        assert_eq!(g.total_number_of_laps, 3);
        assert_eq!(g.cars.iter().map(|c| c.id).collect_vec(), vec![1, 2, 3, 4]);
        let car3 = car(&g, 3);
        assert_eq!(car3.team_id, 1);
        assert_eq!(car3.passed_checkpoints[0], CheckpointInfo { index: 3, time: 40 });
        assert_eq!(car3.shape, Circle { radius: 20.0 });
    }

    #[test]
    fn test_not_started_fixture() {
        let g = game_fixture(include_str!("../../fixtures/race_not_started.json")).game_state;
        assert!(!g.is_started());
        assert_eq!(g.start_time, None);
        assert!(g.cars.iter().all(|c| !c.boost_used));
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let g: GameState = serde_json::from_str(
            r#"{"time":0,"maybeStartedTime":null,"cars":null,"checkpoints":null,"crashedTeams":null,"totalNumberOfLaps":2}"#,
        )
        .unwrap();
        assert!(g.cars.is_empty());
        assert!(g.checkpoints.is_empty());
        assert!(g.crashed_teams.is_empty());
        assert_eq!(g.end_time, None);
    }

    #[test]
    fn test_crashed_teams() {
        let mut g = fixture();
        g.crashed_teams = vec![(0, false), (1, true)];
        assert!(!g.is_team_crashed(0));
        assert!(g.is_team_crashed(1));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result: Result<GameState, _> =
            serde_json::from_str(r#"{"time":0,"cars":[],"checkpoints":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_next_checkpoint_indices_wrap() {
        let g = fixture();
        let n = g.number_of_checkpoints();
        for (id, last) in [(1, 0), (3, 3), (4, 1)] {
            let c = car(&g, id);
            assert_eq!(c.passed_checkpoints[0].index, last);
            assert_eq!(c.next_checkpoint_index(n).unwrap(), (last + 1) % n);
            assert_eq!(c.next_next_checkpoint_index(n).unwrap(), (last + 2) % n);
        }
        let c = car(&g, 3);
        assert_eq!(g.next_checkpoint(&c).unwrap().checkpoint_index, 0);
        assert_eq!(g.next_next_checkpoint(&c).unwrap().checkpoint_index, 1);
    }

    #[test]
    fn test_empty_history_fails() {
        let g = fixture();
        let mut c = car(&g, 1);
        c.passed_checkpoints.clear();
        assert_eq!(
            g.next_checkpoint(&c),
            Err(GameError::EmptyCheckpointHistory { car_id: 1 })
        );
    }

    #[test]
    fn test_missing_checkpoint_fails() {
        let mut g = fixture();
        g.checkpoints.retain(|c| c.checkpoint_index != 1);
        // three checkpoints left, car 1 passed index 0 so it looks for index 1
        let c = car(&g, 1);
        assert_eq!(
            g.next_checkpoint(&c),
            Err(GameError::MissingCheckpoint { index: 1 })
        );
    }

    #[test]
    fn test_no_checkpoints_fails() {
        let mut g = fixture();
        g.checkpoints.clear();
        let c = car(&g, 1);
        assert_eq!(g.next_checkpoint(&c), Err(GameError::NoCheckpoints));
    }

    #[test]
    fn test_distance_to_next_checkpoint() {
        let g = fixture();
        // car 1 sits at (800, 0), checkpoint 1 is at (1000, 0)
        assert_eq!(g.distance_to_next_checkpoint(&car(&g, 1)).unwrap(), 200);
    }

    #[test]
    fn test_closest_next_checkpoint_skips_next() {
        let g = fixture();
        let mut c = car(&g, 1);
        // right on top of the next checkpoint (index 1), it must not be chosen
        c.pos = Point::new(1000.0, 0.0);
        let closest = g.closest_next_checkpoint(&c).unwrap();
        assert_ne!(closest.checkpoint_index, 1);
        // (1000, 1000) and (0, 0) are both 1000 away, the seed (index 2) wins the tie
        assert_eq!(closest.checkpoint_index, 2);

        c.pos = Point::new(100.0, 100.0);
        assert_eq!(g.closest_next_checkpoint(&c).unwrap().checkpoint_index, 0);
    }

    #[test]
    fn test_opponent_cars_keep_order() {
        let g = fixture();
        assert_eq!(
            g.opponent_cars(0).iter().map(|c| c.id).collect_vec(),
            vec![3, 4]
        );
        assert_eq!(g.team_cars(0).iter().map(|c| c.id).collect_vec(), vec![1, 2]);
    }

    #[test]
    fn test_lightest_and_heaviest() {
        let mut g = fixture();
        assert_eq!(g.lightest_opponent(0).unwrap().id, 3);
        assert_eq!(g.heaviest_opponent(0).unwrap().id, 4);
        assert_eq!(g.lightest_opponent(1).unwrap().id, 1);
        assert_eq!(g.heaviest_opponent(1).unwrap().id, 2);

        for c in g.cars.iter_mut() {
            c.mass = 10.0;
        }
        assert_eq!(g.lightest_opponent(0).unwrap().id, 4);
        assert_eq!(g.heaviest_opponent(0).unwrap().id, 3);
    }

    #[test]
    fn test_opponent_selection_needs_two_opponents() {
        let mut g = fixture();
        g.cars.retain(|c| c.id != 4);
        let expected = Err(GameError::NotEnoughOpponents {
            team_id: 0,
            found: 1,
        });
        assert_eq!(g.lightest_opponent(0).map(|c| c.id), expected);
        assert_eq!(g.heaviest_opponent(0).map(|c| c.id), expected);
        assert_eq!(g.most_advanced_opponent(0).map(|c| c.id), expected);
    }

    #[test]
    fn test_most_advanced_opponent() {
        let mut g = fixture();
        assert_eq!(g.most_advanced_opponent(0).unwrap().id, 3);

        // car 4 catches up in pass count but reached it later
        let c4 = g.cars.iter_mut().find(|c| c.id == 4).unwrap();
        c4.passed_checkpoints = vec![
            CheckpointInfo { index: 3, time: 45 },
            CheckpointInfo { index: 2, time: 35 },
            CheckpointInfo { index: 1, time: 25 },
            CheckpointInfo { index: 0, time: 0 },
        ];
        assert_eq!(g.most_advanced_opponent(0).unwrap().id, 3);

        // a completed lap counts cumulatively, not modulo the track
        let c4 = g.cars.iter_mut().find(|c| c.id == 4).unwrap();
        c4.passed_checkpoints.insert(0, CheckpointInfo { index: 0, time: 48 });
        assert_eq!(c4.passed_checkpoints[0].index, 0);
        assert_eq!(g.most_advanced_opponent(0).unwrap().id, 4);
    }

    #[test]
    fn test_most_advanced_tie_on_time_keeps_first() {
        let mut g = fixture();
        let history = vec![
            CheckpointInfo { index: 1, time: 20 },
            CheckpointInfo { index: 0, time: 0 },
        ];
        for c in g.cars.iter_mut() {
            c.passed_checkpoints = history.clone();
        }
        assert_eq!(g.most_advanced_opponent(0).unwrap().id, 3);
        assert_eq!(g.most_advanced_opponent(1).unwrap().id, 1);
    }

    #[test]
    fn test_display() {
        let g = fixture();
        let rendered = g.to_string();
        assert!(rendered.starts_with("tick 50 (3 laps, 4 checkpoints)"));
        assert!(rendered.contains("(car 3 team 1"));
    }
}
