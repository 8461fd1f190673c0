//! various types and query traits that are useful for deciding a turn
use crate::geometry::Point;
use std::error::Error;
use std::fmt;

/// identifier of a car, stable across the turns of one match
pub type CarId = i64;

/// identifier of a team (each team controls exactly two cars)
pub type TeamId = i64;

/// Violations of the snapshot contract the engine is expected to uphold:
/// dense checkpoint indices, a non-empty pass history for every car and
/// exactly two cars per team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// the snapshot carries no checkpoint at all
    NoCheckpoints,
    /// no checkpoint in the snapshot has this index
    MissingCheckpoint {
        #[allow(missing_docs)]
        index: usize,
    },
    /// the car has never passed a checkpoint, not even the start one
    EmptyCheckpointHistory {
        #[allow(missing_docs)]
        car_id: CarId,
    },
    /// opponent selection needs both opposing cars
    NotEnoughOpponents {
        /// the team asking
        team_id: TeamId,
        /// how many opposing cars were found
        found: usize,
    },
    /// a team must control exactly two cars
    TeamCarCount {
        #[allow(missing_docs)]
        team_id: TeamId,
        #[allow(missing_docs)]
        found: usize,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NoCheckpoints => write!(f, "game state has no checkpoints"),
            GameError::MissingCheckpoint { index } => {
                write!(f, "no checkpoint with index {}", index)
            }
            GameError::EmptyCheckpointHistory { car_id } => {
                write!(f, "car {} has no passed checkpoints", car_id)
            }
            GameError::NotEnoughOpponents { team_id, found } => write!(
                f,
                "team {} expects two opponent cars, found {}",
                team_id, found
            ),
            GameError::TeamCarCount { team_id, found } => {
                write!(f, "team {} expects two cars, found {}", team_id, found)
            }
        }
    }
}

impl Error for GameError {}

/// A game for which the race phase can be determined
pub trait StartDeterminableGame {
    /// has the race started? Masses can only be set before this is true.
    fn is_started(&self) -> bool;

    /// has the race ended?
    fn is_ended(&self) -> bool;
}

/// A game whose cars go through an ordered loop of checkpoints
pub trait CheckpointSequencedGame {
    #[allow(missing_docs)]
    type CarType;
    #[allow(missing_docs)]
    type CheckpointType;

    /// number of checkpoints on the track
    fn number_of_checkpoints(&self) -> usize;

    /// find the checkpoint carrying a given index
    fn checkpoint_by_index(&self, index: usize) -> Result<&Self::CheckpointType, GameError>;

    /// the checkpoint a car has to pass next
    fn next_checkpoint(&self, car: &Self::CarType) -> Result<&Self::CheckpointType, GameError>;

    /// the checkpoint after the next one
    fn next_next_checkpoint(&self, car: &Self::CarType)
        -> Result<&Self::CheckpointType, GameError>;

    /// truncated distance between the car and its next checkpoint
    fn distance_to_next_checkpoint(&self, car: &Self::CarType) -> Result<i64, GameError>;

    /// the checkpoint closest to the car, its immediate next one excluded
    fn closest_next_checkpoint(&self, car: &Self::CarType)
        -> Result<&Self::CheckpointType, GameError>;
}

/// A game where the cars of a team and of its opponents can be singled out.
/// All methods take the id of the team asking, never the opposing one.
pub trait OpponentSelectableGame {
    #[allow(missing_docs)]
    type CarType;

    /// the cars controlled by `team_id`, in snapshot order
    fn team_cars(&self, team_id: TeamId) -> Vec<&Self::CarType>;

    /// the cars not controlled by `team_id`, in snapshot order
    fn opponent_cars(&self, team_id: TeamId) -> Vec<&Self::CarType>;

    /// the lighter of the two opponents; on equal mass the second one
    fn lightest_opponent(&self, team_id: TeamId) -> Result<&Self::CarType, GameError>;

    /// the heavier of the two opponents; on equal mass the first one
    fn heaviest_opponent(&self, team_id: TeamId) -> Result<&Self::CarType, GameError>;

    /// the opponent that went through the most checkpoints
    fn most_advanced_opponent(&self, team_id: TeamId) -> Result<&Self::CarType, GameError>;
}

/// A car whose next move can be corrected for its momentum
pub trait BrakingPredictable {
    /// where to aim so that a force issued now decelerates the car into
    /// `target` instead of overshooting it
    fn braking_point(&self, target: Point) -> Point;
}
