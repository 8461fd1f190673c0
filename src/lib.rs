#![deny(missing_debug_implementations, missing_docs)]
#![warn(missing_copy_implementations)]
//! Types for playing the b12 two-team car race.
//! The engine sends a full snapshot of the race every turn, one JSON object per
//! line, and expects exactly one order back before its deadline. This crate
//! provides the wire model of that snapshot, the queries a bot needs on top of
//! it (checkpoint sequencing, braking points, opponent selection), the order
//! encoding, and a configurable reference policy with its turn loop.
//!
//! ```
//! use race_game_types::geometry::Point;
//! use race_game_types::logger::Logger;
//! use race_game_types::orders::PlayerOrder;
//!
//! let mut log = Logger::new();
//! log.info("heading to checkpoint 1");
//! let order = PlayerOrder::force_towards(1, 0, Point::new(10.0, 10.0), 100).unwrap();
//! let encoded = serde_json::to_string(&log.into_order(order)).unwrap();
//! assert!(encoded.starts_with(r#"{"type":"com.b12.gamerunning.PlayerOrder$LoggingOrder""#));
//! ```

use wire_representation::TurnInput;

pub mod geometry;
pub mod logger;
pub mod orders;
pub mod policy;
pub mod runner;
pub mod types;
pub mod wire_representation;

/// Loads a fixture from a given string
pub fn game_fixture(game_fixture: &str) -> TurnInput {
    let g: Result<TurnInput, _> = serde_json::from_str(game_fixture);
    g.expect("the json literal is valid")
}
