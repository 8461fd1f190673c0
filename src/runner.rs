//! The turn loop: one JSON snapshot per input line, one JSON order per output line
use crate::logger::Logger;
use crate::orders::PlayerOrder;
use crate::policy::TurnPolicy;
use crate::types::GameError;
use crate::wire_representation::TurnInput;
use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing::{debug, error, info};

/// Errors that end the turn loop
#[derive(Debug)]
pub enum RunnerError {
    /// reading stdin or writing stdout failed
    Io(io::Error),
    /// an input line is not a valid snapshot
    Protocol(serde_json::Error),
    /// an order could not be encoded
    Encode(serde_json::Error),
    /// the snapshot broke the game contract; a crash order was sent before giving up
    Policy(GameError),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Io(e) => write!(f, "i/o error: {}", e),
            RunnerError::Protocol(e) => write!(f, "malformed game state: {}", e),
            RunnerError::Encode(e) => write!(f, "cannot encode order: {}", e),
            RunnerError::Policy(e) => write!(f, "invalid game state: {}", e),
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunnerError::Io(e) => Some(e),
            RunnerError::Protocol(e) | RunnerError::Encode(e) => Some(e),
            RunnerError::Policy(e) => Some(e),
        }
    }
}

impl From<io::Error> for RunnerError {
    fn from(e: io::Error) -> Self {
        RunnerError::Io(e)
    }
}

/// Drives a [`TurnPolicy`] over a line based transport
#[derive(Debug)]
pub struct Runner<P> {
    policy: P,
}

impl<P: TurnPolicy> Runner<P> {
    #[allow(missing_docs)]
    pub fn new(policy: P) -> Self {
        Runner { policy }
    }

    /// Decide one turn out of one input line and return the encoded order,
    /// without the trailing newline.
    pub fn step(&self, line: &str) -> Result<String, RunnerError> {
        let input: TurnInput = serde_json::from_str(line).map_err(RunnerError::Protocol)?;
        let mut log = Logger::new();
        let started = Instant::now();
        let order = self
            .policy
            .decide(&input.game_state, input.time, &mut log)
            .map_err(RunnerError::Policy)?;
        debug!(
            time = input.time,
            elapsed_us = started.elapsed().as_micros() as u64,
            "decided turn"
        );
        serde_json::to_string(&log.into_order(order)).map_err(RunnerError::Encode)
    }

    /// Play turns until `input` is exhausted, flushing after every order. A
    /// snapshot breaking the game contract is answered with a crash order
    /// before the loop gives up.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> Result<(), RunnerError> {
        info!(team_id = self.policy.team_id(), "waiting for game states");
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.step(&line) {
                Ok(order) => {
                    writeln!(output, "{}", order)?;
                    output.flush()?;
                }
                Err(e) => {
                    error!(error = %e, "giving up");
                    if let RunnerError::Policy(reason) = &e {
                        let crash = PlayerOrder::crash(self.policy.team_id(), reason.to_string());
                        let crash = serde_json::to_string(&crash).map_err(RunnerError::Encode)?;
                        writeln!(output, "{}", crash)?;
                        output.flush()?;
                    }
                    return Err(e);
                }
            }
        }
        info!("input closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyConfig, RacePolicy};
    use serde_json::Value;

    fn runner(team_id: i64) -> Runner<RacePolicy> {
        Runner::new(RacePolicy::new(team_id, PolicyConfig::default()))
    }

    fn one_line(json: &str) -> String {
        serde_json::to_string(&serde_json::from_str::<Value>(json).unwrap()).unwrap()
    }

    #[test]
    fn test_step_before_start() {
        let line = one_line(include_str!("../fixtures/race_not_started.json"));
        let encoded = runner(0).step(&line).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["type"], "com.b12.gamerunning.PlayerOrder$SetCarMasses");
        assert_eq!(value["info"]["car1Id"], 1);
        assert_eq!(value["info"]["car2Mass"], 15);
    }

    #[test]
    fn test_step_reports_contract_violation() {
        let mut input: TurnInput =
            serde_json::from_str(include_str!("../fixtures/running_race.json")).unwrap();
        input.game_state.cars.retain(|c| c.team_id == 0);
        let line = serde_json::to_string(&input).unwrap();
        assert!(matches!(
            runner(0).step(&line),
            Err(RunnerError::Policy(GameError::NotEnoughOpponents { .. }))
        ));
    }

    #[test]
    fn test_step_wraps_logged_lines() {
        let line = one_line(include_str!("../fixtures/running_race.json"));
        let encoded = runner(0).step(&line).unwrap();
        let order: PlayerOrder = serde_json::from_str(&encoded).unwrap();
        match &order {
            PlayerOrder::LoggingOrder { message, .. } => {
                assert!(message.starts_with("car 2 tracks car 3"))
            }
            other => panic!("expected a logging order, got {:?}", other),
        }
        assert_eq!(order.unwrap_logging().variant_name(), "OrderForEachCar");
    }

    #[test]
    fn test_run_writes_one_line_per_turn() {
        let input = format!(
            "{}\n\n{}\n",
            one_line(include_str!("../fixtures/race_not_started.json")),
            one_line(include_str!("../fixtures/running_race.json"))
        );
        let mut output = Vec::new();
        runner(1).run(input.as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let order: PlayerOrder = serde_json::from_str(line).unwrap();
            assert!(!matches!(order.unwrap_logging(), PlayerOrder::Crash { .. }));
        }
    }

    #[test]
    fn test_run_stops_on_malformed_input() {
        let mut output = Vec::new();
        let result = runner(0).run("{\"time\": 1}\n".as_bytes(), &mut output);
        assert!(matches!(result, Err(RunnerError::Protocol(_))));
        assert!(output.is_empty());
    }

    #[test]
    fn test_run_sends_crash_on_contract_violation() {
        let mut input: TurnInput =
            serde_json::from_str(include_str!("../fixtures/running_race.json")).unwrap();
        input.game_state.checkpoints.retain(|c| c.checkpoint_index != 1);
        let line = serde_json::to_string(&input).unwrap();

        let mut output = Vec::new();
        let result = runner(0).run(line.as_bytes(), &mut output);
        assert!(matches!(
            result,
            Err(RunnerError::Policy(GameError::MissingCheckpoint { index: 1 }))
        ));
        let crash: PlayerOrder = serde_json::from_slice(&output).unwrap();
        assert_eq!(crash, PlayerOrder::crash(0, "no checkpoint with index 1"));
    }
}
