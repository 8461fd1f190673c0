use std::io::Write;
use std::process::{Command, Stdio};

use race_game_types::orders::PlayerOrder;

fn one_line(json: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(json).expect("the json literal is valid");
    serde_json::to_string(&value).unwrap()
}

fn play(args: &[&str], input: &str) -> (bool, Vec<PlayerOrder>) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_race-bot"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("race-bot starts");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let orders = String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).expect("one order per line"))
        .collect();
    (output.status.success(), orders)
}

#[test]
fn test_plays_a_match() {
    let input = format!(
        "{}\n{}\n",
        one_line(include_str!("../fixtures/race_not_started.json")),
        one_line(include_str!("../fixtures/running_race.json"))
    );
    let (success, orders) = play(&["0"], &input);
    assert!(success);
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0], PlayerOrder::set_car_masses(0, 1, 2, 5, 15));
    match orders[1].unwrap_logging() {
        PlayerOrder::OrderForEachCar { car1_order, .. } => {
            assert_eq!(**car1_order, PlayerOrder::use_boost(1, 0))
        }
        other => panic!("expected one order per car, got {:?}", other),
    }
}

#[test]
fn test_preset_selects_masses() {
    let input = format!(
        "{}\n",
        one_line(include_str!("../fixtures/race_not_started.json"))
    );
    let (success, orders) = play(&["1", "--preset", "brawler"], &input);
    assert!(success);
    assert_eq!(orders, vec![PlayerOrder::set_car_masses(1, 3, 4, 3, 17)]);
}

#[test]
fn test_unknown_preset_fails() {
    let (success, orders) = play(&["0", "--preset", "kamikaze"], "");
    assert!(!success);
    assert!(orders.is_empty());
}

#[test]
fn test_crashes_on_broken_snapshot() {
    let mut value: serde_json::Value =
        serde_json::from_str(include_str!("../fixtures/running_race.json")).unwrap();
    value["gameState"]["checkpoints"] = serde_json::json!([]);
    let input = format!("{}\n", serde_json::to_string(&value).unwrap());

    let (success, orders) = play(&["0"], &input);
    assert!(!success);
    assert_eq!(
        orders,
        vec![PlayerOrder::crash(0, "game state has no checkpoints")]
    );
}
