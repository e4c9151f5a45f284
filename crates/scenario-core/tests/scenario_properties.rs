use contracts::{Difficulty, GenerateConfig, PerturbationOverrides, Voice};
use proptest::prelude::*;
use scenario_core::constraint::Constraint;
use scenario_core::scenario::{generate, generate_scenario};

fn config(num_players: u8, difficulty: Difficulty, seed: u32) -> GenerateConfig {
    GenerateConfig {
        num_players,
        difficulty,
        seed: Some(seed),
        perturbation: None,
        warm_cool_bias: None,
    }
}

fn is_spatial(constraint: &Constraint) -> bool {
    matches!(
        constraint,
        Constraint::NoColorAboveStyle { .. }
            | Constraint::NoColorBelowStyle { .. }
            | Constraint::NoColorBesideStyle { .. }
            | Constraint::NoColorDiagonalStyle { .. }
            | Constraint::DiagonalsSameWall
            | Constraint::AdjacentWallsDiffer
    )
}

#[test]
fn property_1_two_player_easy_seed_1_shape() {
    let bundle = generate(&config(2, Difficulty::Easy, 1));
    let scenario = bundle.scenario();

    assert_eq!(scenario.num_players, 2);
    assert_eq!(scenario.players.len(), 2);
    for player in &scenario.players {
        assert_eq!(player.constraints.len(), 3);
    }

    let names: Vec<&str> = scenario
        .solution_board
        .rooms
        .iter()
        .map(|room| room.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bathroom", "Bedroom", "Living Room", "Kitchen"]);

    let objects = bundle.solution.total_objects();
    assert!((5..=7).contains(&objects), "{objects} objects");
    assert!(scenario.perturbation_log.len() >= 3);
}

#[test]
fn property_2_three_player_medium_seed_42_solution_correctness() {
    let bundle = generate(&config(3, Difficulty::Medium, 42));
    let scenario = bundle.scenario();

    let names: Vec<&str> = scenario
        .solution_board
        .rooms
        .iter()
        .map(|room| room.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bedroom A", "Bedroom B", "Living Room", "Kitchen"]);

    assert_eq!(bundle.assignments.len(), 3);
    for rules in &bundle.assignments {
        assert_eq!(rules.len(), 4);
        for candidate in rules {
            assert!(candidate.constraint.eval(&bundle.solution));
        }
    }
}

#[test]
fn property_3_four_player_hard_seed_7_spatial_presence() {
    let bundle = generate(&config(4, Difficulty::Hard, 7));

    assert_eq!(bundle.assignments.len(), 4);
    for rules in &bundle.assignments {
        assert_eq!(rules.len(), 4);
    }

    let objects = bundle.solution.total_objects();
    assert!((7..=10).contains(&objects), "{objects} objects");

    let spatial = bundle
        .assignments
        .iter()
        .flatten()
        .filter(|candidate| is_spatial(&candidate.constraint))
        .count();
    assert!(spatial >= 1, "no spatial rule in the whole assignment");
}

#[test]
fn property_4_identical_configs_serialize_identically() {
    let cfg = config(3, Difficulty::Medium, 2024);
    let first = serde_json::to_string(&generate_scenario(&cfg)).expect("encode");
    let second = serde_json::to_string(&generate_scenario(&cfg)).expect("encode");
    assert_eq!(first, second);
}

#[test]
fn property_5_voices_follow_the_player_cycle() {
    let scenario = generate_scenario(&config(4, Difficulty::Medium, 11));
    let voices: Vec<Voice> = scenario.players.iter().map(|player| player.voice).collect();
    assert_eq!(
        voices,
        vec![Voice::Formal, Voice::Casual, Voice::Passionate, Voice::Neutral]
    );
    for (index, player) in scenario.players.iter().enumerate() {
        assert_eq!(player.id, index as u8 + 1);
        for condition in &player.constraints {
            assert!(condition.text.ends_with('.'), "{}", condition.text);
            assert!(!condition.text.is_empty());
        }
    }
}

#[test]
fn property_6_move_log_runs_both_directions() {
    for seed in [1, 4, 9, 42, 86] {
        let bundle = generate(&config(3, Difficulty::Medium, seed));
        let scenario = bundle.scenario();
        assert_eq!(scenario.perturbation_log.len(), bundle.moves.len());

        // Applied walk forward: solution -> initial.
        let mut forward = bundle.solution.clone();
        for applied in &bundle.moves {
            applied.apply(&mut forward);
        }
        assert_eq!(forward.fingerprint(), bundle.initial.fingerprint());

        // Inverses of the walk, newest first, are the serialized log:
        // initial -> solution.
        let mut backward = bundle.initial.clone();
        for (index, applied) in bundle.moves.iter().rev().enumerate() {
            let repair = applied.inverse();
            assert_eq!(scenario.perturbation_log[index], repair.describe());
            repair.apply(&mut backward);
        }
        assert_eq!(backward.fingerprint(), bundle.solution.fingerprint());
    }
}

#[test]
fn property_7_reported_success_means_everyone_starts_broken() {
    for seed in 0..40 {
        let bundle = generate(&config(2 + (seed % 3) as u8, Difficulty::Hard, seed));
        if bundle.satisfied_players == bundle.assignments.len() {
            for (player, count) in bundle.violations_on_initial().iter().enumerate() {
                assert!(*count >= 1, "seed {seed}: player {player} starts satisfied");
            }
        }
    }
}

#[test]
fn property_8_scenario_round_trips_through_json() {
    let scenario = generate_scenario(&config(2, Difficulty::Easy, 5));
    let encoded = serde_json::to_string(&scenario).expect("encode");
    assert!(encoded.contains("\"numPlayers\""));
    assert!(encoded.contains("\"initialBoard\""));
    assert!(encoded.contains("\"wallColor\""));
    assert!(encoded.contains("\"perturbationLog\""));
    let decoded: contracts::Scenario = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(scenario, decoded);
}

#[test]
fn property_9_serialized_token_colors_obey_the_style_map() {
    let scenario = generate_scenario(&config(4, Difficulty::Hard, 23));
    for board in [&scenario.initial_board, &scenario.solution_board] {
        for room in &board.rooms {
            for (kind, token) in [
                (contracts::ObjectType::Lamp, room.lamp),
                (contracts::ObjectType::WallHanging, room.wall_hanging),
                (contracts::ObjectType::Curio, room.curio),
            ] {
                if let Some(token) = token {
                    assert_eq!(contracts::style_color(kind, token.style), token.color);
                }
            }
        }
    }
}

#[test]
fn property_10_overridden_violation_floor_is_enforced_when_met() {
    let mut cfg = config(2, Difficulty::Medium, 77);
    cfg.perturbation = Some(PerturbationOverrides {
        min_violations_per_player: Some(2),
        ..PerturbationOverrides::default()
    });
    let bundle = generate(&cfg);
    if bundle.satisfied_players == bundle.assignments.len() {
        for count in bundle.violations_on_initial() {
            assert!(count >= 2);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn generation_is_deterministic_over_seeds(seed in any::<u32>(), players in 2u8..=4) {
        let cfg = config(players, Difficulty::Medium, seed);
        let first = serde_json::to_string(&generate_scenario(&cfg)).expect("encode");
        let second = serde_json::to_string(&generate_scenario(&cfg)).expect("encode");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn assigned_rules_always_hold_on_the_solution(seed in any::<u32>()) {
        let bundle = generate(&config(3, Difficulty::Hard, seed));
        for rules in &bundle.assignments {
            for candidate in rules {
                prop_assert!(candidate.constraint.eval(&bundle.solution));
            }
        }
    }

    #[test]
    fn the_walk_replays_onto_the_initial_board(seed in any::<u32>()) {
        let bundle = generate(&config(2, Difficulty::Easy, seed));
        let mut replay = bundle.solution.clone();
        for applied in &bundle.moves {
            applied.apply(&mut replay);
        }
        prop_assert_eq!(replay.fingerprint(), bundle.initial.fingerprint());
    }
}
