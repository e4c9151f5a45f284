//! Backward walk from the solution to the initial board.
//!
//! One working state is mutated and rolled back through inverse moves; the
//! only deep copy is the fresh solution clone at the top of each attempt.

use std::collections::BTreeSet;

use contracts::{
    style_color, Color, MoveKind, MoveWeights, ObjectType, PerturbationOverrides, RoomName, Style,
    COLORS, MOVE_KINDS, OBJECT_TYPES, STYLES,
};

use crate::generator::DifficultyParams;
use crate::house::{House, Token};
use crate::mining::Candidate;
use crate::rng::Mulberry32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Paint {
        room: RoomName,
        old: Color,
        new: Color,
    },
    Swap {
        room: RoomName,
        kind: ObjectType,
        old_style: Style,
        new_style: Style,
    },
    Remove {
        room: RoomName,
        kind: ObjectType,
        style: Style,
    },
    Add {
        room: RoomName,
        kind: ObjectType,
        style: Style,
    },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Paint { .. } => MoveKind::Paint,
            Move::Swap { .. } => MoveKind::Swap,
            Move::Remove { .. } => MoveKind::Remove,
            Move::Add { .. } => MoveKind::Add,
        }
    }

    /// The move that exactly undoes this one.
    pub fn inverse(&self) -> Move {
        match *self {
            Move::Paint { room, old, new } => Move::Paint {
                room,
                old: new,
                new: old,
            },
            Move::Swap {
                room,
                kind,
                old_style,
                new_style,
            } => Move::Swap {
                room,
                kind,
                old_style: new_style,
                new_style: old_style,
            },
            Move::Remove { room, kind, style } => Move::Add { room, kind, style },
            Move::Add { room, kind, style } => Move::Remove { room, kind, style },
        }
    }

    pub fn apply(&self, state: &mut House) {
        match *self {
            Move::Paint { room, new, .. } => {
                state.paint_room(room, new);
            }
            Move::Swap {
                room,
                kind,
                new_style,
                ..
            } => {
                state.swap_object(room, Token::new(kind, new_style));
            }
            Move::Remove { room, kind, .. } => {
                state.remove_object(room, kind);
            }
            Move::Add { room, kind, style } => {
                state.add_object(room, Token::new(kind, style));
            }
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Move::Paint { room, old, new } => format!("Paint {room}: {old} -> {new}"),
            Move::Swap {
                room,
                kind,
                old_style,
                new_style,
            } => {
                let old_color = style_color(kind, old_style);
                let new_color = style_color(kind, new_style);
                format!(
                    "Swap {old_style} {old_color} {kind} -> {new_style} {new_color} {kind} in {room}"
                )
            }
            Move::Remove { room, kind, style } => {
                let color = style_color(kind, style);
                format!("Remove {style} {color} {kind} from {room}")
            }
            Move::Add { room, kind, style } => {
                let color = style_color(kind, style);
                format!("Add {style} {color} {kind} to {room}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerturbConfig {
    pub num_perturbations: u32,
    pub min_violations_per_player: usize,
    pub allowed_moves: Vec<MoveKind>,
    pub move_weights: MoveWeights,
    pub max_attempts: u32,
}

const DEFAULT_MAX_ATTEMPTS: u32 = 30;
const REPAIR_ITERATIONS: usize = 10;

impl PerturbConfig {
    /// Difficulty defaults; the walk length is drawn here.
    pub fn from_difficulty(rng: &mut Mulberry32, params: &DifficultyParams) -> Self {
        let (lo, hi) = params.pert_range;
        Self {
            num_perturbations: rng.randint(lo, hi),
            min_violations_per_player: 1,
            allowed_moves: MOVE_KINDS.to_vec(),
            move_weights: params.move_weights,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn apply_overrides(&mut self, overrides: &PerturbationOverrides) {
        if let Some(n) = overrides.num_perturbations {
            self.num_perturbations = n;
        }
        if let Some(min) = overrides.min_violations_per_player {
            self.min_violations_per_player = min;
        }
        if let Some(allowed) = &overrides.allowed_moves {
            self.allowed_moves = allowed.clone();
        }
        if let Some(weights) = overrides.move_weights {
            self.move_weights = weights;
        }
        if let Some(attempts) = overrides.max_attempts {
            self.max_attempts = attempts;
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerturbOutcome {
    pub initial: House,
    /// The applied walk, solution -> initial, in application order.
    pub moves: Vec<Move>,
    /// Players whose violation count met the minimum on the best attempt.
    pub satisfied_players: usize,
}

/// Walk backward from the solution until every player's rule set is broken
/// at least `min_violations_per_player` times, best effort across attempts.
pub fn generate_initial_state(
    rng: &mut Mulberry32,
    solution: &House,
    assignments: &[Vec<Candidate>],
    config: &PerturbConfig,
) -> PerturbOutcome {
    let mut best: Option<PerturbOutcome> = None;

    for _attempt in 0..config.max_attempts {
        let mut state = solution.clone();
        let mut visited = BTreeSet::new();
        visited.insert(state.fingerprint());
        let mut moves: Vec<Move> = Vec::new();

        for _step in 0..config.num_perturbations {
            match pick_random_move(rng, &mut state, config, &visited, moves.last()) {
                Some((chosen, fingerprint)) => {
                    chosen.apply(&mut state);
                    visited.insert(fingerprint);
                    moves.push(chosen);
                }
                None => break,
            }
        }

        repair_violations(rng, &mut state, assignments, config, &mut visited, &mut moves);

        let satisfied = count_violations(&state, assignments)
            .iter()
            .filter(|count| **count >= config.min_violations_per_player)
            .count();
        let improved = best
            .as_ref()
            .map_or(true, |kept| satisfied > kept.satisfied_players);
        if improved {
            best = Some(PerturbOutcome {
                initial: state,
                moves,
                satisfied_players: satisfied,
            });
        }
        if satisfied == assignments.len() {
            break;
        }
    }

    // max_attempts >= 1 by contract; the first attempt always lands here.
    best.unwrap_or_else(|| PerturbOutcome {
        initial: solution.clone(),
        moves: Vec::new(),
        satisfied_players: 0,
    })
}

pub fn count_violations(state: &House, assignments: &[Vec<Candidate>]) -> Vec<usize> {
    assignments
        .iter()
        .map(|rules| {
            rules
                .iter()
                .filter(|candidate| !candidate.constraint.eval(state))
                .count()
        })
        .collect()
}

/// Every legal move from the current state, in a fixed scan order.
fn list_all_moves(state: &House, allowed: &[MoveKind]) -> Vec<Move> {
    let mut moves = Vec::new();
    for name in state.room_names() {
        let room = match state.room(name) {
            Some(room) => room,
            None => continue,
        };

        if allowed.contains(&MoveKind::Paint) {
            for color in COLORS {
                if color != room.wall_color {
                    moves.push(Move::Paint {
                        room: name,
                        old: room.wall_color,
                        new: color,
                    });
                }
            }
        }

        if allowed.contains(&MoveKind::Swap) {
            for kind in OBJECT_TYPES {
                if let Some(token) = room.object(kind) {
                    for style in STYLES {
                        if style != token.style {
                            moves.push(Move::Swap {
                                room: name,
                                kind,
                                old_style: token.style,
                                new_style: style,
                            });
                        }
                    }
                }
            }
        }

        if allowed.contains(&MoveKind::Remove) {
            for kind in OBJECT_TYPES {
                if let Some(token) = room.object(kind) {
                    moves.push(Move::Remove {
                        room: name,
                        kind,
                        style: token.style,
                    });
                }
            }
        }

        if allowed.contains(&MoveKind::Add) {
            for kind in OBJECT_TYPES {
                if room.object(kind).is_none() {
                    for style in STYLES {
                        moves.push(Move::Add {
                            room: name,
                            kind,
                            style,
                        });
                    }
                }
            }
        }
    }
    moves
}

/// Weighted draw without replacement until a move survives the rejection
/// rules: no immediate undo, no revisited state. The state is restored
/// before returning; the caller applies the accepted move.
fn pick_random_move(
    rng: &mut Mulberry32,
    state: &mut House,
    config: &PerturbConfig,
    visited: &BTreeSet<String>,
    last_move: Option<&Move>,
) -> Option<(Move, String)> {
    let candidates = list_all_moves(state, &config.allowed_moves);
    let mut pool: Vec<(Move, f64)> = candidates
        .into_iter()
        .map(|candidate| {
            let weight = config.move_weights.weight(candidate.kind());
            (candidate, weight)
        })
        .collect();
    pool = rng.shuffle(&pool);

    while !pool.is_empty() {
        let weights: Vec<f64> = pool.iter().map(|(_, weight)| *weight).collect();
        let index = rng.weighted_index(&weights)?;
        let (candidate, _) = pool.remove(index);

        if last_move.map_or(false, |last| candidate == last.inverse()) {
            continue;
        }

        candidate.apply(state);
        let fingerprint = state.fingerprint();
        candidate.inverse().apply(state);

        if visited.contains(&fingerprint) {
            continue;
        }
        return Some((candidate, fingerprint));
    }

    None
}

/// Break one satisfied rule of an under-target player per iteration until
/// everyone meets the minimum or the iteration cap runs out.
fn repair_violations(
    rng: &mut Mulberry32,
    state: &mut House,
    assignments: &[Vec<Candidate>],
    config: &PerturbConfig,
    visited: &mut BTreeSet<String>,
    moves: &mut Vec<Move>,
) {
    for _ in 0..REPAIR_ITERATIONS {
        let violations = count_violations(state, assignments);
        let under: Vec<usize> = violations
            .iter()
            .enumerate()
            .filter(|(_, count)| **count < config.min_violations_per_player)
            .map(|(player, _)| player)
            .collect();
        if under.is_empty() {
            return;
        }
        let player = *rng.choice(&under);

        let satisfied: Vec<Candidate> = assignments[player]
            .iter()
            .filter(|candidate| candidate.constraint.eval(state))
            .copied()
            .collect();
        let targets = rng.shuffle(&satisfied);

        let mut found = false;
        for target in targets {
            let candidates = rng.shuffle(&list_all_moves(state, &config.allowed_moves));
            for candidate in candidates {
                if moves.last().map_or(false, |last| candidate == last.inverse()) {
                    continue;
                }
                candidate.apply(state);
                let fingerprint = state.fingerprint();
                if !visited.contains(&fingerprint) && !target.constraint.eval(state) {
                    visited.insert(fingerprint);
                    moves.push(candidate);
                    found = true;
                    break;
                }
                candidate.inverse().apply(state);
            }
            if found {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::assign_constraints;
    use crate::generator::{difficulty_params, generate_final_state};
    use crate::mining::mine_candidates;
    use contracts::Difficulty;

    fn pipeline(seed: u32, players: u8) -> (House, Vec<Vec<Candidate>>, PerturbOutcome) {
        let params = difficulty_params(Difficulty::Medium);
        let mut solution_rng = Mulberry32::new(seed);
        let solution = generate_final_state(&mut solution_rng, players, &params);
        let candidates = mine_candidates(&solution);
        let mut assign_rng = Mulberry32::new(seed.wrapping_mul(2));
        let assignments = assign_constraints(
            &mut assign_rng,
            &candidates,
            players,
            params.rules_per_player,
            params.warm_cool_bias,
        );
        let mut perturb_rng = Mulberry32::new(seed.wrapping_mul(3).wrapping_add(7));
        let config = PerturbConfig::from_difficulty(&mut perturb_rng, &params);
        let outcome = generate_initial_state(&mut perturb_rng, &solution, &assignments, &config);
        (solution, assignments, outcome)
    }

    #[test]
    fn swap_composed_with_its_inverse_is_identity() {
        let mut state = House::new(2);
        state.add_object(RoomName::Kitchen, Token::new(ObjectType::Lamp, Style::Modern));
        let before = state.fingerprint();
        let swap = Move::Swap {
            room: RoomName::Kitchen,
            kind: ObjectType::Lamp,
            old_style: Style::Modern,
            new_style: Style::Retro,
        };
        swap.apply(&mut state);
        assert_ne!(state.fingerprint(), before);
        swap.inverse().apply(&mut state);
        assert_eq!(state.fingerprint(), before);
    }

    #[test]
    fn every_move_kind_inverts_exactly() {
        let mut state = House::new(3);
        state.add_object(RoomName::BedroomA, Token::new(ObjectType::Curio, Style::Retro));
        let moves = [
            Move::Paint {
                room: RoomName::Kitchen,
                old: Color::Red,
                new: Color::Green,
            },
            Move::Add {
                room: RoomName::Kitchen,
                kind: ObjectType::Lamp,
                style: Style::Unusual,
            },
            Move::Remove {
                room: RoomName::BedroomA,
                kind: ObjectType::Curio,
                style: Style::Retro,
            },
        ];
        for candidate in moves {
            let before = state.fingerprint();
            candidate.apply(&mut state);
            candidate.inverse().apply(&mut state);
            assert_eq!(state.fingerprint(), before, "{candidate:?}");
        }
    }

    #[test]
    fn move_descriptions_carry_derived_colors() {
        let swap = Move::Swap {
            room: RoomName::Bedroom,
            kind: ObjectType::Lamp,
            old_style: Style::Modern,
            new_style: Style::Retro,
        };
        assert_eq!(
            swap.describe(),
            "Swap Modern Blue Lamp -> Retro Red Lamp in Bedroom"
        );
        let paint = Move::Paint {
            room: RoomName::Kitchen,
            old: Color::Red,
            new: Color::Blue,
        };
        assert_eq!(paint.describe(), "Paint Kitchen: Red -> Blue");
        let add = Move::Add {
            room: RoomName::Kitchen,
            kind: ObjectType::Curio,
            style: Style::Antique,
        };
        assert_eq!(add.describe(), "Add Antique Blue Curio to Kitchen");
    }

    #[test]
    fn replaying_the_walk_reaches_the_initial_board() {
        for seed in [1, 8, 21, 42] {
            let (solution, _, outcome) = pipeline(seed, 3);
            let mut replay = solution.clone();
            for candidate in &outcome.moves {
                candidate.apply(&mut replay);
            }
            assert_eq!(replay.fingerprint(), outcome.initial.fingerprint());

            // And the inverses, newest first, walk back to the solution.
            let mut back = outcome.initial.clone();
            for candidate in outcome.moves.iter().rev() {
                candidate.inverse().apply(&mut back);
            }
            assert_eq!(back.fingerprint(), solution.fingerprint());
        }
    }

    #[test]
    fn walk_states_never_repeat() {
        for seed in [2, 9, 33] {
            let (solution, _, outcome) = pipeline(seed, 2);
            let mut replay = solution.clone();
            let mut seen = BTreeSet::new();
            seen.insert(replay.fingerprint());
            for candidate in &outcome.moves {
                candidate.apply(&mut replay);
                assert!(
                    seen.insert(replay.fingerprint()),
                    "seed {seed}: revisited state"
                );
            }
        }
    }

    #[test]
    fn reported_success_matches_a_recount() {
        for seed in [1, 5, 16, 42, 77] {
            let (_, assignments, outcome) = pipeline(seed, 3);
            let recount = count_violations(&outcome.initial, &assignments)
                .iter()
                .filter(|count| **count >= 1)
                .count();
            assert_eq!(outcome.satisfied_players, recount, "seed {seed}");
        }
    }

    #[test]
    fn restricted_move_kinds_are_honored() {
        let params = difficulty_params(Difficulty::Medium);
        let mut rng = Mulberry32::new(4);
        let solution = generate_final_state(&mut rng, 2, &params);
        let candidates = mine_candidates(&solution);
        let mut assign_rng = Mulberry32::new(8);
        let assignments = assign_constraints(&mut assign_rng, &candidates, 2, 3, 1.5);
        let config = PerturbConfig {
            num_perturbations: 6,
            min_violations_per_player: 1,
            allowed_moves: vec![MoveKind::Paint],
            move_weights: params.move_weights,
            max_attempts: 10,
        };
        let mut perturb_rng = Mulberry32::new(19);
        let outcome = generate_initial_state(&mut perturb_rng, &solution, &assignments, &config);
        assert!(!outcome.moves.is_empty());
        for candidate in &outcome.moves {
            assert_eq!(candidate.kind(), MoveKind::Paint);
        }
    }

    #[test]
    fn overrides_replace_only_what_they_name() {
        let params = difficulty_params(Difficulty::Easy);
        let mut rng = Mulberry32::new(3);
        let mut config = PerturbConfig::from_difficulty(&mut rng, &params);
        let drawn = config.num_perturbations;
        assert!((3..=5).contains(&drawn));
        config.apply_overrides(&PerturbationOverrides {
            min_violations_per_player: Some(2),
            max_attempts: Some(5),
            ..PerturbationOverrides::default()
        });
        assert_eq!(config.num_perturbations, drawn);
        assert_eq!(config.min_violations_per_player, 2);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.allowed_moves, MOVE_KINDS.to_vec());
    }
}
