//! Solution-board generation: palette sampling, wall variety, and the
//! pattern-biased object walk.

use contracts::{
    color_style, rooms_for, Difficulty, MoveWeights, ObjectType, RoomName, Style, COLORS,
    OBJECT_TYPES, STYLES,
};

use crate::house::{House, Token};
use crate::rng::Mulberry32;

#[derive(Debug, Clone)]
pub struct DifficultyParams {
    pub num_colors: usize,
    pub num_styles: usize,
    pub total_items: (u32, u32),
    pub pattern_prob: f64,
    pub rules_per_player: usize,
    pub pert_range: (u32, u32),
    pub warm_cool_bias: f64,
    pub move_weights: MoveWeights,
}

/// Tuned presets; the numbers shape every downstream distribution.
pub fn difficulty_params(difficulty: Difficulty) -> DifficultyParams {
    match difficulty {
        Difficulty::Easy => DifficultyParams {
            num_colors: 3,
            num_styles: 3,
            total_items: (5, 7),
            pattern_prob: 0.35,
            rules_per_player: 3,
            pert_range: (3, 5),
            warm_cool_bias: 1.5,
            move_weights: MoveWeights {
                paint: 1.0,
                swap: 1.5,
                remove: 0.5,
                add: 0.3,
            },
        },
        Difficulty::Medium => DifficultyParams {
            num_colors: 3,
            num_styles: 4,
            total_items: (6, 9),
            pattern_prob: 0.30,
            rules_per_player: 4,
            pert_range: (5, 8),
            warm_cool_bias: 1.5,
            move_weights: MoveWeights {
                paint: 1.0,
                swap: 1.5,
                remove: 0.8,
                add: 0.3,
            },
        },
        Difficulty::Hard => DifficultyParams {
            num_colors: 4,
            num_styles: 4,
            total_items: (7, 10),
            pattern_prob: 0.25,
            rules_per_player: 4,
            pert_range: (7, 10),
            warm_cool_bias: 1.5,
            move_weights: MoveWeights {
                paint: 1.0,
                swap: 1.2,
                remove: 1.0,
                add: 0.5,
            },
        },
    }
}

const THEME_PROB: f64 = 0.4;
const THEME_STYLE_PROB: f64 = 0.7;
const WALL_VARIETY_ATTEMPTS: usize = 100;

/// Generate the hidden solution board.
pub fn generate_final_state(
    rng: &mut Mulberry32,
    num_players: u8,
    params: &DifficultyParams,
) -> House {
    let room_names = rooms_for(num_players);
    let mut state = House::new(num_players);

    let colors_used = rng.sample(&COLORS, params.num_colors.min(COLORS.len()));
    let styles_used = rng.sample(&STYLES, params.num_styles.min(STYLES.len()));

    // Walls: resample until at least two distinct colors appear.
    let mut wall_colors = [colors_used[0]; 4];
    for _ in 0..WALL_VARIETY_ATTEMPTS {
        for slot in wall_colors.iter_mut() {
            *slot = *rng.choice(&colors_used);
        }
        let first = wall_colors[0];
        if wall_colors.iter().any(|color| *color != first) {
            break;
        }
    }
    for (name, color) in room_names.iter().zip(wall_colors) {
        state.paint_room(*name, color);
    }

    let (min_items, max_items) = params.total_items;
    let target_items = rng.randint(min_items, max_items) as usize;

    let all_slots: Vec<(RoomName, ObjectType)> = room_names
        .iter()
        .flat_map(|name| OBJECT_TYPES.iter().map(move |kind| (*name, *kind)))
        .collect();
    let slots = rng.shuffle(&all_slots);

    // A theme concentrates one object type on one style, seeding the
    // all-of-a-type-match patterns.
    let theme = if rng.next_f64() < THEME_PROB {
        let kind = *rng.choice(&OBJECT_TYPES);
        Some((kind, *rng.choice(&styles_used)))
    } else {
        None
    };

    let mut placed = 0;
    for (name, kind) in slots {
        if placed >= target_items {
            break;
        }
        let mut style = *rng.choice(&styles_used);
        let themed = match theme {
            Some((theme_kind, theme_style)) if theme_kind == kind => {
                if rng.next_f64() < THEME_STYLE_PROB {
                    style = theme_style;
                    true
                } else {
                    false
                }
            }
            _ => false,
        };
        if !themed && rng.next_f64() < params.pattern_prob {
            // Derive the style that matches the room's wall, palette allowing.
            let wall = state.room(name).map(|room| room.wall_color);
            if let Some(wall) = wall {
                let candidate = color_style(kind, wall);
                if styles_used.contains(&candidate) {
                    style = candidate;
                }
            }
        }
        state.add_object(name, Token::new(kind, style));
        placed += 1;
    }

    ensure_type_coverage(rng, &mut state, &room_names, &styles_used);
    ensure_style_variety(rng, &mut state, &room_names, &styles_used);

    state
}

/// Every object type shows up at least once.
fn ensure_type_coverage(
    rng: &mut Mulberry32,
    state: &mut House,
    room_names: &[RoomName; 4],
    styles_used: &[Style],
) {
    for kind in OBJECT_TYPES {
        if state.count_object_type(kind) > 0 {
            continue;
        }
        let empty_rooms: Vec<RoomName> = room_names
            .iter()
            .filter(|name| {
                state
                    .room(**name)
                    .map_or(false, |room| room.object(kind).is_none())
            })
            .copied()
            .collect();
        if !empty_rooms.is_empty() {
            let name = *rng.choice(&empty_rooms);
            let style = *rng.choice(styles_used);
            state.add_object(name, Token::new(kind, style));
        }
    }
}

/// At least two distinct styles among the placed objects, palette allowing.
/// Restyles the first object found and stops there.
fn ensure_style_variety(
    rng: &mut Mulberry32,
    state: &mut House,
    room_names: &[RoomName; 4],
    styles_used: &[Style],
) {
    let mut present: Vec<Style> = Vec::new();
    for token in state.all_objects() {
        if !present.contains(&token.style) {
            present.push(token.style);
        }
    }
    if present.len() >= 2 || styles_used.len() < 2 {
        return;
    }
    for name in room_names {
        for kind in OBJECT_TYPES {
            let current = match state.room(*name).and_then(|room| room.object(kind)) {
                Some(token) => token.style,
                None => continue,
            };
            let alternatives: Vec<Style> = styles_used
                .iter()
                .filter(|style| **style != current)
                .copied()
                .collect();
            if !alternatives.is_empty() {
                let style = *rng.choice(&alternatives);
                state.swap_object(*name, Token::new(kind, style));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Difficulty;
    use std::collections::BTreeSet;

    #[test]
    fn presets_scale_with_difficulty() {
        let easy = difficulty_params(Difficulty::Easy);
        let hard = difficulty_params(Difficulty::Hard);
        assert_eq!(easy.rules_per_player, 3);
        assert_eq!(hard.num_colors, 4);
        assert!(hard.total_items.1 > easy.total_items.1);
        assert!(easy.pattern_prob > hard.pattern_prob);
    }

    #[test]
    fn generated_boards_meet_the_structural_floor() {
        for seed in 0..40 {
            for (players, difficulty) in [
                (2, Difficulty::Easy),
                (3, Difficulty::Medium),
                (4, Difficulty::Hard),
            ] {
                let params = difficulty_params(difficulty);
                let mut rng = Mulberry32::new(seed);
                let state = generate_final_state(&mut rng, players, &params);

                let walls: BTreeSet<_> = state.rooms().iter().map(|r| r.wall_color).collect();
                assert!(walls.len() >= 2, "seed {seed}: walls lack variety");

                // The slot walk stays in range; coverage can add at most one
                // object since a five-item board already spans two types.
                let total = state.total_objects();
                let (min_items, max_items) = params.total_items;
                assert!(
                    total >= min_items as usize && total <= max_items as usize + 1,
                    "seed {seed}: {total} objects outside range"
                );

                for kind in OBJECT_TYPES {
                    assert!(
                        state.count_object_type(kind) > 0,
                        "seed {seed}: no {kind} placed"
                    );
                }

                let styles: BTreeSet<_> = state.all_objects().map(|t| t.style).collect();
                assert!(styles.len() >= 2, "seed {seed}: single-style board");
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let params = difficulty_params(Difficulty::Medium);
        let mut a = Mulberry32::new(31);
        let mut b = Mulberry32::new(31);
        let first = generate_final_state(&mut a, 3, &params);
        let second = generate_final_state(&mut b, 3, &params);
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
