//! Round-robin constraint assignment with diversity-biased weighted draws.

use std::collections::{BTreeMap, BTreeSet};

use contracts::RoomName;

use crate::mining::Candidate;
use crate::rng::Mulberry32;

// Per-round deltas applied on top of the base salience. Tuned values.
const NEW_ROOM_BONUS: f64 = 1.5;
const NEW_KIND_BONUS: f64 = 1.0;
const POLARITY_BONUS: f64 = 1.0;
const STALE_ROOM_PENALTY: f64 = 2.0;
const REPEAT_KIND_PENALTY: f64 = 1.5;
const WEIGHT_FLOOR: f64 = 0.1;

#[derive(Debug, Default)]
struct PlayerTrack {
    rooms: BTreeSet<RoomName>,
    kinds: BTreeSet<&'static str>,
    has_positive: bool,
    has_negative: bool,
}

impl PlayerTrack {
    fn adjusted_score(&self, candidate: &Candidate, num_players: u8) -> f64 {
        let mut score = candidate.score;
        let refs = candidate.constraint.referenced_rooms(num_players);
        let new_room = refs.iter().any(|room| !self.rooms.contains(room));
        let negative = candidate.constraint.is_negative();
        let kind = candidate.constraint.kind_label();

        if new_room {
            score += NEW_ROOM_BONUS;
        }
        if !self.kinds.contains(kind) {
            score += NEW_KIND_BONUS;
        } else {
            score -= REPEAT_KIND_PENALTY;
        }
        if (negative && !self.has_negative) || (!negative && !self.has_positive) {
            score += POLARITY_BONUS;
        }
        if !refs.is_empty() && !new_room && self.rooms.len() >= 2 {
            score -= STALE_ROOM_PENALTY;
        }

        score.max(WEIGHT_FLOOR)
    }

    fn record(&mut self, candidate: &Candidate, num_players: u8) {
        self.rooms
            .extend(candidate.constraint.referenced_rooms(num_players));
        self.kinds.insert(candidate.constraint.kind_label());
        if candidate.constraint.is_negative() {
            self.has_negative = true;
        } else {
            self.has_positive = true;
        }
    }
}

/// Distribute candidates across players. Every constraint is used at most
/// once; a player left short of quota stays short.
pub fn assign_constraints(
    rng: &mut Mulberry32,
    candidates: &[Candidate],
    num_players: u8,
    rules_per_player: usize,
    warm_cool_bias: f64,
) -> Vec<Vec<Candidate>> {
    // Bias temperature kinds, then dedup keeping the best score.
    let mut best: BTreeMap<_, Candidate> = BTreeMap::new();
    for candidate in candidates {
        let mut candidate = *candidate;
        if candidate.constraint.is_temperature() {
            candidate.score *= warm_cool_bias;
        }
        best.entry(candidate.constraint)
            .and_modify(|kept| {
                if candidate.score > kept.score {
                    *kept = candidate;
                }
            })
            .or_insert(candidate);
    }
    let deduped: Vec<Candidate> = best.into_values().collect();

    // Shuffle to break ties, then stable-sort by descending score so equal
    // scores keep their shuffled order.
    let mut pool = rng.shuffle(&deduped);
    pool.sort_by(|a, b| b.score.total_cmp(&a.score));

    let players = num_players as usize;
    let mut assignments: Vec<Vec<Candidate>> = vec![Vec::new(); players];
    let mut tracks: Vec<PlayerTrack> = (0..players).map(|_| PlayerTrack::default()).collect();
    let mut used: BTreeSet<_> = BTreeSet::new();

    for _round in 0..rules_per_player {
        for player in 0..players {
            if assignments[player].len() >= rules_per_player {
                continue;
            }
            let eligible: Vec<&Candidate> = pool
                .iter()
                .filter(|candidate| !used.contains(&candidate.constraint))
                .collect();
            if eligible.is_empty() {
                break;
            }
            let weights: Vec<f64> = eligible
                .iter()
                .map(|candidate| tracks[player].adjusted_score(candidate, num_players))
                .collect();
            let index = match rng.weighted_index(&weights) {
                Some(index) => index,
                None => break,
            };
            let chosen = *eligible[index];
            used.insert(chosen.constraint);
            tracks[player].record(&chosen, num_players);
            assignments[player].push(chosen);
        }
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{difficulty_params, generate_final_state};
    use crate::mining::mine_candidates;
    use contracts::Difficulty;

    fn mined_pool(seed: u32, players: u8) -> (Vec<Candidate>, crate::house::House) {
        let params = difficulty_params(Difficulty::Medium);
        let mut rng = Mulberry32::new(seed);
        let state = generate_final_state(&mut rng, players, &params);
        (mine_candidates(&state), state)
    }

    #[test]
    fn no_constraint_is_assigned_twice() {
        for seed in [3, 11, 29, 101] {
            let (candidates, _) = mined_pool(seed, 4);
            let mut rng = Mulberry32::new(seed.wrapping_mul(2));
            let assignments = assign_constraints(&mut rng, &candidates, 4, 4, 1.5);
            let mut seen = BTreeSet::new();
            for rules in &assignments {
                for candidate in rules {
                    assert!(
                        seen.insert(candidate.constraint),
                        "seed {seed}: duplicate {:?}",
                        candidate.constraint
                    );
                }
            }
        }
    }

    #[test]
    fn a_rich_pool_fills_every_quota() {
        for seed in [1, 7, 42] {
            let (candidates, _) = mined_pool(seed, 3);
            let mut rng = Mulberry32::new(seed.wrapping_mul(2));
            let assignments = assign_constraints(&mut rng, &candidates, 3, 4, 1.5);
            assert_eq!(assignments.len(), 3);
            for rules in &assignments {
                assert_eq!(rules.len(), 4, "seed {seed}: quota unmet");
            }
        }
    }

    #[test]
    fn empty_pool_yields_empty_rule_lists() {
        let mut rng = Mulberry32::new(5);
        let assignments = assign_constraints(&mut rng, &[], 3, 4, 1.5);
        assert_eq!(assignments, vec![Vec::new(), Vec::new(), Vec::new()]);
    }

    #[test]
    fn assignment_is_deterministic_per_seed() {
        let (candidates, _) = mined_pool(13, 2);
        let mut a = Mulberry32::new(77);
        let mut b = Mulberry32::new(77);
        let first = assign_constraints(&mut a, &candidates, 2, 3, 1.5);
        let second = assign_constraints(&mut b, &candidates, 2, 3, 1.5);
        assert_eq!(first, second);
    }

    #[test]
    fn warm_cool_bias_raises_temperature_scores_before_dedup() {
        use crate::constraint::Constraint;
        let candidates = vec![
            Candidate {
                constraint: Constraint::WarmOutnumberCool,
                score: 5.5,
            },
            Candidate {
                constraint: Constraint::DiagonalsSameWall,
                score: 7.5,
            },
        ];
        // With an enormous bias the temperature rule dominates every draw.
        let mut rng = Mulberry32::new(1);
        let assignments = assign_constraints(&mut rng, &candidates, 1, 1, 1000.0);
        assert_eq!(
            assignments[0][0].constraint,
            Constraint::WarmOutnumberCool
        );
    }

    #[test]
    fn players_mix_positive_and_negative_rules_when_both_exist() {
        // With four rules drawn from a full pool, the polarity bonus makes an
        // all-one-polarity hand rare; assert the common case across seeds.
        let mut mixed = 0;
        let mut total = 0;
        for seed in 0..20 {
            let (candidates, _) = mined_pool(seed, 2);
            let mut rng = Mulberry32::new(seed.wrapping_add(1000));
            let assignments = assign_constraints(&mut rng, &candidates, 2, 4, 1.5);
            for rules in &assignments {
                total += 1;
                let negatives = rules
                    .iter()
                    .filter(|c| c.constraint.is_negative())
                    .count();
                if negatives > 0 && negatives < rules.len() {
                    mixed += 1;
                }
            }
        }
        assert!(mixed * 2 > total, "polarity mixing collapsed: {mixed}/{total}");
    }
}
