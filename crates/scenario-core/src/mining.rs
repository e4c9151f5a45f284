//! Candidate mining: enumerate every constraint the state satisfies, scored
//! by salience. The scores are tuned weights; changing them changes what the
//! assigner prefers.

use contracts::{Area, ObjectType, Style, AREAS, COLORS, OBJECT_TYPES, STYLES, VERTICAL_AREAS};

use crate::constraint::Constraint;
use crate::house::House;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub constraint: Constraint,
    pub score: f64,
}

/// Every candidate is satisfied by `state`; that is the miner's contract.
pub fn mine_candidates(state: &House) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::new();
    let mut push = |constraint: Constraint, score: f64| {
        debug_assert!(constraint.eval(state), "mined candidate is false: {constraint:?}");
        out.push(Candidate { constraint, score });
    };

    let room_names = state.room_names();

    // Per-room.
    for name in room_names {
        let room = match state.room(name) {
            Some(room) => room,
            None => continue,
        };
        let furnished = room.object_count() > 0;

        for color in COLORS {
            if room.wall_color == color {
                push(Constraint::WallColorIs { room: name, color }, 6.0);
            } else {
                push(Constraint::WallColorIsNot { room: name, color }, 3.0);
            }
        }

        if room.wall_color.is_warm() {
            push(Constraint::WallWarm { room: name }, 4.0);
        } else {
            push(Constraint::WallCool { room: name }, 4.0);
        }

        for kind in OBJECT_TYPES {
            if room.object(kind).is_some() {
                push(Constraint::RoomHasType { room: name, kind }, 5.0);
            } else {
                let score = if furnished { 4.0 } else { 2.0 };
                push(Constraint::RoomNoType { room: name, kind }, score);
            }
        }

        for style in STYLES {
            if room.has_style(style) {
                push(Constraint::RoomHasStyle { room: name, style }, 5.5);
            } else {
                // A negation about an empty room says nearly nothing.
                let score = if furnished { 4.5 } else { 2.0 };
                push(Constraint::RoomNoStyle { room: name, style }, score);
            }
        }

        for color in COLORS {
            if room.has_object_color(color) {
                push(Constraint::RoomHasColor { room: name, color }, 5.0);
            } else {
                let score = if furnished { 4.0 } else { 2.0 };
                push(Constraint::RoomNoColor { room: name, color }, score);
            }
        }
    }

    // Per-area.
    for area in AREAS {
        let rooms = state.rooms_in(area);
        let area_furnished = rooms.iter().any(|room| room.object_count() > 0);

        for kind in OBJECT_TYPES {
            if rooms.iter().any(|room| room.object(kind).is_some()) {
                push(Constraint::AreaHasType { area, kind }, 6.0);
            } else {
                let score = if area_furnished { 5.5 } else { 2.0 };
                push(Constraint::AreaNoType { area, kind }, score);
            }
        }

        for color in COLORS {
            if rooms.iter().any(|room| room.has_object_color(color)) {
                push(Constraint::AreaHasColor { area, color }, 5.5);
            } else {
                let score = if area_furnished { 5.0 } else { 2.0 };
                push(Constraint::AreaNoColor { area, color }, score);
            }
        }

        for style in STYLES {
            if rooms.iter().any(|room| room.has_style(style)) {
                push(Constraint::AreaHasStyle { area, style }, 5.5);
            } else {
                let score = if area_furnished { 5.0 } else { 2.0 };
                push(Constraint::AreaNoStyle { area, style }, score);
            }
        }
    }

    // Wall-color counts and per-color object counts.
    for color in COLORS {
        let walls = state.count_wall_color(color) as u32;
        if (1..=3).contains(&walls) {
            let score = if walls <= 2 { 7.0 } else { 5.5 };
            push(Constraint::ExactRoomsOfColor { color, n: walls }, score);
        }

        let objects = state.count_object_color(color) as u32;
        if objects == 0 {
            push(Constraint::NoColorInHouse { color }, 6.0);
        } else {
            // The tightest two thresholds; tighter scores higher.
            for n in objects.saturating_sub(1).max(1)..=objects {
                let score = 4.0 + 2.5 * (f64::from(n) / f64::from(objects));
                push(Constraint::AtLeastColorObjects { color, n }, score);
            }
        }
    }

    for kind in OBJECT_TYPES {
        let count = state.count_object_type(kind) as u32;
        if count >= 2 {
            for n in (count - 1).max(2)..=count {
                let score = 4.0 + 2.0 * (f64::from(n) / f64::from(count));
                push(Constraint::AtLeastTypeCount { kind, n }, score);
            }
        }
    }

    for style in STYLES {
        let count = state.count_object_style(style) as u32;
        if count >= 2 {
            for n in (count - 1).max(2)..=count {
                let score = 4.0 + 2.0 * (f64::from(n) / f64::from(count));
                push(Constraint::AtLeastStyleObjects { style, n }, score);
            }
        }
    }

    // Global qualitative: only meaningful from two instances up.
    for kind in OBJECT_TYPES {
        let tokens: Vec<_> = state
            .rooms()
            .iter()
            .filter_map(|room| room.object(kind))
            .collect();
        if tokens.len() >= 2 {
            let first_color = tokens[0].color();
            if tokens.iter().all(|token| token.color() == first_color) {
                push(
                    Constraint::AllTypeSameColor {
                        kind,
                        color: first_color,
                    },
                    7.5,
                );
            }
            let first_style = tokens[0].style;
            if tokens.iter().all(|token| token.style == first_style) {
                push(
                    Constraint::AllTypeSameStyle {
                        kind,
                        style: first_style,
                    },
                    7.5,
                );
            }
        }
    }

    // Relational.
    for (i, color_a) in COLORS.iter().enumerate() {
        for color_b in &COLORS[i + 1..] {
            let count_a = state.count_wall_color(*color_a);
            if count_a == state.count_wall_color(*color_b) {
                let score = if count_a > 0 { 7.5 } else { 4.0 };
                push(
                    Constraint::ColorRoomCountsEqual {
                        color_a: *color_a,
                        color_b: *color_b,
                    },
                    score,
                );
            }
        }
    }

    for kind_a in OBJECT_TYPES {
        for kind_b in OBJECT_TYPES {
            if kind_a == kind_b {
                continue;
            }
            let has_any = state.count_object_type(kind_a) > 0;
            let holds = state
                .rooms()
                .iter()
                .all(|room| room.object(kind_a).is_none() || room.object(kind_b).is_some());
            if has_any && holds {
                push(Constraint::TypeRequiresType { kind_a, kind_b }, 8.0);
            }
        }
    }

    for style in STYLES {
        let exists = state.count_object_style(style) > 0;
        let never_doubled = state
            .rooms()
            .iter()
            .all(|room| room.objects().filter(|t| t.style == style).count() <= 1);
        if exists && never_doubled {
            push(Constraint::StyleNeverDoubled { style }, 6.5);
        }
    }

    // Temperature thresholds.
    let warm = state.count_warm_objects() as u32;
    let cool = state.count_cool_objects() as u32;
    if warm >= 2 {
        push(Constraint::AtLeastWarmObjects { n: warm }, 5.0);
    }
    if warm >= 3 {
        push(Constraint::AtLeastWarmObjects { n: warm - 1 }, 4.0);
    }
    if cool >= 2 {
        push(Constraint::AtLeastCoolObjects { n: cool }, 5.0);
    }
    if cool >= 3 {
        push(Constraint::AtLeastCoolObjects { n: cool - 1 }, 4.0);
    }
    if warm > cool {
        push(Constraint::WarmOutnumberCool, 5.5);
    }
    if cool > warm {
        push(Constraint::CoolOutnumberWarm, 5.5);
    }

    // Spatial. Directional kinds only when the style is actually present.
    for style in STYLES {
        if state.count_object_style(style) == 0 {
            continue;
        }
        for color in COLORS {
            let directional = [
                (Constraint::NoColorAboveStyle { style, color }, 6.5),
                (Constraint::NoColorBelowStyle { style, color }, 6.5),
                (Constraint::NoColorBesideStyle { style, color }, 6.5),
                (Constraint::NoColorDiagonalStyle { style, color }, 7.0),
            ];
            for (constraint, score) in directional {
                if constraint.eval(state) {
                    push(constraint, score);
                }
            }
        }
    }
    if Constraint::DiagonalsSameWall.eval(state) {
        push(Constraint::DiagonalsSameWall, 7.5);
    }
    if Constraint::AdjacentWallsDiffer.eval(state) {
        push(Constraint::AdjacentWallsDiffer, 8.0);
    }

    // Conditional. A forbid is worth more when the forbidden thing exists
    // somewhere else in the house.
    for color in COLORS {
        if state.count_wall_color(color) == 0 {
            continue;
        }
        for style in STYLES {
            let constraint = Constraint::WallForbidsStyle { color, style };
            if constraint.eval(state) {
                let score = if state.count_object_style(style) > 0 {
                    7.5
                } else {
                    5.0
                };
                push(constraint, score);
            }
        }
        for object in COLORS {
            let constraint = Constraint::WallForbidsObjectColor {
                wall: color,
                object,
            };
            if constraint.eval(state) {
                let score = if state.count_object_color(object) > 0 {
                    7.0
                } else {
                    4.5
                };
                push(constraint, score);
            }
        }
    }

    for (i, style_a) in STYLES.iter().enumerate() {
        for style_b in &STYLES[i + 1..] {
            if state.count_object_style(*style_a) == 0 || state.count_object_style(*style_b) == 0
            {
                continue;
            }
            let constraint = Constraint::StylesNeverShareRoom {
                style_a: *style_a,
                style_b: *style_b,
            };
            if constraint.eval(state) {
                push(constraint, 6.5);
            }
        }
    }

    for kind in OBJECT_TYPES {
        if state.count_object_type(kind) == 0 {
            continue;
        }
        for color in COLORS {
            let constraint = Constraint::TypeRequiresWall { kind, color };
            if constraint.eval(state) {
                push(constraint, 7.0);
            }
        }
    }

    for (i, kind_a) in OBJECT_TYPES.iter().enumerate() {
        for kind_b in &OBJECT_TYPES[i + 1..] {
            if state.count_object_type(*kind_a) == 0 || state.count_object_type(*kind_b) == 0 {
                continue;
            }
            let constraint = Constraint::TypesNeverShareRoom {
                kind_a: *kind_a,
                kind_b: *kind_b,
            };
            if constraint.eval(state) {
                push(constraint, 6.5);
            }
        }
    }

    // Whole-house texture.
    let any_furnished = state.rooms().iter().any(|room| room.object_count() > 0);
    if any_furnished && Constraint::FurnishedRoomsMatchWall.eval(state) {
        push(Constraint::FurnishedRoomsMatchWall, 7.0);
    }
    if any_furnished && Constraint::NoRoomMatchesWall.eval(state) {
        push(Constraint::NoRoomMatchesWall, 6.5);
    }
    for color in COLORS {
        for kind in OBJECT_TYPES {
            let qualifying = state
                .rooms()
                .iter()
                .filter(|room| room.wall_color == color && room.object(kind).is_some())
                .count();
            if qualifying == 1 {
                push(Constraint::ExclusionZone { color, kind }, 6.5);
            }
        }
    }

    // Quantity comparisons: wider gaps score higher.
    for color in COLORS {
        let color_count = state.count_object_color(color);
        for style in STYLES {
            let style_count = state.count_object_style(style);
            if color_count > style_count && color_count >= 2 {
                let diff = (color_count - style_count).min(3) as f64;
                push(Constraint::ColorOutnumbersStyle { color, style }, 6.0 + diff);
            }
            if style_count > color_count && style_count >= 2 {
                let diff = (style_count - color_count).min(3) as f64;
                push(Constraint::StyleOutnumbersColor { style, color }, 6.0 + diff);
            }
        }
    }

    for color_a in COLORS {
        let count_a = state.count_object_color(color_a);
        if count_a < 2 {
            continue;
        }
        for color_b in COLORS {
            if color_a == color_b {
                continue;
            }
            let count_b = state.count_object_color(color_b);
            if count_a > count_b {
                let diff = (count_a - count_b).min(3) as f64;
                push(
                    Constraint::ColorOutnumbersColor { color_a, color_b },
                    6.0 + diff,
                );
            }
        }
    }

    for kind_a in OBJECT_TYPES {
        for area_a in VERTICAL_AREAS {
            let count_a = floor_count(state, area_a, kind_a);
            for kind_b in OBJECT_TYPES {
                for area_b in VERTICAL_AREAS {
                    if kind_a == kind_b && area_a == area_b {
                        continue;
                    }
                    let count_b = floor_count(state, area_b, kind_b);
                    if count_a > count_b {
                        let diff = (count_a - count_b).min(3) as f64;
                        push(
                            Constraint::TypeInAreaOutnumbers {
                                kind_a,
                                area_a,
                                kind_b,
                                area_b,
                            },
                            6.0 + diff,
                        );
                    }
                }
            }
        }
    }

    out
}

fn floor_count(state: &House, area: Area, kind: ObjectType) -> usize {
    state
        .rooms_in(area)
        .iter()
        .filter(|room| room.object(kind).is_some())
        .count()
}
