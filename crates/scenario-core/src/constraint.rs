//! The constraint catalogue and its evaluator.
//!
//! A closed sum type with per-variant parameter records; evaluation is one
//! exhaustive match, so an unknown kind cannot reach the evaluator.

use contracts::{area_rooms, Area, Color, ObjectType, RoomName, Style};

use crate::house::House;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constraint {
    // Room: wall color.
    WallColorIs { room: RoomName, color: Color },
    WallColorIsNot { room: RoomName, color: Color },
    WallWarm { room: RoomName },
    WallCool { room: RoomName },
    // Room: object presence, style, color.
    RoomHasType { room: RoomName, kind: ObjectType },
    RoomNoType { room: RoomName, kind: ObjectType },
    RoomHasStyle { room: RoomName, style: Style },
    RoomNoStyle { room: RoomName, style: Style },
    RoomHasColor { room: RoomName, color: Color },
    RoomNoColor { room: RoomName, color: Color },
    // Area.
    AreaHasType { area: Area, kind: ObjectType },
    AreaNoType { area: Area, kind: ObjectType },
    AreaHasColor { area: Area, color: Color },
    AreaNoColor { area: Area, color: Color },
    AreaHasStyle { area: Area, style: Style },
    AreaNoStyle { area: Area, style: Style },
    // Counts.
    ExactRoomsOfColor { color: Color, n: u32 },
    AtLeastTypeCount { kind: ObjectType, n: u32 },
    AtLeastColorObjects { color: Color, n: u32 },
    AtLeastStyleObjects { style: Style, n: u32 },
    AtLeastWarmObjects { n: u32 },
    AtLeastCoolObjects { n: u32 },
    NoColorInHouse { color: Color },
    // Global qualitative.
    AllTypeSameColor { kind: ObjectType, color: Color },
    AllTypeSameStyle { kind: ObjectType, style: Style },
    // Relational.
    ColorRoomCountsEqual { color_a: Color, color_b: Color },
    TypeRequiresType { kind_a: ObjectType, kind_b: ObjectType },
    StyleNeverDoubled { style: Style },
    // Spatial.
    NoColorAboveStyle { style: Style, color: Color },
    NoColorBelowStyle { style: Style, color: Color },
    NoColorBesideStyle { style: Style, color: Color },
    NoColorDiagonalStyle { style: Style, color: Color },
    DiagonalsSameWall,
    AdjacentWallsDiffer,
    // Conditional.
    WallForbidsStyle { color: Color, style: Style },
    WallForbidsObjectColor { wall: Color, object: Color },
    StylesNeverShareRoom { style_a: Style, style_b: Style },
    TypeRequiresWall { kind: ObjectType, color: Color },
    TypesNeverShareRoom { kind_a: ObjectType, kind_b: ObjectType },
    // Temperature and whole-house texture.
    WarmOutnumberCool,
    CoolOutnumberWarm,
    FurnishedRoomsMatchWall,
    NoRoomMatchesWall,
    ExclusionZone { color: Color, kind: ObjectType },
    // Quantity comparisons.
    ColorOutnumbersStyle { color: Color, style: Style },
    StyleOutnumbersColor { style: Style, color: Color },
    ColorOutnumbersColor { color_a: Color, color_b: Color },
    TypeInAreaOutnumbers {
        kind_a: ObjectType,
        area_a: Area,
        kind_b: ObjectType,
        area_b: Area,
    },
}

impl Constraint {
    /// Whether the state satisfies this constraint. Total and pure.
    pub fn eval(&self, s: &House) -> bool {
        match *self {
            // Room: wall color.
            Constraint::WallColorIs { room, color } => {
                s.room(room).map_or(false, |r| r.wall_color == color)
            }
            Constraint::WallColorIsNot { room, color } => {
                s.room(room).map_or(false, |r| r.wall_color != color)
            }
            Constraint::WallWarm { room } => {
                s.room(room).map_or(false, |r| r.wall_color.is_warm())
            }
            Constraint::WallCool { room } => {
                s.room(room).map_or(false, |r| r.wall_color.is_cool())
            }

            // Room: object presence, style, color.
            Constraint::RoomHasType { room, kind } => {
                s.room(room).map_or(false, |r| r.object(kind).is_some())
            }
            Constraint::RoomNoType { room, kind } => {
                s.room(room).map_or(false, |r| r.object(kind).is_none())
            }
            Constraint::RoomHasStyle { room, style } => {
                s.room(room).map_or(false, |r| r.has_style(style))
            }
            Constraint::RoomNoStyle { room, style } => {
                s.room(room).map_or(false, |r| !r.has_style(style))
            }
            Constraint::RoomHasColor { room, color } => {
                s.room(room).map_or(false, |r| r.has_object_color(color))
            }
            Constraint::RoomNoColor { room, color } => {
                s.room(room).map_or(false, |r| !r.has_object_color(color))
            }

            // Area.
            Constraint::AreaHasType { area, kind } => s
                .rooms_in(area)
                .iter()
                .any(|r| r.object(kind).is_some()),
            Constraint::AreaNoType { area, kind } => s
                .rooms_in(area)
                .iter()
                .all(|r| r.object(kind).is_none()),
            Constraint::AreaHasColor { area, color } => s
                .rooms_in(area)
                .iter()
                .any(|r| r.has_object_color(color)),
            Constraint::AreaNoColor { area, color } => !s
                .rooms_in(area)
                .iter()
                .any(|r| r.has_object_color(color)),
            Constraint::AreaHasStyle { area, style } => {
                s.rooms_in(area).iter().any(|r| r.has_style(style))
            }
            Constraint::AreaNoStyle { area, style } => {
                !s.rooms_in(area).iter().any(|r| r.has_style(style))
            }

            // Counts. "At least" is a strict >= on the count.
            Constraint::ExactRoomsOfColor { color, n } => s.count_wall_color(color) == n as usize,
            Constraint::AtLeastTypeCount { kind, n } => s.count_object_type(kind) >= n as usize,
            Constraint::AtLeastColorObjects { color, n } => {
                s.count_object_color(color) >= n as usize
            }
            Constraint::AtLeastStyleObjects { style, n } => {
                s.count_object_style(style) >= n as usize
            }
            Constraint::AtLeastWarmObjects { n } => s.count_warm_objects() >= n as usize,
            Constraint::AtLeastCoolObjects { n } => s.count_cool_objects() >= n as usize,
            Constraint::NoColorInHouse { color } => s.count_object_color(color) == 0,

            // Global qualitative: vacuously true below two instances.
            Constraint::AllTypeSameColor { kind, color } => {
                let tokens: Vec<_> = s
                    .rooms()
                    .iter()
                    .filter_map(|r| r.object(kind))
                    .collect();
                tokens.len() < 2 || tokens.iter().all(|t| t.color() == color)
            }
            Constraint::AllTypeSameStyle { kind, style } => {
                let tokens: Vec<_> = s
                    .rooms()
                    .iter()
                    .filter_map(|r| r.object(kind))
                    .collect();
                tokens.len() < 2 || tokens.iter().all(|t| t.style == style)
            }

            // Relational.
            Constraint::ColorRoomCountsEqual { color_a, color_b } => {
                s.count_wall_color(color_a) == s.count_wall_color(color_b)
            }
            Constraint::TypeRequiresType { kind_a, kind_b } => s
                .rooms()
                .iter()
                .all(|r| r.object(kind_a).is_none() || r.object(kind_b).is_some()),
            Constraint::StyleNeverDoubled { style } => s.rooms().iter().all(|r| {
                r.objects().filter(|t| t.style == style).count() <= 1
            }),

            // Spatial: quantified over rooms that carry the style, so a
            // style absent from the house satisfies the predicate.
            Constraint::NoColorAboveStyle { style, color } => {
                directional_clear(s, style, color, |s, name| s.above(name))
            }
            Constraint::NoColorBelowStyle { style, color } => {
                directional_clear(s, style, color, |s, name| s.below(name))
            }
            Constraint::NoColorBesideStyle { style, color } => {
                directional_clear(s, style, color, |s, name| s.beside(name))
            }
            Constraint::NoColorDiagonalStyle { style, color } => {
                directional_clear(s, style, color, |s, name| s.diagonal(name))
            }
            Constraint::DiagonalsSameWall => s.diagonal_pairs().iter().all(|(a, b)| {
                wall_of(s, *a) == wall_of(s, *b)
            }),
            Constraint::AdjacentWallsDiffer => s.adjacent_pairs().iter().all(|(a, b)| {
                wall_of(s, *a) != wall_of(s, *b)
            }),

            // Conditional.
            Constraint::WallForbidsStyle { color, style } => s
                .rooms()
                .iter()
                .all(|r| r.wall_color != color || !r.has_style(style)),
            Constraint::WallForbidsObjectColor { wall, object } => s
                .rooms()
                .iter()
                .all(|r| r.wall_color != wall || !r.has_object_color(object)),
            Constraint::StylesNeverShareRoom { style_a, style_b } => s
                .rooms()
                .iter()
                .all(|r| !(r.has_style(style_a) && r.has_style(style_b))),
            Constraint::TypeRequiresWall { kind, color } => s
                .rooms()
                .iter()
                .all(|r| r.object(kind).is_none() || r.wall_color == color),
            Constraint::TypesNeverShareRoom { kind_a, kind_b } => s
                .rooms()
                .iter()
                .all(|r| !(r.object(kind_a).is_some() && r.object(kind_b).is_some())),

            // Temperature and whole-house texture.
            Constraint::WarmOutnumberCool => s.count_warm_objects() > s.count_cool_objects(),
            Constraint::CoolOutnumberWarm => s.count_cool_objects() > s.count_warm_objects(),
            Constraint::FurnishedRoomsMatchWall => s.rooms().iter().all(|r| {
                r.object_count() == 0 || r.objects().any(|t| t.color() == r.wall_color)
            }),
            Constraint::NoRoomMatchesWall => s
                .rooms()
                .iter()
                .all(|r| !r.objects().any(|t| t.color() == r.wall_color)),
            Constraint::ExclusionZone { color, kind } => {
                let qualifying = s
                    .rooms()
                    .iter()
                    .filter(|r| r.wall_color == color && r.object(kind).is_some())
                    .count();
                qualifying <= 1
            }

            // Quantity comparisons.
            Constraint::ColorOutnumbersStyle { color, style } => {
                s.count_object_color(color) > s.count_object_style(style)
            }
            Constraint::StyleOutnumbersColor { style, color } => {
                s.count_object_style(style) > s.count_object_color(color)
            }
            Constraint::ColorOutnumbersColor { color_a, color_b } => {
                s.count_object_color(color_a) > s.count_object_color(color_b)
            }
            Constraint::TypeInAreaOutnumbers {
                kind_a,
                area_a,
                kind_b,
                area_b,
            } => area_type_count(s, area_a, kind_a) > area_type_count(s, area_b, kind_b),
        }
    }

    /// Prohibition kinds, for the assigner's polarity mixing.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Constraint::WallColorIsNot { .. }
                | Constraint::RoomNoType { .. }
                | Constraint::RoomNoStyle { .. }
                | Constraint::RoomNoColor { .. }
                | Constraint::AreaNoType { .. }
                | Constraint::AreaNoColor { .. }
                | Constraint::AreaNoStyle { .. }
                | Constraint::NoColorInHouse { .. }
                | Constraint::NoColorAboveStyle { .. }
                | Constraint::NoColorBelowStyle { .. }
                | Constraint::NoColorBesideStyle { .. }
                | Constraint::NoColorDiagonalStyle { .. }
                | Constraint::WallForbidsStyle { .. }
                | Constraint::WallForbidsObjectColor { .. }
                | Constraint::StylesNeverShareRoom { .. }
                | Constraint::TypesNeverShareRoom { .. }
                | Constraint::ExclusionZone { .. }
                | Constraint::AdjacentWallsDiffer
                | Constraint::NoRoomMatchesWall
        )
    }

    /// Kinds whose salience the warm/cool bias multiplies.
    pub fn is_temperature(&self) -> bool {
        matches!(
            self,
            Constraint::WallWarm { .. }
                | Constraint::WallCool { .. }
                | Constraint::AtLeastWarmObjects { .. }
                | Constraint::AtLeastCoolObjects { .. }
                | Constraint::WarmOutnumberCool
                | Constraint::CoolOutnumberWarm
        )
    }

    /// Stable per-kind label, used for kind-diversity tracking and stats.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Constraint::WallColorIs { .. } => "wall_color_is",
            Constraint::WallColorIsNot { .. } => "wall_color_is_not",
            Constraint::WallWarm { .. } => "wall_warm",
            Constraint::WallCool { .. } => "wall_cool",
            Constraint::RoomHasType { .. } => "room_has_type",
            Constraint::RoomNoType { .. } => "room_no_type",
            Constraint::RoomHasStyle { .. } => "room_has_style",
            Constraint::RoomNoStyle { .. } => "room_no_style",
            Constraint::RoomHasColor { .. } => "room_has_color",
            Constraint::RoomNoColor { .. } => "room_no_color",
            Constraint::AreaHasType { .. } => "area_has_type",
            Constraint::AreaNoType { .. } => "area_no_type",
            Constraint::AreaHasColor { .. } => "area_has_color",
            Constraint::AreaNoColor { .. } => "area_no_color",
            Constraint::AreaHasStyle { .. } => "area_has_style",
            Constraint::AreaNoStyle { .. } => "area_no_style",
            Constraint::ExactRoomsOfColor { .. } => "exact_rooms_of_color",
            Constraint::AtLeastTypeCount { .. } => "at_least_type_count",
            Constraint::AtLeastColorObjects { .. } => "at_least_color_objects",
            Constraint::AtLeastStyleObjects { .. } => "at_least_style_objects",
            Constraint::AtLeastWarmObjects { .. } => "at_least_warm_objects",
            Constraint::AtLeastCoolObjects { .. } => "at_least_cool_objects",
            Constraint::NoColorInHouse { .. } => "no_color_in_house",
            Constraint::AllTypeSameColor { .. } => "all_type_same_color",
            Constraint::AllTypeSameStyle { .. } => "all_type_same_style",
            Constraint::ColorRoomCountsEqual { .. } => "color_room_counts_equal",
            Constraint::TypeRequiresType { .. } => "type_requires_type",
            Constraint::StyleNeverDoubled { .. } => "style_never_doubled",
            Constraint::NoColorAboveStyle { .. } => "no_color_above_style",
            Constraint::NoColorBelowStyle { .. } => "no_color_below_style",
            Constraint::NoColorBesideStyle { .. } => "no_color_beside_style",
            Constraint::NoColorDiagonalStyle { .. } => "no_color_diagonal_style",
            Constraint::DiagonalsSameWall => "diagonals_same_wall",
            Constraint::AdjacentWallsDiffer => "adjacent_walls_differ",
            Constraint::WallForbidsStyle { .. } => "wall_forbids_style",
            Constraint::WallForbidsObjectColor { .. } => "wall_forbids_object_color",
            Constraint::StylesNeverShareRoom { .. } => "styles_never_share_room",
            Constraint::TypeRequiresWall { .. } => "type_requires_wall",
            Constraint::TypesNeverShareRoom { .. } => "types_never_share_room",
            Constraint::WarmOutnumberCool => "warm_outnumber_cool",
            Constraint::CoolOutnumberWarm => "cool_outnumber_warm",
            Constraint::FurnishedRoomsMatchWall => "furnished_rooms_match_wall",
            Constraint::NoRoomMatchesWall => "no_room_matches_wall",
            Constraint::ExclusionZone { .. } => "exclusion_zone",
            Constraint::ColorOutnumbersStyle { .. } => "color_outnumbers_style",
            Constraint::StyleOutnumbersColor { .. } => "style_outnumbers_color",
            Constraint::ColorOutnumbersColor { .. } => "color_outnumbers_color",
            Constraint::TypeInAreaOutnumbers { .. } => "type_in_area_outnumbers",
        }
    }

    /// Rooms this constraint talks about, for the room-diversity heuristics.
    /// Area references expand to the area's rooms.
    pub fn referenced_rooms(&self, num_players: u8) -> Vec<RoomName> {
        match *self {
            Constraint::WallColorIs { room, .. }
            | Constraint::WallColorIsNot { room, .. }
            | Constraint::WallWarm { room }
            | Constraint::WallCool { room }
            | Constraint::RoomHasType { room, .. }
            | Constraint::RoomNoType { room, .. }
            | Constraint::RoomHasStyle { room, .. }
            | Constraint::RoomNoStyle { room, .. }
            | Constraint::RoomHasColor { room, .. }
            | Constraint::RoomNoColor { room, .. } => vec![room],
            Constraint::AreaHasType { area, .. }
            | Constraint::AreaNoType { area, .. }
            | Constraint::AreaHasColor { area, .. }
            | Constraint::AreaNoColor { area, .. }
            | Constraint::AreaHasStyle { area, .. }
            | Constraint::AreaNoStyle { area, .. } => area_rooms(num_players, area).to_vec(),
            Constraint::TypeInAreaOutnumbers { area_a, area_b, .. } => {
                let mut rooms = area_rooms(num_players, area_a).to_vec();
                for room in area_rooms(num_players, area_b) {
                    if !rooms.contains(&room) {
                        rooms.push(room);
                    }
                }
                rooms
            }
            _ => Vec::new(),
        }
    }
}

fn wall_of(s: &House, name: RoomName) -> Option<Color> {
    s.room(name).map(|r| r.wall_color)
}

fn directional_clear(
    s: &House,
    style: Style,
    color: Color,
    partner: impl Fn(&House, RoomName) -> Option<RoomName>,
) -> bool {
    s.rooms().iter().filter(|r| r.has_style(style)).all(|r| {
        partner(s, r.name)
            .and_then(|name| wall_of(s, name))
            .map_or(true, |wall| wall != color)
    })
}

fn area_type_count(s: &House, area: Area, kind: ObjectType) -> usize {
    s.rooms_in(area)
        .iter()
        .filter(|r| r.object(kind).is_some())
        .count()
}
