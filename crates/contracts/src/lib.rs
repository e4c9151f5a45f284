//! Cross-boundary vocabulary and serialized views for scenario generation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}

pub const COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];

impl Color {
    pub fn is_warm(self) -> bool {
        matches!(self, Color::Red | Color::Yellow)
    }

    pub fn is_cool(self) -> bool {
        !self.is_warm()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
            Color::Green => "Green",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Style {
    Modern,
    Antique,
    Retro,
    Unusual,
}

pub const STYLES: [Style; 4] = [Style::Modern, Style::Antique, Style::Retro, Style::Unusual];

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Style::Modern => "Modern",
            Style::Antique => "Antique",
            Style::Retro => "Retro",
            Style::Unusual => "Unusual",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Lamp,
    WallHanging,
    Curio,
}

pub const OBJECT_TYPES: [ObjectType; 3] =
    [ObjectType::Lamp, ObjectType::WallHanging, ObjectType::Curio];

impl ObjectType {
    pub fn plural(self) -> &'static str {
        match self {
            ObjectType::Lamp => "lamps",
            ObjectType::WallHanging => "wall hangings",
            ObjectType::Curio => "curios",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Lamp => "Lamp",
            ObjectType::WallHanging => "Wall Hanging",
            ObjectType::Curio => "Curio",
        };
        write!(f, "{name}")
    }
}

/// Rulebook pairing of style and color per object type. For a given type the
/// mapping is a bijection, so a token's color is derived, never stored.
pub fn style_color(kind: ObjectType, style: Style) -> Color {
    match (kind, style) {
        (ObjectType::Lamp, Style::Modern) => Color::Blue,
        (ObjectType::Lamp, Style::Antique) => Color::Yellow,
        (ObjectType::Lamp, Style::Retro) => Color::Red,
        (ObjectType::Lamp, Style::Unusual) => Color::Green,
        (ObjectType::WallHanging, Style::Modern) => Color::Red,
        (ObjectType::WallHanging, Style::Antique) => Color::Green,
        (ObjectType::WallHanging, Style::Retro) => Color::Blue,
        (ObjectType::WallHanging, Style::Unusual) => Color::Yellow,
        (ObjectType::Curio, Style::Modern) => Color::Green,
        (ObjectType::Curio, Style::Antique) => Color::Blue,
        (ObjectType::Curio, Style::Retro) => Color::Yellow,
        (ObjectType::Curio, Style::Unusual) => Color::Red,
    }
}

/// Inverse of [`style_color`].
pub fn color_style(kind: ObjectType, color: Color) -> Style {
    match (kind, color) {
        (ObjectType::Lamp, Color::Blue) => Style::Modern,
        (ObjectType::Lamp, Color::Yellow) => Style::Antique,
        (ObjectType::Lamp, Color::Red) => Style::Retro,
        (ObjectType::Lamp, Color::Green) => Style::Unusual,
        (ObjectType::WallHanging, Color::Red) => Style::Modern,
        (ObjectType::WallHanging, Color::Green) => Style::Antique,
        (ObjectType::WallHanging, Color::Blue) => Style::Retro,
        (ObjectType::WallHanging, Color::Yellow) => Style::Unusual,
        (ObjectType::Curio, Color::Green) => Style::Modern,
        (ObjectType::Curio, Color::Blue) => Style::Antique,
        (ObjectType::Curio, Color::Yellow) => Style::Retro,
        (ObjectType::Curio, Color::Red) => Style::Unusual,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    Upstairs,
    Downstairs,
    LeftSide,
    RightSide,
}

pub const AREAS: [Area; 4] = [
    Area::Upstairs,
    Area::Downstairs,
    Area::LeftSide,
    Area::RightSide,
];

/// The two floors, for quantity comparisons scoped to a vertical area.
pub const VERTICAL_AREAS: [Area; 2] = [Area::Upstairs, Area::Downstairs];

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Area::Upstairs => "upstairs",
            Area::Downstairs => "downstairs",
            Area::LeftSide => "left side",
            Area::RightSide => "right side",
        };
        write!(f, "{name}")
    }
}

/// Declaration order matches lexicographic order of the display names, so the
/// derived `Ord` is the canonical room order used by fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoomName {
    Bathroom,
    Bedroom,
    BedroomA,
    BedroomB,
    Kitchen,
    LivingRoom,
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoomName::Bathroom => "Bathroom",
            RoomName::Bedroom => "Bedroom",
            RoomName::BedroomA => "Bedroom A",
            RoomName::BedroomB => "Bedroom B",
            RoomName::Kitchen => "Kitchen",
            RoomName::LivingRoom => "Living Room",
        };
        write!(f, "{name}")
    }
}

/// Grid-order room set for a player count: (0,0) (0,1) upstairs,
/// (1,0) (1,1) downstairs, left column first in each row.
pub fn rooms_for(num_players: u8) -> [RoomName; 4] {
    if num_players == 2 {
        [
            RoomName::Bathroom,
            RoomName::Bedroom,
            RoomName::LivingRoom,
            RoomName::Kitchen,
        ]
    } else {
        [
            RoomName::BedroomA,
            RoomName::BedroomB,
            RoomName::LivingRoom,
            RoomName::Kitchen,
        ]
    }
}

/// The two rooms of an area, in grid order.
pub fn area_rooms(num_players: u8, area: Area) -> [RoomName; 2] {
    let [a, b, c, d] = rooms_for(num_players);
    match area {
        Area::Upstairs => [a, b],
        Area::Downstairs => [c, d],
        Area::LeftSide => [a, c],
        Area::RightSide => [b, d],
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{name}")
    }
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Difficulty> {
        match raw {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Formal,
    Casual,
    Passionate,
    Neutral,
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Voice::Formal => "formal",
            Voice::Casual => "casual",
            Voice::Passionate => "passionate",
            Voice::Neutral => "neutral",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    Paint,
    Swap,
    Remove,
    Add,
}

pub const MOVE_KINDS: [MoveKind; 4] = [
    MoveKind::Paint,
    MoveKind::Swap,
    MoveKind::Remove,
    MoveKind::Add,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveWeights {
    pub paint: f64,
    pub swap: f64,
    pub remove: f64,
    pub add: f64,
}

impl MoveWeights {
    pub fn weight(&self, kind: MoveKind) -> f64 {
        match kind {
            MoveKind::Paint => self.paint,
            MoveKind::Swap => self.swap,
            MoveKind::Remove => self.remove,
            MoveKind::Add => self.add,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerturbationOverrides {
    #[serde(default)]
    pub num_perturbations: Option<u32>,
    #[serde(default)]
    pub min_violations_per_player: Option<usize>,
    #[serde(default)]
    pub allowed_moves: Option<Vec<MoveKind>>,
    #[serde(default)]
    pub move_weights: Option<MoveWeights>,
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateConfig {
    #[serde(default = "default_num_players")]
    pub num_players: u8,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Absent seed: derived from the wall clock, not reproducible.
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub perturbation: Option<PerturbationOverrides>,
    #[serde(default)]
    pub warm_cool_bias: Option<f64>,
}

fn default_num_players() -> u8 {
    2
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            num_players: default_num_players(),
            difficulty: Difficulty::default(),
            seed: None,
            perturbation: None,
            warm_cool_bias: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub style: Style,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub name: String,
    pub wall_color: Color,
    pub lamp: Option<TokenView>,
    pub wall_hanging: Option<TokenView>,
    pub curio: Option<TokenView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub num_players: u8,
    pub rooms: Vec<RoomView>,
    pub layout: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    /// 1-based player id.
    pub id: u8,
    pub voice: Voice,
    pub constraints: Vec<ConditionText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub num_players: u8,
    pub difficulty: Difficulty,
    pub initial_board: BoardView,
    pub solution_board: BoardView,
    pub players: Vec<PlayerView>,
    pub perturbation_log: Vec<String>,
}
