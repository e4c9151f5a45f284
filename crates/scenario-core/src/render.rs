//! Natural-language rendering with per-player voices.
//!
//! Templates keep to "must" / "must not" / "may" / "may not" so the voice
//! transforms can rewrite the modals mechanically.

use contracts::Voice;

use crate::constraint::Constraint;
use crate::rng::Mulberry32;

/// Voice cycle by player index (mod 5).
pub const PLAYER_VOICES: [Voice; 5] = [
    Voice::Formal,
    Voice::Casual,
    Voice::Passionate,
    Voice::Neutral,
    Voice::Formal,
];

pub fn voice_for(player_index: usize) -> Voice {
    PLAYER_VOICES[player_index % PLAYER_VOICES.len()]
}

const FORMAL_PREFIXES: [&str; 4] = [
    "It is essential that ",
    "I insist that ",
    "I require that ",
    "It is important that ",
];

const CASUAL_PREFIXES: [&str; 4] = [
    "I'd really like ",
    "I'd love for ",
    "I want ",
    "I'd prefer for ",
];

const PASSIONATE_PREFIXES: [&str; 4] = [
    "I absolutely need ",
    "I really, really need ",
    "I desperately want ",
    "It's vital to me for ",
];

/// Neutral-voice sentence for a constraint.
pub fn neutral_text(constraint: &Constraint) -> String {
    match *constraint {
        Constraint::WallColorIs { room, color } => {
            format!("The {room} must be painted {color}.")
        }
        Constraint::WallColorIsNot { room, color } => {
            format!("The {room} must not be painted {color}.")
        }
        Constraint::WallWarm { room } => format!("The {room} must be painted a warm color."),
        Constraint::WallCool { room } => format!("The {room} must be painted a cool color."),
        Constraint::RoomHasType { room, kind } => {
            format!("The {room} must contain a {}.", lower(kind))
        }
        Constraint::RoomNoType { room, kind } => {
            format!("The {room} must not contain a {}.", lower(kind))
        }
        Constraint::RoomHasStyle { room, style } => {
            format!("The {room} must contain at least one {} item.", lower(style))
        }
        Constraint::RoomNoStyle { room, style } => {
            format!("The {room} must not contain any {} items.", lower(style))
        }
        Constraint::RoomHasColor { room, color } => {
            format!("The {room} must contain at least one {color} object.")
        }
        Constraint::RoomNoColor { room, color } => {
            format!("The {room} must not contain any {color} objects.")
        }
        Constraint::AreaHasType { area, kind } => {
            format!("The {area} must contain a {}.", lower(kind))
        }
        Constraint::AreaNoType { area, kind } => {
            format!("The {area} must not contain any {}.", kind.plural())
        }
        Constraint::AreaHasColor { area, color } => {
            format!("The {area} must contain at least one {color} object.")
        }
        Constraint::AreaNoColor { area, color } => {
            format!("The {area} must not contain any {color} objects.")
        }
        Constraint::AreaHasStyle { area, style } => {
            format!("The {area} must contain at least one {} item.", lower(style))
        }
        Constraint::AreaNoStyle { area, style } => {
            format!("The {area} must not contain any {} items.", lower(style))
        }
        Constraint::ExactRoomsOfColor { color, n } => {
            format!("Exactly {n} {} must be painted {color}.", room_word(n))
        }
        Constraint::AtLeastTypeCount { kind, n } => {
            format!("There must be at least {n} {} in the house.", kind.plural())
        }
        Constraint::AtLeastColorObjects { color, n } => {
            format!(
                "There must be at least {n} {color} {} in the house.",
                object_word(n)
            )
        }
        Constraint::AtLeastStyleObjects { style, n } => {
            format!(
                "There must be at least {n} {} {} in the house.",
                lower(style),
                object_word(n)
            )
        }
        Constraint::AtLeastWarmObjects { n } => {
            format!(
                "There must be at least {n} warm-colored {} in the house.",
                object_word(n)
            )
        }
        Constraint::AtLeastCoolObjects { n } => {
            format!(
                "There must be at least {n} cool-colored {} in the house.",
                object_word(n)
            )
        }
        Constraint::NoColorInHouse { color } => {
            format!("There must not be any {color} objects in the house.")
        }
        Constraint::AllTypeSameColor { kind, color } => {
            format!("All {} in the house must be {color}.", kind.plural())
        }
        Constraint::AllTypeSameStyle { kind, style } => {
            format!("All {} in the house must be {}.", kind.plural(), lower(style))
        }
        Constraint::ColorRoomCountsEqual { color_a, color_b } => {
            format!("The number of {color_a} rooms must equal the number of {color_b} rooms.")
        }
        Constraint::TypeRequiresType { kind_a, kind_b } => {
            format!(
                "Any room with a {} must also contain a {}.",
                lower(kind_a),
                lower(kind_b)
            )
        }
        Constraint::StyleNeverDoubled { style } => {
            format!("No room may contain more than one {} item.", lower(style))
        }
        Constraint::NoColorAboveStyle { style, color } => {
            format!(
                "The room above any {} item must not be painted {color}.",
                lower(style)
            )
        }
        Constraint::NoColorBelowStyle { style, color } => {
            format!(
                "The room below any {} item must not be painted {color}.",
                lower(style)
            )
        }
        Constraint::NoColorBesideStyle { style, color } => {
            format!(
                "The room beside any {} item must not be painted {color}.",
                lower(style)
            )
        }
        Constraint::NoColorDiagonalStyle { style, color } => {
            format!(
                "The room diagonal from any {} item must not be painted {color}.",
                lower(style)
            )
        }
        Constraint::DiagonalsSameWall => {
            "Diagonally opposite rooms must be painted the same color.".to_string()
        }
        Constraint::AdjacentWallsDiffer => {
            "No two adjacent rooms may be painted the same color.".to_string()
        }
        Constraint::WallForbidsStyle { color, style } => {
            format!("A {color} room must not contain any {} items.", lower(style))
        }
        Constraint::WallForbidsObjectColor { wall, object } => {
            format!("A {wall} room must not contain any {object} objects.")
        }
        Constraint::StylesNeverShareRoom { style_a, style_b } => {
            let first = lower(style_a);
            let second = lower(style_b);
            format!(
                "No room may contain both {} {first} item and {} {second} item.",
                article(&first),
                article(&second)
            )
        }
        Constraint::TypeRequiresWall { kind, color } => {
            format!("Any room with a {} must be painted {color}.", lower(kind))
        }
        Constraint::TypesNeverShareRoom { kind_a, kind_b } => {
            format!(
                "No room may contain both a {} and a {}.",
                lower(kind_a),
                lower(kind_b)
            )
        }
        Constraint::WarmOutnumberCool => {
            "There must be more warm-colored objects than cool-colored objects in the house."
                .to_string()
        }
        Constraint::CoolOutnumberWarm => {
            "There must be more cool-colored objects than warm-colored objects in the house."
                .to_string()
        }
        Constraint::FurnishedRoomsMatchWall => {
            "Every room that contains objects must have at least one object matching its wall color."
                .to_string()
        }
        Constraint::NoRoomMatchesWall => {
            "No room may contain an object matching its wall color.".to_string()
        }
        Constraint::ExclusionZone { color, kind } => {
            format!("At most one {color} room may contain a {}.", lower(kind))
        }
        Constraint::ColorOutnumbersStyle { color, style } => {
            format!(
                "There must be more {color} objects than {} objects in the house.",
                lower(style)
            )
        }
        Constraint::StyleOutnumbersColor { style, color } => {
            format!(
                "There must be more {} objects than {color} objects in the house.",
                lower(style)
            )
        }
        Constraint::ColorOutnumbersColor { color_a, color_b } => {
            format!("There must be more {color_a} objects than {color_b} objects in the house.")
        }
        Constraint::TypeInAreaOutnumbers {
            kind_a,
            area_a,
            kind_b,
            area_b,
        } => {
            format!(
                "There must be more {} {area_a} than {} {area_b}.",
                kind_a.plural(),
                kind_b.plural()
            )
        }
    }
}

/// Render a constraint in a player's voice, drawing the prefix from the
/// player's own generator.
pub fn render(constraint: &Constraint, voice: Voice, rng: &mut Mulberry32) -> String {
    let text = neutral_text(constraint);
    let prefixes: &[&str] = match voice {
        Voice::Neutral => return text,
        Voice::Formal => &FORMAL_PREFIXES,
        Voice::Casual => &CASUAL_PREFIXES,
        Voice::Passionate => &PASSIONATE_PREFIXES,
    };
    let prefix = *rng.choice(prefixes);

    let stripped = text.strip_suffix('.').unwrap_or(&text);
    let mut core = lower_first(stripped);
    core = match voice {
        // Subjunctive: "the room must be" -> "the room be".
        Voice::Formal => core
            .replace(" must not ", " not ")
            .replace(" must ", " ")
            .replace(" may not ", " not ")
            .replace(" may ", " ")
            .replace("  ", " "),
        // Infinitive: "the room must be" -> "the room to be".
        _ => core
            .replace(" must not ", " not to ")
            .replace(" must ", " to ")
            .replace(" may not ", " not to ")
            .replace(" may ", " to "),
    };

    format!("{prefix}{core}.")
}

fn lower<T: std::fmt::Display>(value: T) -> String {
    value.to_string().to_lowercase()
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn room_word(n: u32) -> &'static str {
    if n == 1 {
        "room"
    } else {
        "rooms"
    }
}

fn object_word(n: u32) -> &'static str {
    if n == 1 {
        "object"
    } else {
        "objects"
    }
}
