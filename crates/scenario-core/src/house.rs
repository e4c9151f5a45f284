//! House state: four rooms on a 2x2 grid, three object slots per room.

use std::collections::BTreeMap;

use contracts::{
    area_rooms, rooms_for, style_color, Area, BoardView, Color, ObjectType, RoomName, RoomView,
    Style, TokenView, AREAS, OBJECT_TYPES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token {
    pub kind: ObjectType,
    pub style: Style,
}

impl Token {
    pub fn new(kind: ObjectType, style: Style) -> Self {
        Self { kind, style }
    }

    pub fn color(&self) -> Color {
        style_color(self.kind, self.style)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.style, self.color(), self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub name: RoomName,
    pub wall_color: Color,
    lamp: Option<Token>,
    wall_hanging: Option<Token>,
    curio: Option<Token>,
}

impl Room {
    fn new(name: RoomName) -> Self {
        Self {
            name,
            wall_color: Color::Red,
            lamp: None,
            wall_hanging: None,
            curio: None,
        }
    }

    pub fn object(&self, kind: ObjectType) -> Option<&Token> {
        match kind {
            ObjectType::Lamp => self.lamp.as_ref(),
            ObjectType::WallHanging => self.wall_hanging.as_ref(),
            ObjectType::Curio => self.curio.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: ObjectType) -> &mut Option<Token> {
        match kind {
            ObjectType::Lamp => &mut self.lamp,
            ObjectType::WallHanging => &mut self.wall_hanging,
            ObjectType::Curio => &mut self.curio,
        }
    }

    pub fn objects(&self) -> impl Iterator<Item = &Token> {
        [&self.lamp, &self.wall_hanging, &self.curio]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn object_count(&self) -> usize {
        self.objects().count()
    }

    pub fn has_style(&self, style: Style) -> bool {
        self.objects().any(|token| token.style == style)
    }

    pub fn has_object_color(&self, color: Color) -> bool {
        self.objects().any(|token| token.color() == color)
    }
}

/// Full board state. Rooms are stored in grid order: (0,0) (0,1) upstairs,
/// (1,0) (1,1) downstairs, left column first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct House {
    num_players: u8,
    rooms: [Room; 4],
}

impl House {
    /// Fresh house for a player count: all walls Red, every slot empty.
    pub fn new(num_players: u8) -> Self {
        let names = rooms_for(num_players);
        Self {
            num_players,
            rooms: names.map(Room::new),
        }
    }

    pub fn num_players(&self) -> u8 {
        self.num_players
    }

    pub fn rooms(&self) -> &[Room; 4] {
        &self.rooms
    }

    pub fn room_names(&self) -> [RoomName; 4] {
        rooms_for(self.num_players)
    }

    pub fn room(&self, name: RoomName) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    fn room_mut(&mut self, name: RoomName) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| room.name == name)
    }

    fn position(&self, name: RoomName) -> Option<(usize, usize)> {
        let names = self.room_names();
        let index = names.iter().position(|n| *n == name)?;
        Some((index / 2, index % 2))
    }

    fn at(&self, row: usize, col: usize) -> RoomName {
        self.room_names()[row * 2 + col]
    }

    pub fn above(&self, name: RoomName) -> Option<RoomName> {
        let (row, col) = self.position(name)?;
        (row == 1).then(|| self.at(0, col))
    }

    pub fn below(&self, name: RoomName) -> Option<RoomName> {
        let (row, col) = self.position(name)?;
        (row == 0).then(|| self.at(1, col))
    }

    pub fn beside(&self, name: RoomName) -> Option<RoomName> {
        let (row, col) = self.position(name)?;
        Some(self.at(row, 1 - col))
    }

    pub fn diagonal(&self, name: RoomName) -> Option<RoomName> {
        let (row, col) = self.position(name)?;
        Some(self.at(1 - row, 1 - col))
    }

    /// Rook-adjacent pairs, each exactly once, lexicographically ordered.
    pub fn adjacent_pairs(&self) -> Vec<(RoomName, RoomName)> {
        let raw = [
            (self.at(0, 0), self.at(0, 1)),
            (self.at(1, 0), self.at(1, 1)),
            (self.at(0, 0), self.at(1, 0)),
            (self.at(0, 1), self.at(1, 1)),
        ];
        raw.into_iter().map(ordered).collect()
    }

    /// The two diagonal pairs, lexicographically ordered.
    pub fn diagonal_pairs(&self) -> Vec<(RoomName, RoomName)> {
        let raw = [
            (self.at(0, 0), self.at(1, 1)),
            (self.at(0, 1), self.at(1, 0)),
        ];
        raw.into_iter().map(ordered).collect()
    }

    pub fn rooms_in(&self, area: Area) -> [&Room; 2] {
        match area {
            Area::Upstairs => [&self.rooms[0], &self.rooms[1]],
            Area::Downstairs => [&self.rooms[2], &self.rooms[3]],
            Area::LeftSide => [&self.rooms[0], &self.rooms[2]],
            Area::RightSide => [&self.rooms[1], &self.rooms[3]],
        }
    }

    pub fn all_objects(&self) -> impl Iterator<Item = &Token> {
        self.rooms.iter().flat_map(Room::objects)
    }

    pub fn total_objects(&self) -> usize {
        self.all_objects().count()
    }

    pub fn count_wall_color(&self, color: Color) -> usize {
        self.rooms
            .iter()
            .filter(|room| room.wall_color == color)
            .count()
    }

    pub fn count_object_color(&self, color: Color) -> usize {
        self.all_objects()
            .filter(|token| token.color() == color)
            .count()
    }

    pub fn count_object_style(&self, style: Style) -> usize {
        self.all_objects()
            .filter(|token| token.style == style)
            .count()
    }

    pub fn count_object_type(&self, kind: ObjectType) -> usize {
        self.rooms
            .iter()
            .filter(|room| room.object(kind).is_some())
            .count()
    }

    pub fn count_warm_objects(&self) -> usize {
        self.all_objects()
            .filter(|token| token.color().is_warm())
            .count()
    }

    pub fn count_cool_objects(&self) -> usize {
        self.all_objects()
            .filter(|token| token.color().is_cool())
            .count()
    }

    /// Place a token in its slot. Fails (returning false, changing nothing)
    /// when the slot is occupied or the room is not on this board.
    pub fn add_object(&mut self, name: RoomName, token: Token) -> bool {
        match self.room_mut(name) {
            Some(room) => {
                let slot = room.slot_mut(token.kind);
                if slot.is_some() {
                    return false;
                }
                *slot = Some(token);
                true
            }
            None => false,
        }
    }

    /// Clear a slot, returning what it held.
    pub fn remove_object(&mut self, name: RoomName, kind: ObjectType) -> Option<Token> {
        self.room_mut(name)?.slot_mut(kind).take()
    }

    /// Replace an occupied slot with `token`, returning the previous token.
    /// An empty slot is left empty.
    pub fn swap_object(&mut self, name: RoomName, token: Token) -> Option<Token> {
        let slot = self.room_mut(name)?.slot_mut(token.kind);
        if slot.is_none() {
            return None;
        }
        slot.replace(token)
    }

    /// Repaint a room, returning the previous color.
    pub fn paint_room(&mut self, name: RoomName, color: Color) -> Color {
        match self.room_mut(name) {
            Some(room) => {
                let previous = room.wall_color;
                room.wall_color = color;
                previous
            }
            None => color,
        }
    }

    /// Canonical key for visited-set membership: rooms in lexicographic name
    /// order, wall color then the three slot styles (empty slot renders as
    /// the empty string). Equal fingerprints mean equal states.
    pub fn fingerprint(&self) -> String {
        let mut names = self.room_names();
        names.sort();
        let mut parts = Vec::with_capacity(16);
        for name in names {
            if let Some(room) = self.room(name) {
                parts.push(room.wall_color.to_string());
                for kind in OBJECT_TYPES {
                    parts.push(
                        room.object(kind)
                            .map(|token| token.style.to_string())
                            .unwrap_or_default(),
                    );
                }
            }
        }
        parts.join("|")
    }

    pub fn board_view(&self) -> BoardView {
        let rooms = self
            .rooms
            .iter()
            .map(|room| RoomView {
                name: room.name.to_string(),
                wall_color: room.wall_color,
                lamp: view_token(room.object(ObjectType::Lamp)),
                wall_hanging: view_token(room.object(ObjectType::WallHanging)),
                curio: view_token(room.object(ObjectType::Curio)),
            })
            .collect();
        let layout: BTreeMap<String, Vec<String>> = AREAS
            .iter()
            .map(|area| {
                (
                    area.to_string(),
                    area_rooms(self.num_players, *area)
                        .iter()
                        .map(|name| name.to_string())
                        .collect(),
                )
            })
            .collect();
        BoardView {
            num_players: self.num_players,
            rooms,
            layout,
        }
    }
}

fn ordered(pair: (RoomName, RoomName)) -> (RoomName, RoomName) {
    if pair.0 <= pair.1 {
        pair
    } else {
        (pair.1, pair.0)
    }
}

fn view_token(token: Option<&Token>) -> Option<TokenView> {
    token.map(|token| TokenView {
        style: token.style,
        color: token.color(),
    })
}
