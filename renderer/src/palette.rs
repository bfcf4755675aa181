use colors_transform::Color;
use image::Rgb;

use crate::errors::{RenderError, Result};

pub const BACKGROUND_COLOR: Rgb<u8> = Rgb([0x00, 0x6e, 0xe6]);
pub const WALL_COLOR: Rgb<u8> = Rgb([50, 50, 50]);
pub const FLOOR_COLOR: Rgb<u8> = Rgb([150, 150, 150]);
/// Drawn for codes with no known category.
pub const UNKNOWN_COLOR: Rgb<u8> = Rgb([20, 20, 20]);

/// Room colours, handed out by position in the room list and reused cyclically.
pub const ROOM_COLORS: [Rgb<u8>; 10] = [
    Rgb([0xe2, 0x7d, 0x60]),
    Rgb([0x85, 0xdc, 0xb0]),
    Rgb([0xe8, 0xa8, 0x7c]),
    Rgb([0xc3, 0x8d, 0x9e]),
    Rgb([0x41, 0xb3, 0xa3]),
    Rgb([0xf4, 0xd0, 0x6f]),
    Rgb([0x9a, 0x8f, 0xd8]),
    Rgb([0x7e, 0xb6, 0xe3]),
    Rgb([0xd7, 0x9c, 0xc9]),
    Rgb([0xa5, 0xc8, 0x6b]),
];

pub const SPECIAL_ROOM_COLORS: [Rgb<u8>; 4] = [
    Rgb([0xff, 0xa0, 0x7a]),
    Rgb([0x87, 0xce, 0xfa]),
    Rgb([0xda, 0xa5, 0x20]),
    Rgb([0x98, 0xfb, 0x98]),
];

/// Caller overrides for the four special room slots (rooms 60 to 63), as
/// `#rrggbb` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomColors {
    pub room_60: Option<String>,
    pub room_61: Option<String>,
    pub room_62: Option<String>,
    pub room_63: Option<String>,
}

impl RoomColors {
    fn slots(&self) -> [&Option<String>; 4] {
        [&self.room_60, &self.room_61, &self.room_62, &self.room_63]
    }
}

pub fn parse_hex_color(value: &str) -> Result<Rgb<u8>> {
    let color = colors_transform::Rgb::from_hex_str(value.trim()).map_err(|err| {
        RenderError::InvalidColor {
            value: value.to_string(),
            reason: format!("{:?}", err),
        }
    })?;

    Ok(Rgb([
        color.get_red() as u8,
        color.get_green() as u8,
        color.get_blue() as u8,
    ]))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub wall: Rgb<u8>,
    pub floor: Rgb<u8>,
    pub unknown: Rgb<u8>,
    pub rooms: Vec<Rgb<u8>>,
    pub special: [Rgb<u8>; 4],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            wall: WALL_COLOR,
            floor: FLOOR_COLOR,
            unknown: UNKNOWN_COLOR,
            rooms: ROOM_COLORS.to_vec(),
            special: SPECIAL_ROOM_COLORS,
        }
    }
}

impl Palette {
    pub fn with_room_colors(overrides: &RoomColors) -> Result<Self> {
        let mut palette = Self::default();
        for (slot, value) in overrides.slots().into_iter().enumerate() {
            if let Some(value) = value {
                palette.special[slot] = parse_hex_color(value)?;
            }
        }
        Ok(palette)
    }

    /// Colour for the room at `index` in the map's room list.
    pub fn room(&self, index: usize) -> Rgb<u8> {
        if self.rooms.is_empty() {
            return self.floor;
        }
        self.rooms[index % self.rooms.len()]
    }
}
