/// Semantic category of a canonical pixel code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelKind {
    Background,
    Wall,
    Floor,
    /// Floor belonging to the room with this id (1..=59).
    Room(u8),
    /// One of the four high-numbered room slots (ids 60..=63).
    Special(u8),
    Unknown,
}

pub const BACKGROUND_CODE: u8 = 0xff;
pub const WALL_CODE: u8 = 0x01;
pub const FLOOR_CODE: u8 = 0x00;
pub const UNKNOWN_CODE: u8 = 0x02;

pub const FIRST_SPECIAL_ROOM: u8 = 60;

/// Canonical code for each 4-bit value of a plain (version 0) bitmap.
pub const NIBBLE_CODES: [u8; 16] = {
    let mut codes = [UNKNOWN_CODE; 16];
    codes[0] = BACKGROUND_CODE;
    codes[1] = WALL_CODE;
    codes[2] = FLOOR_CODE;
    codes
};

const fn classify(code: u8) -> PixelKind {
    if code == BACKGROUND_CODE {
        return PixelKind::Background;
    }

    let room = code >> 2;
    match code & 0b11 {
        0b01 => PixelKind::Wall,
        0b00 if room == 0 => PixelKind::Floor,
        0b00 if room < FIRST_SPECIAL_ROOM => PixelKind::Room(room),
        0b00 => PixelKind::Special(room - FIRST_SPECIAL_ROOM),
        _ => PixelKind::Unknown,
    }
}

pub const PIXEL_KINDS: [PixelKind; 256] = {
    let mut kinds = [PixelKind::Unknown; 256];
    let mut code = 0;
    while code < 256 {
        kinds[code] = classify(code as u8);
        code += 1;
    }
    kinds
};

pub fn pixel_kind(code: u8) -> PixelKind {
    PIXEL_KINDS[code as usize]
}

/// Pixel code for floor belonging to room `id`.
pub fn room_code(id: u8) -> u8 {
    id << 2
}

/// Expand a packed byte into its two canonical codes, high nibble first.
pub fn expand_nibbles(byte: u8) -> [u8; 2] {
    [
        NIBBLE_CODES[(byte >> 4) as usize],
        NIBBLE_CODES[(byte & 0x0f) as usize],
    ]
}
