/// Map header size in bytes (48 hex digits in the text encoding).
pub const MAP_HEADER_LENGTH: usize = 24;

/// Path header size in bytes (26 hex digits in the text encoding).
pub const PATH_HEADER_LENGTH: usize = 13;

/// Fixed-width leading section of every room record.
pub const ROOM_PROPERTIES_LENGTH: usize = 26;

/// Room name slot: one length byte followed by padded name bytes.
pub const ROOM_NAME_SLOT_LENGTH: usize = 20;
pub const MAX_ROOM_NAME_LENGTH: usize = ROOM_NAME_SLOT_LENGTH - 1;

pub const MAX_ROOM_ID: u16 = 255;

/// Raw coordinates are stored in tenths of a map unit.
pub const COORDINATE_SCALE: f64 = 10.0;

/// Decompression bound multipliers, relative to the header's total count.
pub const PLAIN_BUFFER_FACTOR: usize = 8;
pub const PARTITIONED_BUFFER_FACTOR: usize = 4;
pub const PATH_BUFFER_FACTOR: usize = 4;

/// Upper bound on how far one LZ4 block byte can expand.
pub const LZ4_MAX_RATIO: usize = 255;
