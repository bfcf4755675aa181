//! Decoder for the compressed robot-vacuum map and path records.
//!
//! A map record is a fixed header followed by an LZ4 block; depending on the
//! header version the block holds a nibble-packed bitmap or a byte-per-pixel
//! bitmap followed by room records. A path record is a shorter header and a
//! stream of big-endian coordinate pairs.

mod constants;
pub mod cursor;
mod errors;
pub mod map_header;
mod map_reader;
mod path_reader;
pub mod pixel;
pub mod rooms;
pub mod writer;

pub use crate::constants::{MAP_HEADER_LENGTH, PATH_HEADER_LENGTH};
pub use crate::errors::{Error, Result};
pub use crate::map_header::{parse_map_header, scale_coordinate};
pub use crate::map_reader::Map;
pub use crate::path_reader::{correct_sign, parse_path_header, Path, PathOptions};
pub use structures;
