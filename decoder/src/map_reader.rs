use log::debug;
use structures::{MapHeader, MapVersion, Room};

use crate::{
    constants::{
        LZ4_MAX_RATIO, MAP_HEADER_LENGTH, PARTITIONED_BUFFER_FACTOR, PLAIN_BUFFER_FACTOR,
    },
    cursor::bytes_from_hex,
    errors::{Error, Result},
    map_header::parse_map_header,
    pixel::expand_nibbles,
    rooms::parse_room_block,
};

/// A fully decoded map record. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    header: MapHeader,
    pixels: Vec<u8>,
    rooms: Vec<Room>,
}

impl Map {
    /// Decode a raw map record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = parse_map_header(data)?;
        let body = &data[MAP_HEADER_LENGTH..];

        let (pixels, rooms) = match header.version {
            MapVersion::Plain => (decode_plain(&header, body)?, Vec::new()),
            MapVersion::Partitioned => decode_partitioned(&header, body)?,
            MapVersion::FloorMaterial => {
                return Err(Error::UnsupportedMapVersion {
                    version: header.version.as_u8(),
                })
            }
        };

        debug!(
            "decoded {}x{} map with {} rooms",
            header.width,
            header.height,
            rooms.len()
        );

        Ok(Self {
            header,
            pixels,
            rooms,
        })
    }

    /// Decode a map record handed over as hexadecimal text.
    pub fn parse_hex(text: &str) -> Result<Self> {
        Self::parse(&bytes_from_hex(text)?)
    }

    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    /// Row-major pixel codes, exactly `width * height` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.header.width || y >= self.header.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.header.width as usize + x as usize)
            .copied()
    }
}

/// LZ4 block decompression into a buffer of at most `bound` bytes.
///
/// The buffer never exceeds what an LZ4 block of this size can expand to, so
/// a corrupt header count cannot force a huge allocation.
pub(crate) fn decompress(compressed: &[u8], bound: usize) -> Result<Vec<u8>> {
    let capacity = bound.min(compressed.len().saturating_mul(LZ4_MAX_RATIO));
    let mut out = vec![0u8; capacity];
    let written = lz4_flex::block::decompress_into(compressed, &mut out).map_err(|err| {
        Error::DecompressionFailure {
            bound,
            reason: err.to_string(),
        }
    })?;
    out.truncate(written);
    Ok(out)
}

fn require_compressed(header: &MapHeader) -> Result<()> {
    if header.compressed_length == 0 {
        return Err(Error::DecompressionFailure {
            bound: 0,
            reason: "uncompressed map payloads are not supported".to_string(),
        });
    }
    Ok(())
}

fn shortfall(header: &MapHeader, got: usize) -> Error {
    Error::DecompressionFailure {
        bound: header.area(),
        reason: format!(
            "payload holds {} pixels, {}x{} map needs {}",
            got,
            header.width,
            header.height,
            header.area()
        ),
    }
}

fn decode_plain(header: &MapHeader, body: &[u8]) -> Result<Vec<u8>> {
    require_compressed(header)?;

    let bound = (header.total_count as usize).saturating_mul(PLAIN_BUFFER_FACTOR);
    let packed = decompress(body, bound)?;

    let area = header.area();
    if packed.len() * 2 < area {
        return Err(shortfall(header, packed.len() * 2));
    }

    let mut pixels: Vec<u8> = packed.iter().flat_map(|&b| expand_nibbles(b)).collect();
    pixels.truncate(area);
    Ok(pixels)
}

fn decode_partitioned(header: &MapHeader, body: &[u8]) -> Result<(Vec<u8>, Vec<Room>)> {
    require_compressed(header)?;

    let declared = header.total_count as usize;
    if body.len() < declared {
        // Normal for device maps; the body is read as far as it goes.
        debug!(
            "map body has {} bytes, header declares {}",
            body.len(),
            declared
        );
    }
    let compressed = &body[..declared.min(body.len())];

    let bound = declared.saturating_mul(PARTITIONED_BUFFER_FACTOR);
    let mut decoded = decompress(compressed, bound)?;

    let area = header.area();
    if decoded.len() < area {
        return Err(shortfall(header, decoded.len()));
    }

    let room_block = decoded.split_off(area);
    let rooms = parse_room_block(&room_block)?;

    Ok((decoded, rooms))
}
