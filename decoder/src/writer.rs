//! Encoders that produce map and path records in wire layout.
//!
//! Used to build fixtures for tests and tooling. Nothing here talks to a
//! device.

use structures::{MapKind, MapVersion, Room, Vertex};

use crate::constants::{MAX_ROOM_NAME_LENGTH, ROOM_NAME_SLOT_LENGTH, ROOM_PROPERTIES_LENGTH};

/// A room record as it will be written. Names longer than the slot are cut
/// to fit. The `declared_*` overrides let a record lie about its own lengths.
#[derive(Debug, Clone)]
pub struct RoomRecord {
    pub id: u16,
    pub order: u16,
    pub sweep_count: u16,
    pub mop_count: u16,
    pub flags: [u8; 6],
    pub name: Vec<u8>,
    pub vertices: Vec<Vertex>,
    pub declared_name_length: Option<u8>,
    pub declared_vertex_count: Option<u8>,
}

impl From<&Room> for RoomRecord {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            order: room.order,
            sweep_count: room.sweep_count,
            mop_count: room.mop_count,
            flags: [
                room.color_order,
                room.sweep_forbidden as u8,
                room.mop_forbidden as u8,
                room.fan,
                room.water_level,
                room.y_mode,
            ],
            name: room.name.as_bytes().to_vec(),
            vertices: room.vertices.clone(),
            declared_name_length: None,
            declared_vertex_count: None,
        }
    }
}

impl RoomRecord {
    fn encode_into(&self, buf: &mut Vec<u8>) {
        let start = buf.len();
        for word in [self.id, self.order, self.sweep_count, self.mop_count] {
            buf.extend_from_slice(&word.to_be_bytes());
        }
        buf.extend_from_slice(&self.flags);
        buf.resize(start + ROOM_PROPERTIES_LENGTH, 0);

        let name = &self.name[..self.name.len().min(MAX_ROOM_NAME_LENGTH)];
        let slot = buf.len();
        buf.push(self.declared_name_length.unwrap_or(name.len() as u8));
        buf.extend_from_slice(name);
        buf.resize(slot + ROOM_NAME_SLOT_LENGTH, 0);

        buf.push(
            self.declared_vertex_count
                .unwrap_or(self.vertices.len() as u8),
        );
        for vertex in &self.vertices {
            buf.extend_from_slice(&vertex.x.to_be_bytes());
            buf.extend_from_slice(&vertex.y.to_be_bytes());
        }
    }
}

/// Encode a room-metadata block: version byte, count byte, records.
pub fn encode_room_block(records: &[RoomRecord]) -> Vec<u8> {
    let mut buf = vec![0, records.len() as u8];
    for record in records {
        record.encode_into(&mut buf);
    }
    buf
}

pub struct MapWriter {
    version: MapVersion,
    id: u16,
    kind: MapKind,
    width: u16,
    height: u16,
    origin: (u16, u16),
    resolution: u16,
    dock: (u16, u16),
    total_count: Option<u32>,
    compressed_length: Option<u16>,
    pixels: Vec<u8>,
    packed: Vec<u8>,
    rooms: Vec<RoomRecord>,
}

impl MapWriter {
    pub fn new(version: MapVersion, width: u16, height: u16) -> Self {
        Self {
            version,
            id: 0,
            kind: MapKind::Layout,
            width,
            height,
            origin: (0, 0),
            resolution: 0,
            dock: (0, 0),
            total_count: None,
            compressed_length: None,
            pixels: Vec::new(),
            packed: Vec::new(),
            rooms: Vec::new(),
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn kind(mut self, kind: MapKind) -> Self {
        self.kind = kind;
        self
    }

    /// Origin in raw tenths.
    pub fn origin(mut self, x: u16, y: u16) -> Self {
        self.origin = (x, y);
        self
    }

    pub fn resolution(mut self, resolution: u16) -> Self {
        self.resolution = resolution;
        self
    }

    /// Dock position in raw tenths.
    pub fn dock(mut self, x: u16, y: u16) -> Self {
        self.dock = (x, y);
        self
    }

    pub fn total_count(mut self, total_count: u32) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn compressed_length(mut self, compressed_length: u16) -> Self {
        self.compressed_length = Some(compressed_length);
        self
    }

    /// Byte-per-pixel codes for partitioned maps.
    pub fn pixels(mut self, pixels: Vec<u8>) -> Self {
        self.pixels = pixels;
        self
    }

    /// Nibble-packed bytes for plain maps.
    pub fn packed(mut self, packed: Vec<u8>) -> Self {
        self.packed = packed;
        self
    }

    pub fn room(mut self, room: RoomRecord) -> Self {
        self.rooms.push(room);
        self
    }

    fn encode_header(&self, total_count: u32, compressed_length: u16) -> Vec<u8> {
        let mut buf = Vec::with_capacity(24);
        buf.push(self.version.as_u8());
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.push(self.kind.as_u8());
        for word in [
            self.width,
            self.height,
            self.origin.0,
            self.origin.1,
            self.resolution,
            self.dock.0,
            self.dock.1,
        ] {
            buf.extend_from_slice(&word.to_be_bytes());
        }
        buf.extend_from_slice(&total_count.to_be_bytes());
        buf.extend_from_slice(&compressed_length.to_be_bytes());
        buf
    }

    /// Header only, using the explicit counts (zero when unset).
    pub fn header_bytes(&self) -> Vec<u8> {
        self.encode_header(
            self.total_count.unwrap_or(0),
            self.compressed_length.unwrap_or(0),
        )
    }

    /// Full record: header followed by the LZ4-compressed payload.
    pub fn build(self) -> Vec<u8> {
        let payload = match self.version {
            MapVersion::Plain => self.packed.clone(),
            _ => {
                let mut payload = self.pixels.clone();
                if !self.rooms.is_empty() {
                    payload.extend(encode_room_block(&self.rooms));
                }
                payload
            }
        };
        let compressed = lz4_flex::block::compress(&payload);

        // Partitioned readers only take `total_count` compressed bytes.
        let total_count = self
            .total_count
            .unwrap_or(payload.len().max(compressed.len()) as u32);
        let compressed_length = self
            .compressed_length
            .unwrap_or(compressed.len() as u16);

        let mut buf = self.encode_header(total_count, compressed_length);
        buf.extend_from_slice(&compressed);
        buf
    }
}

pub struct PathWriter {
    version: u8,
    id: u16,
    force_update: bool,
    kind: u8,
    theta: u16,
    total_count: Option<u32>,
    compress: bool,
    points: Vec<(u16, u16)>,
}

impl Default for PathWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PathWriter {
    pub fn new() -> Self {
        Self {
            version: 1,
            id: 0,
            force_update: false,
            kind: 0,
            theta: 0,
            total_count: None,
            compress: true,
            points: Vec::new(),
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    pub fn theta(mut self, theta: u16) -> Self {
        self.theta = theta;
        self
    }

    /// Raw tenths, two's-complement for negative values.
    pub fn point(mut self, x: u16, y: u16) -> Self {
        self.points.push((x, y));
        self
    }

    pub fn total_count(mut self, total_count: u32) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn uncompressed(mut self) -> Self {
        self.compress = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut stream = Vec::with_capacity(self.points.len() * 4);
        for (x, y) in &self.points {
            stream.extend_from_slice(&x.to_be_bytes());
            stream.extend_from_slice(&y.to_be_bytes());
        }

        let (body, compressed_length) = if self.compress {
            let compressed = lz4_flex::block::compress(&stream);
            let len = compressed.len() as u16;
            (compressed, len)
        } else {
            (stream, 0)
        };

        let mut buf = Vec::with_capacity(13 + body.len());
        buf.push(self.version);
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf.push(self.force_update as u8);
        buf.push(self.kind);
        buf.extend_from_slice(
            &self
                .total_count
                .unwrap_or(self.points.len() as u32)
                .to_be_bytes(),
        );
        buf.extend_from_slice(&self.theta.to_be_bytes());
        buf.extend_from_slice(&compressed_length.to_be_bytes());
        buf.extend_from_slice(&body);
        buf
    }
}
