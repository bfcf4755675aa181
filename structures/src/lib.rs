#[macro_use]
extern crate serde_derive;

/// Decoding scheme declared by the first header byte of a map record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MapVersion {
    /// Version 0: 4-bit packed bitmap, no room data.
    Plain,
    /// Version 1: byte-per-pixel bitmap followed by room records.
    Partitioned,
    /// Version 2: recognised, never decoded.
    FloorMaterial,
}

impl MapVersion {
    pub fn from_u8(version: u8) -> Option<Self> {
        match version {
            0 => Some(MapVersion::Plain),
            1 => Some(MapVersion::Partitioned),
            2 => Some(MapVersion::FloorMaterial),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            MapVersion::Plain => 0,
            MapVersion::Partitioned => 1,
            MapVersion::FloorMaterial => 2,
        }
    }
}

/// Mirrors the record kind of the outer container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MapKind {
    Layout,
    Path,
}

impl MapKind {
    pub fn from_u8(kind: u8) -> Option<Self> {
        match kind {
            0 => Some(MapKind::Layout),
            1 => Some(MapKind::Path),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            MapKind::Layout => 0,
            MapKind::Path => 1,
        }
    }
}

/// A position in map units (raw tenths already divided by 10).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One polygon corner of a room outline, as stored on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Vertex {
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MapHeader {
    pub version: MapVersion,
    pub id: u16,
    pub kind: MapKind,
    pub width: u16,
    pub height: u16,
    pub origin: Point,
    pub resolution: u16,
    /// Dock (charging pile) position.
    pub dock: Point,
    pub total_count: u32,
    pub compressed_length: u16,
    pub room_editable: bool,
}

impl MapHeader {
    /// Number of cells in the pixel grid.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Room {
    pub id: u16,
    pub order: u16,
    pub sweep_count: u16,
    pub mop_count: u16,
    pub color_order: u8,
    pub sweep_forbidden: bool,
    pub mop_forbidden: bool,
    pub fan: u8,
    pub water_level: u8,
    pub y_mode: u8,
    pub name: String,
    pub vertex_count: u8,
    pub vertices: Vec<Vertex>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathHeader {
    pub version: u8,
    pub id: u16,
    pub force_update: bool,
    pub kind: u8,
    pub theta: u16,
    pub total_count: u32,
    pub compressed_length: u16,
}
