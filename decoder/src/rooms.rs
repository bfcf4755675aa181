use log::{debug, warn};
use structures::{Room, Vertex};

use crate::{
    constants::{MAX_ROOM_ID, MAX_ROOM_NAME_LENGTH, ROOM_NAME_SLOT_LENGTH, ROOM_PROPERTIES_LENGTH},
    cursor::Cursor,
    errors::{Error, Result},
};

/// Parse the room-metadata block that trails a partitioned bitmap.
///
/// Byte 0 is the block version, byte 1 the number of records. Each record is
/// 26 bytes of properties, a 20-byte name slot (length byte plus padded name),
/// a vertex count byte and the vertices. Records are walked using the
/// self-declared vertex count.
pub fn parse_room_block(block: &[u8]) -> Result<Vec<Room>> {
    if block.is_empty() {
        return Ok(Vec::new());
    }

    let mut c = Cursor::new(block);
    let block_version = c.read_u8()?;
    let room_count = c.read_u8().map_err(|_| Error::TruncatedRoomRecord {
        index: 0,
        field: "room count",
        offset: 1,
        need: 1,
        have: 0,
    })?;

    debug!(
        "room block version {} declares {} rooms in {} bytes",
        block_version,
        room_count,
        block.len()
    );

    let mut rooms = Vec::with_capacity(room_count as usize);
    for index in 0..room_count as usize {
        let room = parse_room(&mut c, index)?;
        debug!("room {}: {:?}", index, room);
        rooms.push(room);
    }

    Ok(rooms)
}

fn take<'a>(
    c: &mut Cursor<'a>,
    n: usize,
    index: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    let offset = c.position();
    c.read_bytes(n).map_err(|_| Error::TruncatedRoomRecord {
        index,
        field,
        offset,
        need: n,
        have: c.remaining(),
    })
}

fn parse_room(c: &mut Cursor, index: usize) -> Result<Room> {
    let properties = take(c, ROOM_PROPERTIES_LENGTH, index, "properties")?;
    let mut p = Cursor::new(properties);

    let id = p.read_u16()?;
    let order = p.read_u16()?;
    let sweep_count = p.read_u16()?;
    let mop_count = p.read_u16()?;
    let color_order = p.read_u8()?;
    let sweep_forbidden = p.read_u8()? != 0;
    let mop_forbidden = p.read_u8()? != 0;
    let fan = p.read_u8()?;
    let water_level = p.read_u8()?;
    let y_mode = p.read_u8()?;

    if id == 0 || id > MAX_ROOM_ID {
        warn!("room record {} has out-of-range id {}", index, id);
    }

    let name_offset = c.position();
    let slot = take(c, ROOM_NAME_SLOT_LENGTH, index, "name")?;
    let name_length = slot[0] as usize;
    if name_length > MAX_ROOM_NAME_LENGTH {
        return Err(Error::TruncatedRoomRecord {
            index,
            field: "name",
            offset: name_offset + 1,
            need: name_length,
            have: MAX_ROOM_NAME_LENGTH,
        });
    }
    let name = String::from_utf8_lossy(&slot[1..=name_length]).into_owned();

    let vertex_count = take(c, 1, index, "vertex count")?[0];
    let vertex_bytes = take(c, vertex_count as usize * 4, index, "vertices")?;
    let vertices = vertex_bytes
        .chunks_exact(4)
        .map(|v| Vertex {
            x: u16::from_be_bytes([v[0], v[1]]),
            y: u16::from_be_bytes([v[2], v[3]]),
        })
        .collect();

    Ok(Room {
        id,
        order,
        sweep_count,
        mop_count,
        color_order,
        sweep_forbidden,
        mop_forbidden,
        fan,
        water_level,
        y_mode,
        name,
        vertex_count,
        vertices,
    })
}
