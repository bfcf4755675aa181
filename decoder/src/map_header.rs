use log::debug;
use structures::{MapHeader, MapKind, MapVersion, Point};

use crate::{
    constants::{COORDINATE_SCALE, MAP_HEADER_LENGTH},
    cursor::Cursor,
    errors::{Error, Result},
};

/// Convert a raw tenths value into map units, rounded to one decimal.
pub fn scale_coordinate(raw: i32) -> Result<f64> {
    if !(i16::MIN as i32..=u16::MAX as i32).contains(&raw) {
        return Err(Error::InvalidCoordinate {
            reason: format!("raw value {} is outside the 16-bit range", raw),
        });
    }

    let scaled = raw as f64 / COORDINATE_SCALE;
    Ok((scaled * 10.0).round() / 10.0)
}

/// Parse the fixed map header from the start of a map record.
pub fn parse_map_header(data: &[u8]) -> Result<MapHeader> {
    if data.len() < MAP_HEADER_LENGTH {
        return Err(Error::malformed(
            data.len(),
            format!(
                "map header needs {} bytes, record has {}",
                MAP_HEADER_LENGTH,
                data.len()
            ),
        ));
    }

    let mut c = Cursor::new(&data[..MAP_HEADER_LENGTH]);

    let raw_version = c.read_u8()?;
    let version = MapVersion::from_u8(raw_version).ok_or(Error::UnsupportedMapVersion {
        version: raw_version,
    })?;
    let id = c.read_u16()?;
    let raw_kind = c.read_u8()?;
    let kind = MapKind::from_u8(raw_kind).ok_or(Error::UnsupportedMapKind { kind: raw_kind })?;

    let width = c.read_u16()?;
    let height = c.read_u16()?;
    let origin_x = c.read_u16()?;
    let origin_y = c.read_u16()?;
    let resolution = c.read_u16()?;
    let dock_x = c.read_u16()?;
    let dock_y = c.read_u16()?;
    // Occupies the two reserved words before the compressed length.
    let total_count = c.read_u32()?;
    let compressed_length = c.read_u16()?;

    if width == 0 || height == 0 {
        return Err(Error::malformed(
            4,
            format!("empty map dimensions {}x{}", width, height),
        ));
    }

    let header = MapHeader {
        version,
        id,
        kind,
        width,
        height,
        origin: Point::new(
            scale_coordinate(origin_x.into())?,
            scale_coordinate(origin_y.into())?,
        ),
        resolution,
        dock: Point::new(
            scale_coordinate(dock_x.into())?,
            scale_coordinate(dock_y.into())?,
        ),
        total_count,
        compressed_length,
        room_editable: kind != MapKind::Layout,
    };

    debug!("parsed map header {:?}", header);

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::MapWriter;

    fn reference_header() -> Vec<u8> {
        MapWriter::new(MapVersion::Partitioned, 601, 601)
            .origin(3000, 3000)
            .dock(3020, 3000)
            .total_count(361391)
            .compressed_length(27666)
            .header_bytes()
    }

    #[test]
    fn parses_reference_header() {
        let header = parse_map_header(&reference_header()).unwrap();

        assert_eq!(header.version, MapVersion::Partitioned);
        assert_eq!(header.id, 0);
        assert_eq!(header.kind, MapKind::Layout);
        assert_eq!(header.total_count, 361391);
        assert_eq!(header.width, 601);
        assert_eq!(header.height, 601);
        assert_eq!(header.origin, Point::new(300.0, 300.0));
        assert_eq!(header.resolution, 0);
        assert_eq!(header.dock, Point::new(302.0, 300.0));
        assert_eq!(header.compressed_length, 27666);
        assert!(!header.room_editable);
    }

    #[test]
    fn reads_fields_at_fixed_offsets() {
        let data = [
            0x00, 0x01, 0x02, 0x01, // version, id, kind
            0x00, 0x10, 0x00, 0x20, // width, height
            0x00, 0x7b, 0x01, 0xc8, // origin 12.3, 45.6
            0x00, 0x05, // resolution
            0x00, 0x0a, 0x00, 0x14, // dock 1.0, 2.0
            0x00, 0x00, 0x01, 0x00, // total count
            0x00, 0x40, // compressed length
        ];
        let header = parse_map_header(&data).unwrap();

        assert_eq!(header.version, MapVersion::Plain);
        assert_eq!(header.id, 0x0102);
        assert_eq!(header.kind, MapKind::Path);
        assert_eq!((header.width, header.height), (16, 32));
        assert_eq!(header.origin, Point::new(12.3, 45.6));
        assert_eq!(header.resolution, 5);
        assert_eq!(header.dock, Point::new(1.0, 2.0));
        assert_eq!(header.total_count, 256);
        assert_eq!(header.compressed_length, 64);
        assert!(header.room_editable);
    }

    #[test]
    fn rejects_unknown_version_and_kind() {
        let mut data = reference_header();
        data[0] = 3;
        assert!(matches!(
            parse_map_header(&data),
            Err(Error::UnsupportedMapVersion { version: 3 })
        ));

        let mut data = reference_header();
        data[3] = 7;
        assert!(matches!(
            parse_map_header(&data),
            Err(Error::UnsupportedMapKind { kind: 7 })
        ));
    }

    #[test]
    fn rejects_short_or_empty_headers() {
        let data = reference_header();
        assert!(matches!(
            parse_map_header(&data[..20]),
            Err(Error::MalformedInput { .. })
        ));

        let data = MapWriter::new(MapVersion::Plain, 0, 10).header_bytes();
        assert!(matches!(
            parse_map_header(&data),
            Err(Error::MalformedInput { .. })
        ));
    }

    #[test]
    fn scales_tenths_to_one_decimal() {
        assert_eq!(scale_coordinate(3020).unwrap(), 302.0);
        assert_eq!(scale_coordinate(-15).unwrap(), -1.5);
        assert_eq!(scale_coordinate(65535).unwrap(), 6553.5);
        assert!(matches!(
            scale_coordinate(70000),
            Err(Error::InvalidCoordinate { .. })
        ));
    }
}
