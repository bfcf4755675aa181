use log::{debug, warn};
use structures::{PathHeader, Point};

use crate::{
    constants::{PATH_BUFFER_FACTOR, PATH_HEADER_LENGTH},
    cursor::{bytes_from_hex, combine_high_low, Cursor},
    errors::{Error, Result},
    map_header::scale_coordinate,
    map_reader::decompress,
};

/// Reinterpret a combined 16-bit value as signed. 32768 itself is left as is.
pub fn correct_sign(raw: u16) -> i32 {
    let raw = raw as i32;
    if raw > 32768 {
        raw - 65536
    } else {
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Negate y after scaling so the path matches image coordinates.
    pub invert_y: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self { invert_y: true }
    }
}

pub fn parse_path_header(data: &[u8]) -> Result<PathHeader> {
    if data.len() < PATH_HEADER_LENGTH {
        return Err(Error::malformed(
            data.len(),
            format!(
                "path header needs {} bytes, record has {}",
                PATH_HEADER_LENGTH,
                data.len()
            ),
        ));
    }

    let mut c = Cursor::new(&data[..PATH_HEADER_LENGTH]);
    let version = c.read_u8()?;
    let id = c.read_u16()?;
    let force_update = c.read_u8()? != 0;
    let kind = c.read_u8()?;
    let total_count = c.read_u32()?;
    let theta = c.read_u16()?;
    let compressed_length = c.read_u16()?;

    Ok(PathHeader {
        version,
        id,
        force_update,
        kind,
        theta,
        total_count,
        compressed_length,
    })
}

/// A decoded robot path, points in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    header: PathHeader,
    points: Vec<Point>,
}

impl Path {
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with(data, PathOptions::default())
    }

    pub fn parse_hex(text: &str) -> Result<Self> {
        Self::parse(&bytes_from_hex(text)?)
    }

    pub fn parse_with(data: &[u8], options: PathOptions) -> Result<Self> {
        let header = parse_path_header(data)?;
        let body = &data[PATH_HEADER_LENGTH..];

        let decompressed;
        let stream = if header.compressed_length != 0 {
            let bound = (header.total_count as usize).saturating_mul(PATH_BUFFER_FACTOR);
            decompressed = decompress(body, bound)?;
            decompressed.as_slice()
        } else {
            body
        };

        if stream.len() % 4 != 0 {
            let start = if header.compressed_length != 0 {
                0
            } else {
                PATH_HEADER_LENGTH
            };
            return Err(Error::malformed(
                start + stream.len() - stream.len() % 4,
                format!("point stream of {} bytes ends mid-point", stream.len()),
            ));
        }

        let mut points = Vec::with_capacity(stream.len() / 4);
        for group in stream.chunks_exact(4) {
            let x = scale_coordinate(correct_sign(combine_high_low(group[0], group[1])))?;
            let mut y = scale_coordinate(correct_sign(combine_high_low(group[2], group[3])))?;
            if options.invert_y {
                y = -y;
            }
            points.push(Point::new(x, y));
        }

        let path = Self { header, points };
        if !path.is_full() {
            warn!(
                "path {} declares {} points, decoded {}",
                path.header.id,
                path.start_count(),
                path.current_count()
            );
        }
        debug!("decoded path {:?} with {} points", path.header, path.points.len());

        Ok(path)
    }

    pub fn header(&self) -> &PathHeader {
        &self.header
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Most recent robot position.
    pub fn last_point(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// Points declared by the header.
    pub fn start_count(&self) -> usize {
        self.header.total_count as usize
    }

    /// Points actually decoded.
    pub fn current_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_full(&self) -> bool {
        self.current_count() == self.start_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::PathWriter;
    use rand::Rng;

    #[test]
    fn sign_correction_law() {
        assert_eq!(correct_sign(0), 0);
        assert_eq!(correct_sign(32767), 32767);
        assert_eq!(correct_sign(32768), 32768);
        assert_eq!(correct_sign(32769), -32767);
        assert_eq!(correct_sign(65535), -1);

        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let v: u16 = rng.gen();
            let expected = if v > 32768 { v as i32 - 65536 } else { v as i32 };
            assert_eq!(correct_sign(v), expected);
        }
    }

    #[test]
    fn parses_header_fields() {
        let data = [
            0x01, 0x00, 0x2a, 0x01, 0x00, // version, id, force update, kind
            0x00, 0x00, 0x00, 0x02, // total count
            0x00, 0x5a, // theta
            0x00, 0x00, // compressed length
        ];
        let header = parse_path_header(&data).unwrap();

        assert_eq!(header.version, 1);
        assert_eq!(header.id, 42);
        assert!(header.force_update);
        assert_eq!(header.kind, 0);
        assert_eq!(header.total_count, 2);
        assert_eq!(header.theta, 90);
        assert_eq!(header.compressed_length, 0);
        assert!(parse_path_header(&data[..12]).is_err());
    }

    #[test]
    fn decodes_compressed_points_in_order() {
        let data = PathWriter::new()
            .point(10, 20)
            .point(65526, 5)
            .point(0, 65535)
            .build();
        let path = Path::parse(&data).unwrap();

        assert_eq!(
            path.points(),
            &[
                Point::new(1.0, -2.0),
                Point::new(-1.0, -0.5),
                Point::new(0.0, 0.1),
            ]
        );
        assert_eq!(path.last_point(), Some(Point::new(0.0, 0.1)));
        assert!(path.is_full());
    }

    #[test]
    fn raw_stream_without_inversion() {
        let data = PathWriter::new()
            .point(123, 456)
            .uncompressed()
            .build();
        let path = Path::parse_with(&data, PathOptions { invert_y: false }).unwrap();

        assert_eq!(path.points(), &[Point::new(12.3, 45.6)]);
        assert_eq!(path.header().compressed_length, 0);
    }

    #[test]
    fn short_stream_is_reported_not_rejected() {
        let data = PathWriter::new()
            .point(1, 1)
            .point(2, 2)
            .total_count(5)
            .uncompressed()
            .build();
        let path = Path::parse(&data).unwrap();

        assert_eq!(path.start_count(), 5);
        assert_eq!(path.current_count(), 2);
        assert!(!path.is_full());
    }

    #[test]
    fn dangling_bytes_are_malformed() {
        let mut data = PathWriter::new().point(1, 1).uncompressed().build();
        data.extend_from_slice(&[0x00, 0x01]);

        assert!(matches!(
            Path::parse(&data),
            Err(Error::MalformedInput { offset: 17, .. })
        ));
    }

    #[test]
    fn empty_path_decodes() {
        let data = PathWriter::new().uncompressed().build();
        let path = Path::parse(&data).unwrap();
        assert!(path.points().is_empty());
        assert_eq!(path.last_point(), None);
        assert!(path.is_full());
    }
}
