use decoder::{structures::Point, Error, Path};
use image::{Rgba, RgbaImage};

use crate::errors::Result;

/// Path layer pixels per map cell.
pub const PATH_SCALE: u32 = 8;

pub const PATH_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const PATH_WIDTH: f64 = 8.0;

pub const MARKER_RING_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const DOCK_COLOR: Rgba<u8> = Rgba([0, 128, 0, 255]);
pub const ROBOT_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const MARKER_OUTER_RADIUS: f64 = 20.0;
pub const MARKER_INNER_RADIUS: f64 = 16.0;

pub fn fill_circle(canvas: &mut RgbaImage, center: (f64, f64), radius: f64, color: Rgba<u8>) {
    let (cx, cy) = center;
    let x0 = (cx - radius).floor().max(0.0) as i64;
    let y0 = (cy - radius).floor().max(0.0) as i64;
    let x1 = ((cx + radius).ceil() as i64).min(canvas.width() as i64 - 1);
    let y1 = ((cy + radius).ceil() as i64).min(canvas.height() as i64 - 1);

    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= r2 {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Thick segment with round caps, so consecutive segments join smoothly.
pub fn draw_thick_line(
    canvas: &mut RgbaImage,
    from: (f64, f64),
    to: (f64, f64),
    width: f64,
    color: Rgba<u8>,
) {
    let radius = width / 2.0;
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u64;

    for step in 0..=steps {
        let t = step as f64 / steps as f64;
        fill_circle(canvas, (from.0 + dx * t, from.1 + dy * t), radius, color);
    }
}

fn marker(canvas: &mut RgbaImage, center: (f64, f64), color: Rgba<u8>) {
    fill_circle(canvas, center, MARKER_OUTER_RADIUS, MARKER_RING_COLOR);
    fill_circle(canvas, center, MARKER_INNER_RADIUS, color);
}

/// Position of a map-unit point on the scaled layer.
pub fn to_layer(point: Point, origin: Point) -> Result<(f64, f64)> {
    let scale = PATH_SCALE as f64;
    let x = (point.x + origin.x) * scale;
    let y = (point.y + origin.y) * scale;
    if !x.is_finite() || !y.is_finite() {
        return Err(Error::InvalidCoordinate {
            reason: format!("point ({}, {}) does not map onto the image", point.x, point.y),
        }
        .into());
    }
    Ok((x, y))
}

/// Transparent layer, `PATH_SCALE` times the map size, holding the travel
/// path, the dock marker at the origin and the robot marker at the last point.
pub fn render_path(
    path: Option<&Path>,
    origin: Point,
    map_width: u32,
    map_height: u32,
) -> Result<RgbaImage> {
    let mut layer = RgbaImage::new(map_width * PATH_SCALE, map_height * PATH_SCALE);

    let points = match path {
        Some(path) => path
            .points()
            .iter()
            .map(|&point| to_layer(point, origin))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    for segment in points.windows(2) {
        draw_thick_line(&mut layer, segment[0], segment[1], PATH_WIDTH, PATH_COLOR);
    }

    marker(&mut layer, to_layer(Point::default(), origin)?, DOCK_COLOR);
    if let Some(&last) = points.last() {
        marker(&mut layer, last, ROBOT_COLOR);
    }

    Ok(layer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoder::writer::PathWriter;

    #[test]
    fn circles_clip_at_edges() {
        let mut canvas = RgbaImage::new(10, 10);
        fill_circle(&mut canvas, (0.0, 0.0), 3.0, DOCK_COLOR);
        fill_circle(&mut canvas, (-50.0, 400.0), 3.0, DOCK_COLOR);

        assert_eq!(*canvas.get_pixel(0, 0), DOCK_COLOR);
        assert_eq!(*canvas.get_pixel(3, 0), DOCK_COLOR);
        assert_eq!(*canvas.get_pixel(3, 3), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn thick_line_covers_segment() {
        let mut canvas = RgbaImage::new(40, 20);
        draw_thick_line(&mut canvas, (5.0, 10.0), (35.0, 10.0), 4.0, PATH_COLOR);

        for x in 5..=35 {
            assert_eq!(*canvas.get_pixel(x, 10), PATH_COLOR);
            assert_eq!(*canvas.get_pixel(x, 12), PATH_COLOR);
        }
        assert_eq!(*canvas.get_pixel(20, 15), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn layer_has_markers_and_path() {
        // Raw tenths: (0, 0) then (50, -50) which inverts to (5.0, 5.0).
        let data = PathWriter::new().point(0, 0).point(50, 65486).build();
        let path = Path::parse(&data).unwrap();
        let layer = render_path(Some(&path), Point::new(10.0, 10.0), 20, 20).unwrap();

        assert_eq!(layer.dimensions(), (160, 160));
        assert_eq!(*layer.get_pixel(80, 80), DOCK_COLOR);
        assert_eq!(*layer.get_pixel(120, 120), ROBOT_COLOR);
        // Ring around the dock marker.
        assert_eq!(*layer.get_pixel(80, 62), MARKER_RING_COLOR);
        // Path between the two markers.
        assert_eq!(*layer.get_pixel(100, 100), PATH_COLOR);
        assert_eq!(*layer.get_pixel(5, 150), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn layer_without_path_only_marks_dock() {
        let layer = render_path(None, Point::new(5.0, 5.0), 10, 10).unwrap();
        assert_eq!(*layer.get_pixel(40, 40), DOCK_COLOR);
        assert_eq!(layer.pixels().filter(|p| **p == ROBOT_COLOR).count(), 0);
    }
}
