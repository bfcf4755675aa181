use std::collections::{BTreeSet, HashMap};

use decoder::{
    pixel::{PixelKind, PIXEL_KINDS},
    Map,
};
use image::{Rgb, RgbImage};
use log::warn;

use crate::palette::Palette;

/// Colour for every possible pixel code of this map, `None` when the code
/// has to fall back to the sentinel.
fn color_table(map: &Map, palette: &Palette) -> [Option<Rgb<u8>>; 256] {
    let room_index: HashMap<u16, usize> = map
        .rooms()
        .iter()
        .enumerate()
        .map(|(index, room)| (room.id, index))
        .collect();

    let mut table = [None; 256];
    for (code, kind) in PIXEL_KINDS.iter().enumerate() {
        table[code] = match *kind {
            PixelKind::Background => Some(palette.background),
            PixelKind::Wall => Some(palette.wall),
            PixelKind::Floor => Some(palette.floor),
            PixelKind::Room(id) => room_index
                .get(&(id as u16))
                .map(|&index| palette.room(index)),
            PixelKind::Special(slot) => Some(palette.special[slot as usize]),
            PixelKind::Unknown => None,
        };
    }
    table
}

/// Render one pixel per map cell. Also returns the codes that could not be
/// coloured.
pub fn render_map(map: &Map, palette: &Palette) -> (RgbImage, BTreeSet<u8>) {
    let header = map.header();
    let table = color_table(map, palette);
    let mut unknown_codes = BTreeSet::new();

    let mut canvas = RgbImage::new(header.width.into(), header.height.into());
    for (pixel, &code) in canvas.pixels_mut().zip(map.pixels()) {
        *pixel = match table[code as usize] {
            Some(color) => color,
            None => {
                unknown_codes.insert(code);
                palette.unknown
            }
        };
    }

    if !unknown_codes.is_empty() {
        warn!(
            "map {} has pixels with unrecognised codes {:?}",
            header.id, unknown_codes
        );
    }

    (canvas, unknown_codes)
}
