// Decoding of raw palette and tile files.
use log::debug;

use crate::{
    common::{Color, ColorIdx, PALETTE_BYTES, PALETTE_SIZE, TILE_BYTES, TILE_PIXELS},
    helpers::{color_from_word, read_u16_le},
    state::{Palette, Tile},
};

pub fn decode_palettes(data: &[u8]) -> Vec<Palette> {
    let palettes: Vec<Palette> = data
        .chunks_exact(PALETTE_BYTES)
        .map(|chunk| {
            let mut colors = [Color::BLACK; PALETTE_SIZE];
            for (i, color) in colors.iter_mut().enumerate() {
                *color = color_from_word(read_u16_le(chunk, i * 2));
            }
            Palette::new(colors)
        })
        .collect();
    let trailing = data.len() % PALETTE_BYTES;
    debug!(
        "Decoded {} palettes ({} trailing bytes discarded)",
        palettes.len(),
        trailing
    );
    palettes
}

// Low nibble is the first pixel of each pair.
pub fn decode_tiles(data: &[u8]) -> Vec<Tile> {
    let tiles: Vec<Tile> = data
        .chunks_exact(TILE_BYTES)
        .map(|chunk| {
            let mut pixels: [ColorIdx; TILE_PIXELS] = [0; TILE_PIXELS];
            for (i, &b) in chunk.iter().enumerate() {
                pixels[i * 2] = b & 0xF;
                pixels[i * 2 + 1] = (b >> 4) & 0xF;
            }
            Tile::from_nibbles(pixels)
        })
        .collect();
    let trailing = data.len() % TILE_BYTES;
    debug!(
        "Decoded {} tiles ({} trailing bytes discarded)",
        tiles.len(),
        trailing
    );
    tiles
}

pub fn decode_all_palettes<B: AsRef<[u8]>>(buffers: &[B]) -> Vec<Palette> {
    buffers
        .iter()
        .flat_map(|b| decode_palettes(b.as_ref()))
        .collect()
}

pub fn decode_all_tiles<B: AsRef<[u8]>>(buffers: &[B]) -> Vec<Tile> {
    buffers
        .iter()
        .flat_map(|b| decode_tiles(b.as_ref()))
        .collect()
}
