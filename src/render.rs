// Compositing of tiles, tile maps and palettes into RGB pixel buffers.
use itertools::Itertools;

use crate::{
    common::{Color, MAP_SIZE, PALETTE_SIZE, SHEET_COLUMNS, TILE_SIZE},
    state::{CellCoord, Palette, Tile, TileMap, TileMapEntry},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            width,
            height,
            data: vec![0; width * height * 3],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        let addr = (y * self.width + x) * 3;
        Color::new(self.data[addr], self.data[addr + 1], self.data[addr + 2])
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, width: usize, height: usize, color: Color) {
        let rgb = color.rgb();
        let row_stride = self.width * 3;
        for py in y..(y + height) {
            let row_addr = py * row_stride;
            for px in x..(x + width) {
                let addr = row_addr + px * 3;
                self.data[addr..(addr + 3)].copy_from_slice(&rgb);
            }
        }
    }
}

// Paints one tile at (left, top), each source pixel scaled to a square block
// of `magnification` pixels. Flips apply to the sampled tile pixel.
fn draw_tile(
    buf: &mut PixelBuffer,
    tile: &Tile,
    palette: &Palette,
    entry: &TileMapEntry,
    left: usize,
    top: usize,
    magnification: usize,
) {
    let colors = palette.colors();
    for (y, x) in (0..TILE_SIZE).cartesian_product(0..TILE_SIZE) {
        let (sx, sy) = entry.sample_coords(x, y);
        let color = colors[tile.pixel(sx, sy) as usize];
        buf.fill_rect(
            left + x * magnification,
            top + y * magnification,
            magnification,
            magnification,
            color,
        );
    }
}

pub fn render_tile_sheet(palette: &Palette, tiles: &[Tile], magnification: usize) -> PixelBuffer {
    let block = TILE_SIZE * magnification;
    let rows = tiles.len().div_ceil(SHEET_COLUMNS);
    let mut buf = PixelBuffer::new(SHEET_COLUMNS * block, rows * block);
    let no_flip = TileMapEntry::default();
    for (i, tile) in tiles.iter().enumerate() {
        let left = (i % SHEET_COLUMNS) * block;
        let top = (i / SHEET_COLUMNS) * block;
        draw_tile(&mut buf, tile, palette, &no_flip, left, top, magnification);
    }
    buf
}

pub fn resolve_entry<'a>(
    palettes: &'a [Palette],
    tiles: &'a [Tile],
    entry: &TileMapEntry,
) -> Option<(&'a Tile, &'a Palette)> {
    let tile = tiles.get(entry.tile_idx)?;
    let palette = palettes.get(entry.palette_idx)?;
    Some((tile, palette))
}

/// Renders the full 32x32 map. Cells with dangling tile or palette references
/// are left black.
pub fn render_tile_map(
    palettes: &[Palette],
    tiles: &[Tile],
    tile_map: &TileMap,
    magnification: usize,
) -> PixelBuffer {
    let block = TILE_SIZE * magnification;
    let mut buf = PixelBuffer::new(MAP_SIZE * block, MAP_SIZE * block);
    for (x, y, entry) in tile_map.cells() {
        if let Some((tile, palette)) = resolve_entry(palettes, tiles, &entry) {
            draw_tile(&mut buf, tile, palette, &entry, x * block, y * block, magnification);
        }
    }
    buf
}

pub fn render_palette_strip(palettes: &[Palette], block_size: usize) -> PixelBuffer {
    let width = PALETTE_SIZE * (block_size + 1) + 1;
    let height = palettes.len() * (block_size + 1) + 1;
    let mut buf = PixelBuffer::new(width, height);
    for (p, palette) in palettes.iter().enumerate() {
        for (c, &color) in palette.colors().iter().enumerate() {
            buf.fill_rect(
                c * (block_size + 1) + 1,
                p * (block_size + 1) + 1,
                block_size,
                block_size,
                color,
            );
        }
    }
    buf
}

pub fn render_selected_cell(
    palettes: &[Palette],
    tiles: &[Tile],
    tile_map: &TileMap,
    selection: Option<CellCoord>,
    magnification: usize,
) -> PixelBuffer {
    let block = TILE_SIZE * magnification;
    let mut buf = PixelBuffer::new(block, block);
    let Some(coord) = selection else {
        return buf;
    };
    let entry = tile_map.entry(coord);
    if let Some((tile, palette)) = resolve_entry(palettes, tiles, &entry) {
        draw_tile(&mut buf, tile, palette, &entry, 0, 0, magnification);
    }
    buf
}
