use tilemap_editor::{
    common::Color,
    import::decode_tiles,
    render::{
        render_palette_strip, render_selected_cell, render_tile_map, render_tile_sheet,
        PixelBuffer,
    },
    state::{CellCoord, Palette, Tile, TileMap, TileMapEntry},
};

// Color i is (i * 16, 255 - i * 16, i) so every index is distinct.
fn ramp_palette() -> Palette {
    let mut colors = [Color::BLACK; 16];
    for (i, c) in colors.iter_mut().enumerate() {
        *c = Color::new((i * 16) as u8, (255 - i * 16) as u8, i as u8);
    }
    Palette::new(colors)
}

fn solid_palette(color: Color) -> Palette {
    Palette::new([color; 16])
}

// Pixel (x, y) has color index (x + 2 * y) % 16: no horizontal or vertical symmetry.
fn asymmetric_tile() -> Tile {
    let mut pixels = [0u8; 64];
    for y in 0..8 {
        for x in 0..8 {
            pixels[y * 8 + x] = ((x + 2 * y) % 16) as u8;
        }
    }
    Tile::from_pixels(pixels).unwrap()
}

fn cell_block(buf: &PixelBuffer, cx: usize, cy: usize, block: usize) -> Vec<Vec<Color>> {
    (0..block)
        .map(|y| {
            (0..block)
                .map(|x| buf.pixel(cx * block + x, cy * block + y))
                .collect()
        })
        .collect()
}

fn is_black(block: &[Vec<Color>]) -> bool {
    block.iter().flatten().all(|&c| c == Color::BLACK)
}

#[test]
fn test_tile_sheet_dimensions() {
    let tiles = decode_tiles(&vec![0x11u8; 33 * 32]);
    assert_eq!(tiles.len(), 33);
    let buf = render_tile_sheet(&ramp_palette(), &tiles, 1);
    assert_eq!(buf.width, 256);
    assert_eq!(buf.height, 16);
    assert_eq!(buf.as_bytes().len(), 256 * 16 * 3);

    let buf = render_tile_sheet(&ramp_palette(), &tiles, 2);
    assert_eq!((buf.width, buf.height), (512, 32));

    let buf = render_tile_sheet(&ramp_palette(), &[], 2);
    assert_eq!((buf.width, buf.height), (512, 0));
}

#[test]
fn test_tile_sheet_layout_and_background() {
    let palette = ramp_palette();
    let tiles = decode_tiles(&vec![0x33u8; 33 * 32]);
    let buf = render_tile_sheet(&palette, &tiles, 2);
    // Tile 32 wraps to the start of the second row.
    assert_eq!(buf.pixel(0, 16), palette.colors()[3]);
    assert_eq!(buf.pixel(15, 31), palette.colors()[3]);
    // Rest of the second row is background.
    assert_eq!(buf.pixel(16, 16), Color::BLACK);
    assert_eq!(buf.pixel(511, 31), Color::BLACK);
    // Tile 31 is the last of the first row.
    assert_eq!(buf.pixel(511, 0), palette.colors()[3]);
}

#[test]
fn test_tile_sheet_magnification_is_nearest_neighbor() {
    let palette = ramp_palette();
    let tile = asymmetric_tile();
    let buf = render_tile_sheet(&palette, &[tile], 3);
    for y in 0..24 {
        for x in 0..24 {
            let expected = palette.colors()[tile.pixel(x / 3, y / 3) as usize];
            assert_eq!(buf.pixel(x, y), expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_tile_map_dimensions() {
    let map = TileMap::default();
    let buf = render_tile_map(&[], &[], &map, 1);
    assert_eq!((buf.width, buf.height), (256, 256));
    let buf = render_tile_map(&[], &[], &map, 3);
    assert_eq!((buf.width, buf.height), (768, 768));
    assert!(buf.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_default_map_draws_tile_one_with_palette_zero() {
    let red = Color::new(255, 0, 0);
    let tiles = vec![Tile::default(), Tile::default()];
    let buf = render_tile_map(&[solid_palette(red)], &tiles, &TileMap::default(), 1);
    assert_eq!(buf.pixel(0, 0), red);
    assert_eq!(buf.pixel(255, 255), red);

    // Only tile 0 loaded: every default cell points at tile 1 and is skipped.
    let buf = render_tile_map(&[solid_palette(red)], &tiles[..1], &TileMap::default(), 1);
    assert!(buf.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_dangling_references_leave_background() {
    let white = Color::new(255, 255, 255);
    let palettes = vec![solid_palette(white)];
    let tiles = vec![Tile::default(), Tile::default()];
    let mut map = TileMap::default();
    map.set(
        3,
        4,
        TileMapEntry {
            tile_idx: 99,
            ..TileMapEntry::default()
        },
    );
    map.set(
        5,
        6,
        TileMapEntry {
            palette_idx: 7,
            ..TileMapEntry::default()
        },
    );
    let buf = render_tile_map(&palettes, &tiles, &map, 2);
    assert!(is_black(&cell_block(&buf, 3, 4, 16)));
    assert!(is_black(&cell_block(&buf, 5, 6, 16)));
    assert!(cell_block(&buf, 4, 4, 16).iter().flatten().all(|&c| c == white));

    // Once the collections grow the same map renders the cell.
    let more_tiles = vec![Tile::default(); 100];
    let buf = render_tile_map(&palettes, &more_tiles, &map, 2);
    assert!(cell_block(&buf, 3, 4, 16).iter().flatten().all(|&c| c == white));
}

#[test]
fn test_horizontal_flip_mirrors_cell() {
    let palettes = vec![ramp_palette()];
    let tiles = vec![asymmetric_tile()];
    let entry = TileMapEntry {
        tile_idx: 0,
        h_flip: false,
        v_flip: false,
        palette_idx: 0,
    };
    let mut map = TileMap::default();
    map.set(2, 1, entry);
    let plain = cell_block(&render_tile_map(&palettes, &tiles, &map, 2), 2, 1, 16);

    map.set(
        2,
        1,
        TileMapEntry {
            h_flip: true,
            ..entry
        },
    );
    let flipped = cell_block(&render_tile_map(&palettes, &tiles, &map, 2), 2, 1, 16);

    assert_ne!(plain, flipped);
    for y in 0..16 {
        for x in 0..16 {
            assert_eq!(flipped[y][x], plain[y][15 - x]);
        }
    }
}

#[test]
fn test_vertical_and_both_flips() {
    let palettes = vec![ramp_palette()];
    let tiles = vec![asymmetric_tile()];
    let entry = TileMapEntry {
        tile_idx: 0,
        h_flip: false,
        v_flip: false,
        palette_idx: 0,
    };
    let mut map = TileMap::default();
    map.set(0, 0, entry);
    map.set(
        1,
        0,
        TileMapEntry {
            v_flip: true,
            ..entry
        },
    );
    map.set(
        2,
        0,
        TileMapEntry {
            h_flip: true,
            v_flip: true,
            ..entry
        },
    );
    let buf = render_tile_map(&palettes, &tiles, &map, 1);
    let plain = cell_block(&buf, 0, 0, 8);
    let v = cell_block(&buf, 1, 0, 8);
    let hv = cell_block(&buf, 2, 0, 8);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(v[y][x], plain[7 - y][x]);
            assert_eq!(hv[y][x], plain[7 - y][7 - x]);
        }
    }
}

#[test]
fn test_palette_indirection_per_cell() {
    let red = Color::new(255, 0, 0);
    let blue = Color::new(0, 0, 255);
    let palettes = vec![solid_palette(red), solid_palette(blue)];
    let tiles = vec![Tile::default(); 2];
    let mut map = TileMap::default();
    map.set(
        31,
        31,
        TileMapEntry {
            palette_idx: 1,
            ..TileMapEntry::default()
        },
    );
    let buf = render_tile_map(&palettes, &tiles, &map, 1);
    assert_eq!(buf.pixel(0, 0), red);
    assert_eq!(buf.pixel(248, 248), blue);
    assert_eq!(buf.pixel(255, 255), blue);
    assert_eq!(buf.pixel(247, 255), red);
}

#[test]
fn test_palette_strip_geometry() {
    let palettes = vec![ramp_palette(), solid_palette(Color::new(9, 9, 9))];
    let buf = render_palette_strip(&palettes, 10);
    assert_eq!(buf.width, 16 * 10 + 17);
    assert_eq!(buf.height, 2 * 10 + 3);
    // Gutters stay black.
    assert_eq!(buf.pixel(0, 0), Color::BLACK);
    assert_eq!(buf.pixel(11, 1), Color::BLACK);
    assert_eq!(buf.pixel(1, 11), Color::BLACK);
    assert_eq!(buf.pixel(1, 1), palettes[0].colors()[0]);
    assert_eq!(buf.pixel(10, 10), palettes[0].colors()[0]);
    assert_eq!(buf.pixel(12, 1), palettes[0].colors()[1]);
    assert_eq!(buf.pixel(166, 21), palettes[1].colors()[15]);

    let empty = render_palette_strip(&[], 10);
    assert_eq!((empty.width, empty.height), (177, 1));
}

#[test]
fn test_selected_cell_render() {
    let palettes = vec![ramp_palette()];
    let tiles = vec![asymmetric_tile()];
    let mut map = TileMap::default();
    let entry = TileMapEntry {
        tile_idx: 0,
        h_flip: true,
        v_flip: false,
        palette_idx: 0,
    };
    map.set(7, 9, entry);
    let coord = CellCoord::new(7, 9).unwrap();

    let buf = render_selected_cell(&palettes, &tiles, &map, Some(coord), 4);
    assert_eq!((buf.width, buf.height), (32, 32));
    let full = render_tile_map(&palettes, &tiles, &map, 4);
    assert_eq!(cell_block(&buf, 0, 0, 32), cell_block(&full, 7, 9, 32));

    let blank = render_selected_cell(&palettes, &tiles, &map, None, 4);
    assert_eq!((blank.width, blank.height), (32, 32));
    assert!(blank.as_bytes().iter().all(|&b| b == 0));

    // Default cells reference tile 1, which is not loaded.
    let unresolved = CellCoord::new(0, 0).unwrap();
    let blank = render_selected_cell(&palettes, &tiles, &map, Some(unresolved), 4);
    assert!(blank.as_bytes().iter().all(|&b| b == 0));
}
