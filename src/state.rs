use anyhow::{Context, Result};
use itertools::Itertools;
use std::{path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    common::{
        CellCoordValue, Color, ColorIdx, PaletteIdx, TileIdx, MAP_SIZE, PALETTE_SIZE,
        TILE_PIXELS, TILE_SIZE,
    },
    error::AssetError,
    persist,
    render::{self, PixelBuffer},
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; PALETTE_SIZE],
}

impl Palette {
    pub fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Palette { colors }
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }

    pub fn color(&self, idx: usize) -> Result<Color, AssetError> {
        self.colors
            .get(idx)
            .copied()
            .ok_or(AssetError::ColorIndexOutOfRange { index: idx })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pixels: [ColorIdx; TILE_PIXELS],
}

impl Default for Tile {
    fn default() -> Self {
        Tile {
            pixels: [0; TILE_PIXELS],
        }
    }
}

impl Tile {
    pub fn from_pixels(pixels: [ColorIdx; TILE_PIXELS]) -> Result<Self, AssetError> {
        let wide = pixels
            .iter()
            .find_position(|&&c| (c as usize) >= PALETTE_SIZE);
        if let Some((index, &value)) = wide {
            return Err(AssetError::PixelIndexOutOfRange { index, value });
        }
        Ok(Tile { pixels })
    }

    // Callers must only pass values already masked to 4 bits.
    pub(crate) fn from_nibbles(pixels: [ColorIdx; TILE_PIXELS]) -> Self {
        debug_assert!(pixels.iter().all(|&c| (c as usize) < PALETTE_SIZE));
        Tile { pixels }
    }

    pub fn pixels(&self) -> &[ColorIdx; TILE_PIXELS] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> ColorIdx {
        self.pixels[y * TILE_SIZE + x]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileMapEntry {
    pub tile_idx: TileIdx,
    pub h_flip: bool,
    pub v_flip: bool,
    pub palette_idx: PaletteIdx,
}

impl Default for TileMapEntry {
    fn default() -> Self {
        TileMapEntry {
            tile_idx: 1,
            h_flip: false,
            v_flip: false,
            palette_idx: 0,
        }
    }
}

impl TileMapEntry {
    pub fn sample_coords(&self, x: usize, y: usize) -> (usize, usize) {
        let sx = if self.h_flip { TILE_SIZE - 1 - x } else { x };
        let sy = if self.v_flip { TILE_SIZE - 1 - y } else { y };
        (sx, sy)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: CellCoordValue,
    pub y: CellCoordValue,
}

impl CellCoord {
    pub fn new(x: usize, y: usize) -> Result<Self, AssetError> {
        if x >= MAP_SIZE || y >= MAP_SIZE {
            return Err(AssetError::CellOutOfRange { x, y });
        }
        Ok(CellCoord {
            x: x as CellCoordValue,
            y: y as CellCoordValue,
        })
    }
}

fn parse_number(s: &str, what: &str) -> Result<usize, AssetError> {
    s.trim()
        .parse()
        .map_err(|_| AssetError::InvalidCellSpec(format!("invalid {}: {:?}", what, s)))
}

impl FromStr for CellCoord {
    type Err = AssetError;

    // "X,Y"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((x, y)) = s.split_once(',') else {
            return Err(AssetError::InvalidCellSpec(format!(
                "expected X,Y but got {:?}",
                s
            )));
        };
        CellCoord::new(parse_number(x, "x")?, parse_number(y, "y")?)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellAssignment {
    pub coord: CellCoord,
    pub entry: TileMapEntry,
}

impl FromStr for CellAssignment {
    type Err = AssetError;

    // "X,Y=TILE,PALETTE[,h][,v]"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((coord, entry)) = s.split_once('=') else {
            return Err(AssetError::InvalidCellSpec(format!(
                "expected X,Y=TILE,PALETTE but got {:?}",
                s
            )));
        };
        let coord: CellCoord = coord.parse()?;
        let mut parts = entry.split(',');
        let tile_idx = parse_number(parts.next().unwrap_or(""), "tile index")?;
        let palette_idx = match parts.next() {
            Some(p) => parse_number(p, "palette index")?,
            None => {
                return Err(AssetError::InvalidCellSpec(format!(
                    "missing palette index in {:?}",
                    s
                )))
            }
        };
        let mut entry = TileMapEntry {
            tile_idx,
            h_flip: false,
            v_flip: false,
            palette_idx,
        };
        for flag in parts {
            match flag.trim() {
                "h" => entry.h_flip = true,
                "v" => entry.v_flip = true,
                "hv" | "vh" => {
                    entry.h_flip = true;
                    entry.v_flip = true;
                }
                other => {
                    return Err(AssetError::InvalidCellSpec(format!(
                        "unknown flip flag {:?}",
                        other
                    )))
                }
            }
        }
        Ok(CellAssignment { coord, entry })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    cells: [[TileMapEntry; MAP_SIZE]; MAP_SIZE],
}

impl Default for TileMap {
    fn default() -> Self {
        TileMap {
            cells: [[TileMapEntry::default(); MAP_SIZE]; MAP_SIZE],
        }
    }
}

impl TileMap {
    /// Panics if `x` or `y` is not below 32.
    pub fn get(&self, x: usize, y: usize) -> TileMapEntry {
        self.cells[y][x]
    }

    /// Panics if `x` or `y` is not below 32. The entry's indices are not
    /// checked against any tile or palette list.
    pub fn set(&mut self, x: usize, y: usize, entry: TileMapEntry) {
        self.cells[y][x] = entry;
    }

    pub fn checked_get(&self, x: usize, y: usize) -> Result<TileMapEntry, AssetError> {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .ok_or(AssetError::CellOutOfRange { x, y })
    }

    pub fn entry(&self, coord: CellCoord) -> TileMapEntry {
        self.get(coord.x as usize, coord.y as usize)
    }

    pub fn set_entry(&mut self, coord: CellCoord, entry: TileMapEntry) {
        self.set(coord.x as usize, coord.y as usize, entry);
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TileMapEntry)> + '_ {
        (0..MAP_SIZE)
            .cartesian_product(0..MAP_SIZE)
            .map(|(y, x)| (x, y, self.cells[y][x]))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    #[serde(skip_serializing, skip_deserializing)]
    pub modified: bool,
    pub sheet_magnification: usize,
    pub map_magnification: usize,
    pub inspector_magnification: usize,
    pub palette_block_size: usize,
    pub sheet_palette_idx: PaletteIdx,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            modified: false,
            sheet_magnification: 2,
            map_magnification: 2,
            inspector_magnification: 16,
            palette_block_size: 10,
            sheet_palette_idx: 0,
        }
    }
}

#[derive(Default)]
pub struct EditorState {
    pub config_path: Option<PathBuf>,
    pub config: EditorConfig,

    // Loaded assets, append-only:
    pub palettes: Vec<Palette>,
    pub tiles: Vec<Tile>,

    pub tile_map: TileMap,
    pub selection: Option<CellCoord>,
}

impl EditorState {
    pub fn palette(&self, idx: PaletteIdx) -> Option<&Palette> {
        self.palettes.get(idx)
    }

    pub fn tile(&self, idx: TileIdx) -> Option<&Tile> {
        self.tiles.get(idx)
    }

    pub fn append_palettes(&mut self, palettes: Vec<Palette>) {
        self.palettes.extend(palettes);
    }

    pub fn append_tiles(&mut self, tiles: Vec<Tile>) {
        self.tiles.extend(tiles);
    }

    pub fn set_cell(&mut self, coord: CellCoord, entry: TileMapEntry) {
        self.tile_map.set_entry(coord, entry);
    }

    pub fn select(&mut self, selection: Option<CellCoord>) {
        self.selection = selection;
    }

    pub fn selected_entry(&self) -> Option<TileMapEntry> {
        self.selection.map(|c| self.tile_map.entry(c))
    }

    pub fn render_tile_sheet(&self) -> Option<PixelBuffer> {
        let palette = self.palette(self.config.sheet_palette_idx)?;
        Some(render::render_tile_sheet(
            palette,
            &self.tiles,
            self.config.sheet_magnification,
        ))
    }

    pub fn render_tile_map(&self) -> PixelBuffer {
        render::render_tile_map(
            &self.palettes,
            &self.tiles,
            &self.tile_map,
            self.config.map_magnification,
        )
    }

    pub fn render_palette_strip(&self) -> PixelBuffer {
        render::render_palette_strip(&self.palettes, self.config.palette_block_size)
    }

    pub fn render_selected_cell(&self) -> PixelBuffer {
        render::render_selected_cell(
            &self.palettes,
            &self.tiles,
            &self.tile_map,
            self.selection,
            self.config.inspector_magnification,
        )
    }
}

fn get_config_path() -> Result<PathBuf> {
    let project_dirs = directories::ProjectDirs::from("", "", "TilemapEditor")
        .context("Unable to open config directory.")?;
    let config_dir = project_dirs.config_dir();
    let config_path = config_dir.join("config.json");
    Ok(config_path)
}

pub fn get_initial_state(config_path: Option<PathBuf>) -> Result<EditorState> {
    let config_path = match config_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    let mut editor_state = EditorState {
        config_path: Some(config_path),
        ..EditorState::default()
    };
    persist::load_config(&mut editor_state)?;
    Ok(editor_state)
}
