pub type ColorValue = u8; // Color channel value (0-255)
pub type ColorIdx = u8; // Index into 4bpp palette (0-15)
pub type PaletteIdx = usize; // Index into palette list
pub type TileIdx = usize; // Index into tile list
pub type CellCoordValue = u8; // Tile map coordinate (0-31)

pub const PALETTE_SIZE: usize = 16;
pub const TILE_SIZE: usize = 8;
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
pub const TILE_BYTES: usize = TILE_PIXELS / 2;
pub const PALETTE_BYTES: usize = PALETTE_SIZE * 2;
pub const MAP_SIZE: usize = 32;
pub const SHEET_COLUMNS: usize = 32;
pub const MAX_MAGNIFICATION: usize = 64;
pub const MAX_BLOCK_SIZE: usize = 64;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: ColorValue,
    pub green: ColorValue,
    pub blue: ColorValue,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: ColorValue, green: ColorValue, blue: ColorValue) -> Self {
        Color { red, green, blue }
    }

    pub fn rgb(&self) -> [ColorValue; 3] {
        [self.red, self.green, self.blue]
    }
}
