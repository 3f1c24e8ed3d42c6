use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("Color index {index} is outside the 16-color palette")]
    ColorIndexOutOfRange { index: usize },
    #[error("Pixel #{index} has color index {value}, expected 0-15")]
    PixelIndexOutOfRange { index: usize, value: u8 },
    #[error("Tile map cell ({x}, {y}) is outside the 32x32 map")]
    CellOutOfRange { x: usize, y: usize },
    #[error("Invalid cell specification: {0}")]
    InvalidCellSpec(String),
}
