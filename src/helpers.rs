use crate::common::{Color, ColorValue};

// Expands a 5-bit channel to 8 bits as floor(c * 255 / 31), not by bit replication.
pub fn scale_color(c: u8) -> ColorValue {
    ((c as u16 & 31) * 255 / 31) as ColorValue
}

// Decodes a BGR555 word: 0bxBBBBBGGGGGRRRRR.
pub fn color_from_word(w: u16) -> Color {
    let r = w & 31;
    let g = (w >> 5) & 31;
    let b = (w >> 10) & 31;
    Color::new(scale_color(r as u8), scale_color(g as u8), scale_color(b as u8))
}

// Only called on slices already split into whole words.
pub(crate) fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    let b0 = data[offset] as u16;
    let b1 = data[offset + 1] as u16;
    b0 | b1 << 8
}
