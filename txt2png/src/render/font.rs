//! Glyphs and code page 437 decoding.
//!
//! Glyph bitmaps come from `font8x8`: eight rows of eight pixels, least
//! significant bit leftmost. Cells are drawn 8x16 by doubling each row.

use font8x8::{
    UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS,
};

/// Cell width in pixels.
pub const CELL_WIDTH: u32 = 8;

/// Cell height in pixels.
pub const CELL_HEIGHT: u32 = 16;

/// An 8x8 glyph bitmap.
pub type Glyph = [u8; 8];

/// Drawn for characters no font table covers.
const FALLBACK: Glyph = [0x00, 0x00, 0x3C, 0x3C, 0x3C, 0x3C, 0x00, 0x00];

/// CP437 graphics for the control range 0x00-0x1F.
const CP437_LOW: [char; 32] = [
    ' ', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼', //
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
];

/// CP437 upper half, 0x80-0xFF.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{A0}',
];

/// Decode one CP437 byte.
///
/// ASCII, including control bytes, maps to itself so the interpreter can
/// still act on line breaks and escapes.
pub fn cp437_char(byte: u8) -> char {
    if byte < 0x80 {
        byte as char
    } else {
        CP437_HIGH[(byte - 0x80) as usize]
    }
}

/// Decode a CP437 byte stream.
pub fn decode_cp437(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| cp437_char(b)).collect()
}

/// Printable stand-in for a control character that reached the canvas.
pub fn visible_char(ch: char) -> char {
    match ch as u32 {
        code @ 0x00..=0x1F => CP437_LOW[code as usize],
        0x7F => '⌂',
        _ => ch,
    }
}

/// Bitmap for a character.
pub fn glyph(ch: char) -> Glyph {
    let ch = visible_char(ch);
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BOX_FONTS.get(ch))
        .or_else(|| BLOCK_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .unwrap_or(FALLBACK)
}
