//! Text colours.

use image::Rgb;

/// The 16-colour VGA palette in ANSI order (black, red, green, brown, blue,
/// magenta, cyan, light grey, then the bright variants).
pub const VGA: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0xAA, 0x00, 0x00],
    [0x00, 0xAA, 0x00],
    [0xAA, 0x55, 0x00],
    [0x00, 0x00, 0xAA],
    [0xAA, 0x00, 0xAA],
    [0x00, 0xAA, 0xAA],
    [0xAA, 0xAA, 0xAA],
    [0x55, 0x55, 0x55],
    [0xFF, 0x55, 0x55],
    [0x55, 0xFF, 0x55],
    [0xFF, 0xFF, 0x55],
    [0x55, 0x55, 0xFF],
    [0xFF, 0x55, 0xFF],
    [0x55, 0xFF, 0xFF],
    [0xFF, 0xFF, 0xFF],
];

/// Default foreground index (light grey).
pub const DEFAULT_FG: u8 = 7;

/// Default background index (black).
pub const DEFAULT_BG: u8 = 0;

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// A colour as selected by an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colour {
    /// Index into the 256-colour xterm palette (0-15 are the VGA colours).
    Indexed(u8),
    /// Direct 24-bit colour.
    Rgb(u8, u8, u8),
}

impl Colour {
    /// Resolve to a concrete pixel value.
    pub fn to_rgb(self) -> Rgb<u8> {
        match self {
            Colour::Indexed(index) => Rgb(xterm256(index)),
            Colour::Rgb(r, g, b) => Rgb([r, g, b]),
        }
    }

    /// The bright variant of a low-intensity palette colour; other colours
    /// are returned unchanged.
    pub fn brightened(self) -> Self {
        match self {
            Colour::Indexed(index) if index < 8 => Colour::Indexed(index + 8),
            other => other,
        }
    }
}

/// RGB value of an xterm 256-colour palette index.
pub fn xterm256(index: u8) -> [u8; 3] {
    match index {
        0..=15 => VGA[index as usize],
        16..=231 => {
            let n = index - 16;
            [
                CUBE_LEVELS[(n / 36) as usize],
                CUBE_LEVELS[((n / 6) % 6) as usize],
                CUBE_LEVELS[(n % 6) as usize],
            ]
        }
        _ => {
            let level = 8 + 10 * (index - 232);
            [level, level, level]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vga_range() {
        assert_eq!(xterm256(0), [0, 0, 0]);
        assert_eq!(xterm256(7), [0xAA, 0xAA, 0xAA]);
        assert_eq!(xterm256(15), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_colour_cube() {
        assert_eq!(xterm256(16), [0, 0, 0]);
        assert_eq!(xterm256(196), [255, 0, 0]);
        assert_eq!(xterm256(231), [255, 255, 255]);
    }

    #[test]
    fn test_grey_ramp() {
        assert_eq!(xterm256(232), [8, 8, 8]);
        assert_eq!(xterm256(255), [238, 238, 238]);
    }

    #[test]
    fn test_brightened() {
        assert_eq!(Colour::Indexed(1).brightened(), Colour::Indexed(9));
        assert_eq!(Colour::Indexed(9).brightened(), Colour::Indexed(9));
        assert_eq!(Colour::Rgb(1, 2, 3).brightened(), Colour::Rgb(1, 2, 3));
    }
}
