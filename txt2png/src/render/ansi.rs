//! Text and ANSI-art renderer.
//!
//! Interprets a character stream the way a DOS-era ANSI terminal would,
//! drawing into a fixed-width [`Canvas`]. Unsupported escape sequences are
//! consumed and ignored.

use std::borrow::Cow;

use tracing::trace;

use super::canvas::{Canvas, Cell};
use super::font;
use super::palette::{Colour, DEFAULT_BG, DEFAULT_FG};
use super::{RenderError, Renderer};

/// Default canvas width in columns.
pub const DEFAULT_COLUMNS: usize = 80;

const ESC: char = '\u{1B}';
const SUB: char = '\u{1A}';
const TAB_WIDTH: usize = 8;

/// Renders plain text and ANSI art to PNG with the default style: 80
/// columns, 8x16 cells, VGA palette, light grey on black.
#[derive(Debug, Clone)]
pub struct AnsiRenderer {
    columns: usize,
}

impl AnsiRenderer {
    /// Create a renderer with the default 80-column canvas.
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
        }
    }

    /// Interpret `input` into a canvas without encoding it.
    pub fn interpret(&self, input: &[u8]) -> Canvas {
        let text = match std::str::from_utf8(input) {
            Ok(text) => Cow::Borrowed(text),
            Err(_) => Cow::Owned(font::decode_cp437(input)),
        };
        let mut terminal = Terminal::new(self.columns);
        for ch in text.chars() {
            if !terminal.feed(ch) {
                break;
            }
        }
        terminal.canvas
    }
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for AnsiRenderer {
    fn render(&self, input: &[u8]) -> Result<Vec<u8>, RenderError> {
        if input.is_empty() {
            return Err(RenderError::EmptyInput);
        }
        let canvas = self.interpret(input);
        trace!(
            columns = canvas.columns(),
            rows = canvas.height(),
            "Interpreted text"
        );
        canvas.encode_png()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Attributes {
    fg: Colour,
    bg: Colour,
    bold: bool,
    blink: bool,
    inverse: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            fg: Colour::Indexed(DEFAULT_FG),
            bg: Colour::Indexed(DEFAULT_BG),
            bold: false,
            blink: false,
            inverse: false,
        }
    }
}

impl Attributes {
    /// Resolve to a cell. Bold brightens the foreground; blink brightens the
    /// background (iCE colours).
    fn cell(&self, ch: char) -> Cell {
        let fg = if self.bold { self.fg.brightened() } else { self.fg };
        let bg = if self.blink { self.bg.brightened() } else { self.bg };
        let (fg, bg) = if self.inverse { (bg, fg) } else { (fg, bg) };
        Cell {
            ch,
            fg: fg.to_rgb(),
            bg: bg.to_rgb(),
        }
    }
}

#[derive(Debug)]
enum State {
    Ground,
    Escape,
    Csi(String),
}

struct Terminal {
    canvas: Canvas,
    row: usize,
    column: usize,
    saved: (usize, usize),
    attrs: Attributes,
    state: State,
}

impl Terminal {
    fn new(columns: usize) -> Self {
        Self {
            canvas: Canvas::new(columns),
            row: 0,
            column: 0,
            saved: (0, 0),
            attrs: Attributes::default(),
            state: State::Ground,
        }
    }

    /// Consume one character. Returns `false` at end of content.
    fn feed(&mut self, ch: char) -> bool {
        match std::mem::replace(&mut self.state, State::Ground) {
            State::Ground => return self.ground(ch),
            State::Escape => {
                if ch == '[' {
                    self.state = State::Csi(String::new());
                }
            }
            State::Csi(mut params) => {
                if ('\u{40}'..='\u{7E}').contains(&ch) {
                    self.dispatch_csi(&params, ch);
                } else if params.len() < 64 {
                    params.push(ch);
                    self.state = State::Csi(params);
                }
            }
        }
        true
    }

    fn ground(&mut self, ch: char) -> bool {
        match ch {
            SUB => return false,
            ESC => self.state = State::Escape,
            '\n' => {
                self.row += 1;
                self.column = 0;
            }
            '\r' => self.column = 0,
            '\t' => {
                let next = (self.column / TAB_WIDTH + 1) * TAB_WIDTH;
                self.column = next.min(self.canvas.columns() - 1);
            }
            '\0' => self.write(' '),
            _ => self.write(ch),
        }
        true
    }

    fn write(&mut self, ch: char) {
        if self.column >= self.canvas.columns() {
            self.column = 0;
            self.row += 1;
        }
        let cell = self.attrs.cell(ch);
        self.canvas.put(self.row, self.column, cell);
        self.column += 1;
    }

    fn dispatch_csi(&mut self, raw: &str, command: char) {
        let params = parse_params(raw);
        let first = |default: usize| match params.first() {
            Some(&n) if n > 0 => n as usize,
            _ => default,
        };
        let last_column = self.canvas.columns() - 1;

        match command {
            'A' => self.row = self.row.saturating_sub(first(1)),
            'B' => self.row += first(1),
            'C' => self.column = (self.column + first(1)).min(last_column),
            'D' => self.column = self.column.saturating_sub(first(1)),
            'H' | 'f' => {
                let row = params.first().copied().unwrap_or(1).max(1) as usize;
                let column = params.get(1).copied().unwrap_or(1).max(1) as usize;
                self.row = row - 1;
                self.column = (column - 1).min(last_column);
            }
            'J' => {
                if params.first() == Some(&2) {
                    self.canvas.clear();
                    self.row = 0;
                    self.column = 0;
                }
            }
            'K' => {
                let fill = self.attrs.cell(' ');
                self.canvas.erase_line_from(self.row, self.column, fill);
            }
            's' => self.saved = (self.row, self.column),
            'u' => (self.row, self.column) = self.saved,
            'm' => self.select_graphic_rendition(&params),
            't' => self.pablodraw_colour(&params),
            _ => trace!(command = %command, params = raw, "Ignoring escape sequence"),
        }
    }

    fn select_graphic_rendition(&mut self, params: &[u32]) {
        if params.is_empty() {
            self.attrs = Attributes::default();
            return;
        }

        let mut iter = params.iter().copied();
        while let Some(code) = iter.next() {
            match code {
                0 => self.attrs = Attributes::default(),
                1 => self.attrs.bold = true,
                2 | 22 => self.attrs.bold = false,
                5 => self.attrs.blink = true,
                25 => self.attrs.blink = false,
                7 => self.attrs.inverse = true,
                27 => self.attrs.inverse = false,
                30..=37 => self.attrs.fg = Colour::Indexed((code - 30) as u8),
                38 => {
                    if let Some(colour) = extended_colour(&mut iter) {
                        self.attrs.fg = colour;
                    }
                }
                39 => self.attrs.fg = Colour::Indexed(DEFAULT_FG),
                40..=47 => self.attrs.bg = Colour::Indexed((code - 40) as u8),
                48 => {
                    if let Some(colour) = extended_colour(&mut iter) {
                        self.attrs.bg = colour;
                    }
                }
                49 => self.attrs.bg = Colour::Indexed(DEFAULT_BG),
                90..=97 => self.attrs.fg = Colour::Indexed((code - 90 + 8) as u8),
                100..=107 => self.attrs.bg = Colour::Indexed((code - 100 + 8) as u8),
                _ => {}
            }
        }
    }

    /// PabloDraw 24-bit colour: `ESC[0;r;g;bt` sets the background,
    /// `ESC[1;r;g;bt` the foreground.
    fn pablodraw_colour(&mut self, params: &[u32]) {
        if let [which, r, g, b] = params {
            let colour = Colour::Rgb(channel(*r), channel(*g), channel(*b));
            match which {
                0 => self.attrs.bg = colour,
                1 => self.attrs.fg = colour,
                _ => {}
            }
        }
    }
}

/// Parse `;`-separated numeric parameters. Private markers such as `?` are
/// skipped and empty fields read as 0.
fn parse_params(raw: &str) -> Vec<u32> {
    let raw = raw.trim_start_matches(['?', '=', '>', '<']);
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';')
        .map(|field| field.trim().parse::<u32>().unwrap_or(0))
        .collect()
}

fn extended_colour(iter: &mut impl Iterator<Item = u32>) -> Option<Colour> {
    match iter.next()? {
        5 => Some(Colour::Indexed(channel(iter.next()?))),
        2 => {
            let r = channel(iter.next()?);
            let g = channel(iter.next()?);
            let b = channel(iter.next()?);
            Some(Colour::Rgb(r, g, b))
        }
        _ => None,
    }
}

fn channel(value: u32) -> u8 {
    value.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::MAX_ROWS;
    use crate::render::palette::VGA;
    use image::Rgb;

    fn canvas(input: &[u8]) -> Canvas {
        AnsiRenderer::new().interpret(input)
    }

    fn ch_at(canvas: &Canvas, row: usize, column: usize) -> Option<char> {
        canvas.cell(row, column).map(|c| c.ch)
    }

    fn vga(index: usize) -> Rgb<u8> {
        Rgb(VGA[index])
    }

    #[test]
    fn test_plain_text_lines() {
        let canvas = canvas(b"ab\ncd");
        assert_eq!(canvas.height(), 2);
        assert_eq!(ch_at(&canvas, 0, 1), Some('b'));
        assert_eq!(ch_at(&canvas, 1, 0), Some('c'));
    }

    #[test]
    fn test_trailing_newline_does_not_add_row() {
        assert_eq!(canvas(b"hello\n").height(), 1);
    }

    #[test]
    fn test_carriage_return_overwrites() {
        let canvas = canvas(b"abc\rX");
        assert_eq!(ch_at(&canvas, 0, 0), Some('X'));
        assert_eq!(ch_at(&canvas, 0, 1), Some('b'));
    }

    #[test]
    fn test_tab_stops() {
        let canvas = canvas(b"a\tb");
        assert_eq!(ch_at(&canvas, 0, 8), Some('b'));
    }

    #[test]
    fn test_wraps_at_margin() {
        let line = vec![b'x'; DEFAULT_COLUMNS + 1];
        let canvas = canvas(&line);
        assert_eq!(canvas.height(), 2);
        assert_eq!(ch_at(&canvas, 1, 0), Some('x'));
    }

    #[test]
    fn test_full_width_line_then_newline() {
        let mut input = vec![b'x'; DEFAULT_COLUMNS];
        input.extend_from_slice(b"\ny");
        let canvas = canvas(&input);
        assert_eq!(canvas.height(), 2);
        assert_eq!(ch_at(&canvas, 1, 0), Some('y'));
    }

    #[test]
    fn test_sub_ends_content() {
        let canvas = canvas(b"art\x1aSAUCE00 metadata\nmore");
        assert_eq!(canvas.height(), 1);
        assert_eq!(ch_at(&canvas, 0, 3), Some(' '));
    }

    #[test]
    fn test_sgr_colours() {
        let canvas = canvas(b"\x1b[31;44mX\x1b[0mY");
        let x = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(x.fg, vga(1));
        assert_eq!(x.bg, vga(4));
        let y = canvas.cell(0, 1).copied().unwrap();
        assert_eq!(y.fg, vga(7));
        assert_eq!(y.bg, vga(0));
    }

    #[test]
    fn test_bold_brightens_foreground() {
        let canvas = canvas(b"\x1b[1;32mX");
        assert_eq!(canvas.cell(0, 0).unwrap().fg, vga(10));
    }

    #[test]
    fn test_blink_brightens_background() {
        let canvas = canvas(b"\x1b[5;41mX");
        assert_eq!(canvas.cell(0, 0).unwrap().bg, vga(9));
    }

    #[test]
    fn test_inverse_swaps_colours() {
        let canvas = canvas(b"\x1b[7mX");
        let cell = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(cell.fg, vga(0));
        assert_eq!(cell.bg, vga(7));
    }

    #[test]
    fn test_bright_codes() {
        let canvas = canvas(b"\x1b[93;104mX");
        let cell = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(cell.fg, vga(11));
        assert_eq!(cell.bg, vga(12));
    }

    #[test]
    fn test_extended_colours() {
        let canvas = canvas(b"\x1b[38;5;196;48;2;1;2;3mX");
        let cell = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(cell.fg, Rgb([255, 0, 0]));
        assert_eq!(cell.bg, Rgb([1, 2, 3]));
    }

    #[test]
    fn test_pablodraw_truecolour() {
        let canvas = canvas(b"\x1b[1;10;20;30t\x1b[0;40;50;60tX");
        let cell = canvas.cell(0, 0).copied().unwrap();
        assert_eq!(cell.fg, Rgb([10, 20, 30]));
        assert_eq!(cell.bg, Rgb([40, 50, 60]));
    }

    #[test]
    fn test_cursor_positioning() {
        let canvas = canvas(b"\x1b[3;5HX");
        assert_eq!(ch_at(&canvas, 2, 4), Some('X'));
    }

    #[test]
    fn test_cursor_movement() {
        let canvas = canvas(b"\x1b[2B\x1b[4CX\x1b[1A\x1b[2DY");
        assert_eq!(ch_at(&canvas, 2, 4), Some('X'));
        assert_eq!(ch_at(&canvas, 1, 3), Some('Y'));
    }

    #[test]
    fn test_cursor_up_stops_at_top() {
        let canvas = canvas(b"\x1b[9AX");
        assert_eq!(ch_at(&canvas, 0, 0), Some('X'));
    }

    #[test]
    fn test_save_restore() {
        let canvas = canvas(b"ab\x1b[s\ncd\x1b[uX");
        assert_eq!(ch_at(&canvas, 0, 2), Some('X'));
    }

    #[test]
    fn test_clear_screen() {
        let canvas = canvas(b"junk\n\nmore\x1b[2JX");
        assert_eq!(canvas.height(), 1);
        assert_eq!(ch_at(&canvas, 0, 0), Some('X'));
        assert_eq!(ch_at(&canvas, 0, 1), Some(' '));
    }

    #[test]
    fn test_erase_line() {
        let canvas = canvas(b"abcdef\x1b[1;3H\x1b[K");
        assert_eq!(ch_at(&canvas, 0, 1), Some('b'));
        assert_eq!(ch_at(&canvas, 0, 2), Some(' '));
        assert_eq!(ch_at(&canvas, 0, 5), Some(' '));
    }

    #[test]
    fn test_private_sequences_are_ignored() {
        let canvas = canvas(b"\x1b[?7hX");
        assert_eq!(ch_at(&canvas, 0, 0), Some('X'));
    }

    #[test]
    fn test_cp437_fallback_decoding() {
        // 0xDB is not valid UTF-8 on its own.
        let canvas = canvas(b"\xdb\xb0");
        assert_eq!(ch_at(&canvas, 0, 0), Some('█'));
        assert_eq!(ch_at(&canvas, 0, 1), Some('░'));
    }

    #[test]
    fn test_utf8_decoding() {
        let canvas = canvas("é█".as_bytes());
        assert_eq!(ch_at(&canvas, 0, 0), Some('é'));
        assert_eq!(ch_at(&canvas, 0, 1), Some('█'));
    }

    #[test]
    fn test_height_is_capped() {
        let input = "x\n".repeat(MAX_ROWS + 10);
        assert_eq!(canvas(input.as_bytes()).height(), MAX_ROWS);
    }

    #[test]
    fn test_render_empty_input() {
        assert!(matches!(
            AnsiRenderer::new().render(b""),
            Err(RenderError::EmptyInput)
        ));
    }

    #[test]
    fn test_render_produces_png_of_expected_size() {
        let png = AnsiRenderer::new().render(b"one\ntwo\nthree\n").unwrap();
        let image = image::load_from_memory(&png).unwrap();
        assert_eq!(image.width(), 640);
        assert_eq!(image.height(), 48);
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params(""), Vec::<u32>::new());
        assert_eq!(parse_params("1;31"), vec![1, 31]);
        assert_eq!(parse_params(";5"), vec![0, 5]);
        assert_eq!(parse_params("?25"), vec![25]);
    }
}
