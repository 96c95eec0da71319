//! Character-cell canvas and PNG rasterisation.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use super::font::{self, CELL_HEIGHT, CELL_WIDTH};
use super::palette::{Colour, DEFAULT_BG, DEFAULT_FG};
use super::RenderError;

/// Upper bound on rows drawn for a single image.
pub const MAX_ROWS: usize = 2000;

/// One character cell with resolved colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb<u8>,
    pub bg: Rgb<u8>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Colour::Indexed(DEFAULT_FG).to_rgb(),
            bg: Colour::Indexed(DEFAULT_BG).to_rgb(),
        }
    }
}

/// Fixed-width grid of cells that grows downward as rows are touched.
#[derive(Debug, Clone)]
pub struct Canvas {
    columns: usize,
    rows: Vec<Vec<Cell>>,
}

impl Canvas {
    /// Create an empty canvas `columns` cells wide.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows touched so far.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Store a cell. Writes outside the grid or past [`MAX_ROWS`] are dropped.
    pub fn put(&mut self, row: usize, column: usize, cell: Cell) {
        if let Some(line) = self.row_mut(row) {
            if let Some(slot) = line.get_mut(column) {
                *slot = cell;
            }
        }
    }

    /// Blank `row` from `column` to the right margin using `fill`.
    pub fn erase_line_from(&mut self, row: usize, column: usize, fill: Cell) {
        if let Some(line) = self.row_mut(row) {
            for slot in line.iter_mut().skip(column) {
                *slot = fill;
            }
        }
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|line| line.get(column))
    }

    fn row_mut(&mut self, row: usize) -> Option<&mut Vec<Cell>> {
        if row >= MAX_ROWS {
            return None;
        }
        if row >= self.rows.len() {
            self.rows.resize(row + 1, vec![Cell::default(); self.columns]);
        }
        self.rows.get_mut(row)
    }

    /// Rasterise the canvas. An untouched canvas yields a single blank row.
    pub fn to_image(&self) -> RgbImage {
        let rows = self.rows.len().max(1);
        let width = self.columns as u32 * CELL_WIDTH;
        let height = rows as u32 * CELL_HEIGHT;
        let blank = Cell::default();

        let mut image = RgbImage::from_pixel(width, height, blank.bg);
        for (row_idx, line) in self.rows.iter().enumerate() {
            for (col_idx, cell) in line.iter().enumerate() {
                draw_cell(&mut image, row_idx as u32, col_idx as u32, cell);
            }
        }
        image
    }

    /// Rasterise and encode as PNG, in memory.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let image = self.to_image();
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }
}

fn draw_cell(image: &mut RgbImage, row: u32, column: u32, cell: &Cell) {
    let bitmap = font::glyph(cell.ch);
    let x0 = column * CELL_WIDTH;
    let y0 = row * CELL_HEIGHT;
    for dy in 0..CELL_HEIGHT {
        let bits = bitmap[(dy / 2) as usize];
        for dx in 0..CELL_WIDTH {
            let pixel = if bits & (1 << dx) != 0 {
                cell.fg
            } else {
                cell.bg
            };
            image.put_pixel(x0 + dx, y0 + dy, pixel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_block() -> Cell {
        Cell {
            ch: '█',
            fg: Rgb([255, 0, 0]),
            bg: Rgb([0, 0, 0]),
        }
    }

    #[test]
    fn test_empty_canvas_is_one_blank_row() {
        let canvas = Canvas::new(80);
        let image = canvas.to_image();
        assert_eq!(image.dimensions(), (640, 16));
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_put_grows_rows() {
        let mut canvas = Canvas::new(80);
        canvas.put(2, 0, red_block());
        assert_eq!(canvas.height(), 3);
        assert_eq!(canvas.to_image().dimensions(), (640, 48));
    }

    #[test]
    fn test_put_outside_columns_is_dropped() {
        let mut canvas = Canvas::new(4);
        canvas.put(0, 4, red_block());
        assert_eq!(canvas.height(), 1);
        assert!(canvas.cell(0, 3).is_some_and(|c| c.ch == ' '));
    }

    #[test]
    fn test_rows_are_capped() {
        let mut canvas = Canvas::new(4);
        canvas.put(MAX_ROWS, 0, red_block());
        assert_eq!(canvas.height(), 0);
        canvas.put(MAX_ROWS - 1, 0, red_block());
        assert_eq!(canvas.height(), MAX_ROWS);
    }

    #[test]
    fn test_cell_pixels() {
        let mut canvas = Canvas::new(2);
        canvas.put(0, 1, red_block());
        let image = canvas.to_image();
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(8, 0), Rgb([255, 0, 0]));
        assert_eq!(*image.get_pixel(15, 15), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_erase_line_from() {
        let mut canvas = Canvas::new(4);
        for col in 0..4 {
            canvas.put(0, col, red_block());
        }
        canvas.erase_line_from(0, 2, Cell::default());
        assert_eq!(canvas.cell(0, 1).map(|c| c.ch), Some('█'));
        assert_eq!(canvas.cell(0, 2).map(|c| c.ch), Some(' '));
        assert_eq!(canvas.cell(0, 3).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn test_encode_png_signature() {
        let mut canvas = Canvas::new(80);
        canvas.put(0, 0, red_block());
        let png = canvas.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
