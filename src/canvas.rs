use crate::color::Color;

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer: one `Color` per pixel,
/// row by row from the top-left corner. Encoding the pixels into an image file
/// is left to the caller.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas with the specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Mutable row-major pixels, for renderers filling rows in parallel.
    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. `x` is the column of the pixel and
    /// `y` is the row. Rows and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use pinhole_tracer::color::Color;
    /// # use pinhole_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &purple);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), purple);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the location is out-of-bounds, `None` is returned.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }

    /// Paints every `interval`-th row and column with `color`, starting from
    /// the top-left pixel. Handy for checking camera framing.
    pub fn draw_grid(&mut self, interval: usize, color: &Color) {
        if interval == 0 {
            return;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                if y % interval == 0 || x % interval == 0 {
                    self.write_pixel(x, y, color);
                }
            }
        }
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.pixels().len(), 200);
    assert!(c.pixels().iter().all(|p| *p == Color::BLACK));
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(4, 3);
    c.write_pixel(4, 0, &Color::WHITE);
    c.write_pixel(0, 3, &Color::WHITE);

    assert!(c.pixels().iter().all(|p| *p == Color::BLACK));
    assert_eq!(c.read_pixel(4, 0), None);
    assert_eq!(c.read_pixel(3, 2), Some(Color::BLACK));
}

#[test]
fn pixels_are_row_major() {
    let mut c = Canvas::new(3, 2);
    c.write_pixel(2, 1, &Color::WHITE);

    assert_eq!(c.pixels()[5], Color::WHITE);
}

#[test]
fn grid_lines_every_interval() {
    let yellow = Color::rgb(1.0, 1.0, 0.0);
    let mut c = Canvas::new(7, 5);
    c.draw_grid(3, &yellow);

    assert_eq!(c.read_pixel(0, 1).unwrap(), yellow);
    assert_eq!(c.read_pixel(3, 4).unwrap(), yellow);
    assert_eq!(c.read_pixel(6, 2).unwrap(), yellow);
    assert_eq!(c.read_pixel(1, 3).unwrap(), yellow);
    assert_eq!(c.read_pixel(1, 1).unwrap(), Color::BLACK);
    assert_eq!(c.read_pixel(5, 4).unwrap(), Color::BLACK);
}
