use std::ops::{ Add, Sub, Mul };

use serde::{ Serialize, Deserialize };

use crate::consts::COLOR_EPSILON;
use crate::tuple::Double3;

/// A color.
///
/// Represented with red-green-blue (RGB) values. Values are linear light
/// intensities and are not clamped: a light of intensity `(1000, 600, 0)` is
/// perfectly valid, and a shaded pixel may exceed 1.0. Mapping to a displayable
/// range is left to whoever encodes the image.
///
/// # Examples
///
/// Blend two colors:
///
/// ```
/// # use pinhole_tracer::color::Color;
/// let green = Color::rgb(0.0, 1.0, 0.0);
/// let blue = Color::rgb(0.0, 0.0, 1.0);
/// let blend = Color::average(&[green, blue]);
/// assert_eq!(blend, Color::rgb(0.0, 0.5, 0.5));
/// ```
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Partial equality on two colors.
///
/// Colors are compared component-wise with `COLOR_EPSILON`, which is looser
/// than the geometric tolerance.
impl PartialEq for Color {
    fn eq(&self, other: &Color) -> bool {
        (self.r - other.r).abs() < COLOR_EPSILON &&
            (self.g - other.g).abs() < COLOR_EPSILON &&
            (self.b - other.b).abs() < COLOR_EPSILON
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    /// Creates a color with red, green and blue values.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color { r, g, b }
    }

    /// Creates a color from 0-255 channel values, e.g. `(255, 0, 0)` for red.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Color {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Scales each channel by the matching component of `k`.
    pub fn scale(&self, k: &Double3) -> Color {
        Color {
            r: self.r * k.x,
            g: self.g * k.y,
            b: self.b * k.z,
        }
    }

    /// Divides every channel by `n`.
    pub fn reduce(&self, n: f64) -> Color {
        Color {
            r: self.r / n,
            g: self.g / n,
            b: self.b / n,
        }
    }

    /// Averages a slice of colors. An empty slice averages to black.
    pub fn average(colors: &[Color]) -> Color {
        if colors.is_empty() {
            return Color::BLACK;
        }

        colors.iter()
            .fold(Color::BLACK, |acc, c| acc + *c)
            .reduce(colors.len() as f64)
    }

    /// Mean of the three channels. Handy for comparing brightness.
    pub fn luminance(&self) -> f64 {
        (self.r + self.g + self.b) / 3.0
    }
}

/// Adds two colors together.
impl Add<Color> for Color {
    type Output = Color;

    fn add(self, other: Color) -> Self::Output {
        Color {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
        }
    }
}

/// Subtracts one color from another.
impl Sub<Color> for Color {
    type Output = Color;

    fn sub(self, other: Color) -> Self::Output {
        Color {
            r: self.r - other.r,
            g: self.g - other.g,
            b: self.b - other.b,
        }
    }
}

/// Multiplies a color by a scalar.
impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, other: f64) -> Self::Output {
        Color {
            r: self.r * other,
            g: self.g * other,
            b: self.b * other,
        }
    }
}

/// Multiplies two colors channel by channel (the Hadamard product).
impl Mul<Color> for Color {
    type Output = Color;

    fn mul(self, other: Color) -> Self::Output {
        Color {
            r: self.r * other.r,
            g: self.g * other.g,
            b: self.b * other.b,
        }
    }
}

#[test]
fn add_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 + c2, Color::rgb(1.6, 0.7, 1.0));
}

#[test]
fn subtract_colors() {
    let c1 = Color::rgb(0.9, 0.6, 0.75);
    let c2 = Color::rgb(0.7, 0.1, 0.25);

    assert_eq!(c1 - c2, Color::rgb(0.2, 0.5, 0.5));
}

#[test]
fn multiply_colors() {
    let c1 = Color::rgb(0.2, 0.3, 0.4);

    assert_eq!(c1 * 2.0, Color::rgb(0.4, 0.6, 0.8));
    assert_eq!(c1 * Color::rgb(1.0, 0.5, 0.0), Color::rgb(0.2, 0.15, 0.0));
}

#[test]
fn scale_color_per_channel() {
    let c = Color::rgb(1000.0, 600.0, 0.0);

    assert_eq!(c.scale(&Double3::new(0.5, 0.0, 1.0)), Color::rgb(500.0, 0.0, 0.0));
}

#[test]
fn average_of_nothing_is_black() {
    assert_eq!(Color::average(&[]), Color::BLACK);
}

#[test]
fn rgb8_maps_to_unit_range() {
    assert_eq!(Color::rgb8(255, 0, 51), Color::rgb(1.0, 0.0, 0.2));
}
