pub mod consts;
pub mod error;
pub mod logger;

pub mod tuple;
pub mod ray;
pub mod color;
pub mod bounds;

pub mod geometry;
pub mod shape;
pub mod geometries;
pub mod material;
pub mod light;
pub mod scene;

pub mod tracer;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod render;

use consts::FEQ_EPSILON;

/// Compares two floats within `FEQ_EPSILON`.
pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
