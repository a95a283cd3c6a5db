use std::convert::TryFrom;
use std::ops::{ Add, Sub, Neg, Mul };

use serde::{ Serialize, Deserialize };

use crate::consts::FEQ_EPSILON;
use crate::error::{ Result, TracerError };
use crate::feq;

/// Checks whether a number is zero within `FEQ_EPSILON`.
pub fn is_zero(value: f64) -> bool {
    value.abs() < FEQ_EPSILON
}

/// Snaps a number within `FEQ_EPSILON` of zero to exactly zero.
///
/// Used before sign tests, so that rounding noise around zero can't flip the
/// outcome of a comparison.
pub fn align_zero(value: f64) -> f64 {
    if is_zero(value) { 0.0 } else { value }
}

/// A raw triad of floats.
///
/// Unlike `Point` and `Vector` this carries no geometric meaning and no
/// invariants; it is the scratch space for arithmetic that may legitimately
/// pass through zero, and the storage for per-channel material coefficients.
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct Double3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Double3 {
    fn eq(&self, other: &Double3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<f64> for Double3 {
    fn from(value: f64) -> Double3 {
        Double3::splat(value)
    }
}

impl Double3 {
    pub const ZERO: Double3 = Double3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Double3 = Double3 { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Double3 {
        Double3 { x, y, z }
    }

    /// A triad with the same value in all three components.
    pub fn splat(value: f64) -> Double3 {
        Double3 { x: value, y: value, z: value }
    }

    pub fn dot(&self, other: &Double3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Double3) -> Double3 {
        Double3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Component-wise product.
    pub fn product(&self, other: &Double3) -> Double3 {
        Double3 {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Divides every component by `divisor`.
    pub fn reduce(&self, divisor: f64) -> Double3 {
        Double3 {
            x: self.x / divisor,
            y: self.y / divisor,
            z: self.z / divisor,
        }
    }

    pub fn min(&self, other: &Double3) -> Double3 {
        Double3 {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    pub fn max(&self, other: &Double3) -> Double3 {
        Double3 {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// True when every component is strictly below `k`.
    pub fn lower_than(&self, k: f64) -> bool {
        self.x < k && self.y < k && self.z < k
    }

    /// True when every component is within `FEQ_EPSILON` of zero.
    pub fn is_zero(&self) -> bool {
        is_zero(self.x) && is_zero(self.y) && is_zero(self.z)
    }

    /// The components in X, Y, Z order.
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl Add for Double3 {
    type Output = Double3;

    fn add(self, other: Double3) -> Double3 {
        Double3 {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Double3 {
    type Output = Double3;

    fn sub(self, other: Double3) -> Double3 {
        Double3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Double3 {
    type Output = Double3;

    fn neg(self) -> Double3 {
        Double3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<f64> for Double3 {
    type Output = Double3;

    fn mul(self, other: f64) -> Double3 {
        Double3 {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// A position in space.
///
/// Points may coincide with the origin and with each other; the difference of
/// two points is a `Vector`, which may not be zero, so `subtract` is fallible.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    xyz: Double3,
}

impl Point {
    pub const ORIGIN: Point = Point { xyz: Double3::ZERO };

    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { xyz: Double3::new(x, y, z) }
    }

    pub fn x(&self) -> f64 { self.xyz.x }
    pub fn y(&self) -> f64 { self.xyz.y }
    pub fn z(&self) -> f64 { self.xyz.z }

    /// The raw coordinates of this point.
    pub fn xyz(&self) -> Double3 {
        self.xyz
    }

    /// Computes the vector from `other` to `self`.
    ///
    /// Fails with `TracerError::ZeroVector` when the points coincide.
    ///
    /// ```
    /// # use pinhole_tracer::tuple::{ Point, Vector };
    /// let p1 = Point::new(3.0, 2.0, 1.0);
    /// let p2 = Point::new(5.0, 6.0, 7.0);
    /// assert_eq!(p1.subtract(&p2).unwrap(), Vector::new(-2.0, -4.0, -6.0).unwrap());
    /// assert!(p1.subtract(&p1).is_err());
    /// ```
    pub fn subtract(&self, other: &Point) -> Result<Vector> {
        Vector::try_from(self.xyz - other.xyz)
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        (self.xyz - other.xyz).length_squared()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<Double3> for Point {
    fn from(xyz: Double3) -> Point {
        Point { xyz }
    }
}

impl Add<Vector> for Point {
    type Output = Point;

    fn add(self, other: Vector) -> Point {
        Point { xyz: self.xyz + other.xyz }
    }
}

impl Sub<Vector> for Point {
    type Output = Point;

    fn sub(self, other: Vector) -> Point {
        Point { xyz: self.xyz - other.xyz }
    }
}

/// A displacement in space.
///
/// A vector is never the zero vector: every constructor and every operation
/// that could produce one returns `Err(TracerError::ZeroVector)` instead. As a
/// result `normalize` is total.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Double3", into = "Double3")]
pub struct Vector {
    xyz: Double3,
}

impl TryFrom<Double3> for Vector {
    type Error = TracerError;

    fn try_from(xyz: Double3) -> Result<Vector> {
        if xyz.is_zero() {
            Err(TracerError::ZeroVector)
        } else {
            Ok(Vector { xyz })
        }
    }
}

impl From<Vector> for Double3 {
    fn from(v: Vector) -> Double3 {
        v.xyz
    }
}

impl Vector {
    pub const X: Vector = Vector { xyz: Double3 { x: 1.0, y: 0.0, z: 0.0 } };
    pub const Y: Vector = Vector { xyz: Double3 { x: 0.0, y: 1.0, z: 0.0 } };
    pub const Z: Vector = Vector { xyz: Double3 { x: 0.0, y: 0.0, z: 1.0 } };

    pub fn new(x: f64, y: f64, z: f64) -> Result<Vector> {
        Vector::try_from(Double3::new(x, y, z))
    }

    /// Wraps a triad already known to be non-zero (e.g. a reflection or
    /// rotation of a unit vector).
    pub(crate) fn unchecked(xyz: Double3) -> Vector {
        debug_assert!(!xyz.is_zero());
        Vector { xyz }
    }

    pub fn x(&self) -> f64 { self.xyz.x }
    pub fn y(&self) -> f64 { self.xyz.y }
    pub fn z(&self) -> f64 { self.xyz.z }

    /// The raw components of this vector.
    pub fn xyz(&self) -> Double3 {
        self.xyz
    }

    /// Adds two vectors; fails if they cancel out.
    pub fn add(&self, other: &Vector) -> Result<Vector> {
        Vector::try_from(self.xyz + other.xyz)
    }

    /// Scales a vector; fails for a (near) zero factor.
    pub fn scale(&self, factor: f64) -> Result<Vector> {
        Vector::try_from(self.xyz * factor)
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.xyz.dot(&other.xyz)
    }

    /// Cross product; fails for parallel vectors.
    pub fn cross(&self, other: &Vector) -> Result<Vector> {
        Vector::try_from(self.xyz.cross(&other.xyz))
    }

    pub fn length_squared(&self) -> f64 {
        self.xyz.length_squared()
    }

    pub fn length(&self) -> f64 {
        self.xyz.length()
    }

    /// Returns the unit vector pointing the same way as `self`.
    ///
    /// ```
    /// # use pinhole_tracer::tuple::Vector;
    /// let v = Vector::new(4.0, 0.0, 0.0).unwrap();
    /// assert_eq!(v.normalize(), Vector::X);
    /// ```
    pub fn normalize(&self) -> Vector {
        Vector { xyz: self.xyz.reduce(self.length()) }
    }

    /// Reflects a vector across a normal.
    ///
    /// The normal is normalized first; reflecting across a unit normal keeps
    /// the length of the vector, so the result is never zero.
    pub fn reflect(&self, normal: &Vector) -> Vector {
        let n = normal.normalize();
        Vector::unchecked(self.xyz - n.xyz * (2.0 * self.dot(&n)))
    }

    /// Rotates a vector about a unit `axis` by `degrees` (right-hand rule).
    pub fn rotate(&self, axis: &Vector, degrees: f64) -> Vector {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let k = axis.xyz;
        let v = self.xyz;

        // Rodrigues' rotation formula
        let rotated = v * cos + k.cross(&v) * sin + k * (k.dot(&v) * (1.0 - cos));
        Vector::unchecked(rotated)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector { xyz: -self.xyz }
    }
}

/* Tests */

#[test]
fn add_point_and_vector() {
    let p = Point::new(3.0, -2.0, 5.0);
    let v = Vector::new(-2.0, 3.0, 1.0).unwrap();

    assert_eq!(p + v, Point::new(1.0, 1.0, 6.0));
    assert_eq!(p - v, Point::new(5.0, -5.0, 4.0));
}

#[test]
fn sub_points() {
    let p1 = Point::new(3.0, 2.0, 1.0);
    let p2 = Point::new(5.0, 6.0, 7.0);

    assert_eq!(p1.subtract(&p2).unwrap(), Vector::new(-2.0, -4.0, -6.0).unwrap());
}

#[test]
fn sub_coincident_points_fails() {
    let p = Point::new(1.0, 2.0, 3.0);
    let q = Point::new(1.0, 2.0, 3.0 + 1e-12);

    assert!(matches!(p.subtract(&q), Err(TracerError::ZeroVector)));
}

#[test]
fn zero_vector_is_rejected() {
    assert!(Vector::new(0.0, 0.0, 0.0).is_err());
    assert!(Vector::new(1.0, -2.0, 3.0).unwrap().scale(0.0).is_err());

    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    assert!(v.add(&-v).is_err());
}

#[test]
fn neg_vector() {
    let v = Vector::new(1.0, -2.0, 3.0).unwrap();

    assert_eq!(-v, Vector::new(-1.0, 2.0, -3.0).unwrap());
}

#[test]
fn scale_vector() {
    let v = Vector::new(1.0, -2.0, 3.0).unwrap();

    assert_eq!(v.scale(3.5).unwrap(), Vector::new(3.5, -7.0, 10.5).unwrap());
    assert_eq!(v.scale(0.5).unwrap(), Vector::new(0.5, -1.0, 1.5).unwrap());
}

#[test]
fn length_of_vectors() {
    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    let w = Vector::new(-1.0, -2.0, -3.0).unwrap();

    assert!(feq(v.length(), 14.0f64.sqrt()));
    assert!(feq(w.length(), 14.0f64.sqrt()));
    assert!(feq(v.length_squared(), 14.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector::new(1.0, 2.0, 3.0).unwrap();
    let e = Vector::new(
        1.0 / 14.0f64.sqrt(),
        2.0 / 14.0f64.sqrt(),
        3.0 / 14.0f64.sqrt(),
    ).unwrap();

    assert_eq!(v.normalize(), e);
    assert!(feq(v.normalize().length(), 1.0));
}

#[test]
fn normalize_is_scale_invariant() {
    let vectors = [
        Vector::new(1.0, 2.0, 3.0).unwrap(),
        Vector::new(-0.3, 1e-3, 7.0).unwrap(),
        Vector::new(1e-6, 0.0, 0.0).unwrap(),
    ];

    for v in vectors.iter() {
        for k in [0.25, 1.0, 3.7, 1000.0].iter() {
            let scaled = v.scale(*k).unwrap();

            assert!(feq(scaled.normalize().length(), 1.0));
            assert_eq!(scaled.normalize(), v.normalize());
        }
    }
}

#[test]
fn dot_vectors() {
    let a = Vector::new(1.0, 2.0, 3.0).unwrap();
    let b = Vector::new(2.0, 3.0, 4.0).unwrap();

    assert!(feq(a.dot(&b), 20.0));
}

#[test]
fn cross_vectors() {
    let a = Vector::new(1.0, 2.0, 3.0).unwrap();
    let b = Vector::new(2.0, 3.0, 4.0).unwrap();

    assert_eq!(a.cross(&b).unwrap(), Vector::new(-1.0, 2.0, -1.0).unwrap());
    assert_eq!(b.cross(&a).unwrap(), Vector::new(1.0, -2.0, 1.0).unwrap());
}

#[test]
fn cross_parallel_vectors_fails() {
    let a = Vector::new(1.0, 2.0, 3.0).unwrap();
    let b = Vector::new(-2.0, -4.0, -6.0).unwrap();

    assert!(a.cross(&b).is_err());
}

#[test]
fn reflect_45() {
    let v = Vector::new(1.0, -1.0, 0.0).unwrap();
    let n = Vector::Y;

    assert_eq!(v.reflect(&n), Vector::new(1.0, 1.0, 0.0).unwrap());
}

#[test]
fn reflect_across_long_normal() {
    let n = Vector::new(0.5f64.sqrt(), 0.0, 0.0).unwrap();
    assert_eq!(Vector::X.reflect(&n), -Vector::X);

    let n = Vector::new(0.0, 3.0, 0.0).unwrap();
    let v = Vector::new(1.0, -1.0, 0.0).unwrap();
    assert_eq!(v.reflect(&n), Vector::new(1.0, 1.0, 0.0).unwrap());
}

#[test]
fn rotate_about_axis() {
    assert_eq!(Vector::Y.rotate(&Vector::Z, 90.0), -Vector::X);
    assert_eq!(Vector::X.rotate(&Vector::Y, 180.0), -Vector::X);
}

#[test]
fn distance_between_points() {
    let p = Point::new(1.0, 2.0, 3.0);
    let q = Point::new(4.0, 6.0, 3.0);

    assert!(feq(p.distance_squared(&q), 25.0));
    assert!(feq(p.distance(&q), 5.0));
}

#[test]
fn align_zero_snaps_noise() {
    assert_eq!(align_zero(1e-12), 0.0);
    assert_eq!(align_zero(-1e-12), 0.0);
    assert_eq!(align_zero(0.5), 0.5);
}

#[test]
fn vector_deserialization_rejects_zero() {
    let v: Vector = serde_json::from_str(r#"{"x":0.0,"y":2.0,"z":0.0}"#).unwrap();
    assert_eq!(v, Vector::new(0.0, 2.0, 0.0).unwrap());

    let zero: std::result::Result<Vector, _>
        = serde_json::from_str(r#"{"x":0.0,"y":0.0,"z":0.0}"#);
    assert!(zero.is_err());
}
