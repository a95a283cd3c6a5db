use crate::consts::BOX_PADDING;
use crate::ray::Ray;
use crate::tuple::{ Double3, Point };

/// An axis-aligned bounding box.
///
/// Boxes are derived from the geometry they enclose and are only used to skip
/// intersection tests that provably can't succeed. Unbounded geometry (planes,
/// infinite tubes) simply has no box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub minimum: Point,
    pub maximum: Point,
}

impl BoundingBox {
    /// Creates a box from two opposite corners, in any order.
    pub fn new(a: Point, b: Point) -> BoundingBox {
        BoundingBox {
            minimum: Point::from(a.xyz().min(&b.xyz())),
            maximum: Point::from(a.xyz().max(&b.xyz())),
        }
    }

    /// The smallest box holding every point. `None` for no points.
    pub fn around<'a, I>(points: I) -> Option<BoundingBox>
        where I: IntoIterator<Item = &'a Point> {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        Some(iter.fold(BoundingBox::new(*first, *first), |b, p| {
            b.union(&BoundingBox::new(*p, *p))
        }))
    }

    /// The smallest box holding both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            minimum: Point::from(self.minimum.xyz().min(&other.minimum.xyz())),
            maximum: Point::from(self.maximum.xyz().max(&other.maximum.xyz())),
        }
    }

    pub fn contains(&self, p: &Point) -> bool {
        let lo = self.minimum.xyz().to_array();
        let hi = self.maximum.xyz().to_array();
        let p = p.xyz().to_array();

        (0..3).all(|axis| lo[axis] <= p[axis] && p[axis] <= hi[axis])
    }

    /// Checks whether `ray` may hit anything inside the box within
    /// `(0, max_distance]`, using the slab method.
    ///
    /// For each axis the ray enters and exits the pair of planes bounding that
    /// axis at two offsets `t`; the ray passes through the box only if the
    /// running intersection of those intervals stays non-empty. The box is
    /// padded slightly so that geometry lying exactly on a face (a flat
    /// polygon, a sphere's tangent point) is never culled by rounding.
    pub fn intersects(&self, ray: &Ray, max_distance: f64) -> bool {
        let minimum = self.minimum.xyz().to_array();
        let maximum = self.maximum.xyz().to_array();
        let origin = ray.origin().xyz().to_array();
        let direction = ray.direction().xyz().to_array();

        let mut tmin = std::f64::NEG_INFINITY;
        let mut tmax = std::f64::INFINITY;

        for axis in 0..3 {
            let (t0, t1) = match Self::check_axis(
                minimum[axis],
                maximum[axis],
                origin[axis],
                direction[axis],
            ) {
                Some(ts) => ts,
                None => return false,
            };

            tmin = tmin.max(t0);
            tmax = tmax.min(t1);

            // The intervals stopped overlapping; no need to check other axes.
            if tmin > tmax {
                return false;
            }
        }

        tmax >= 0.0 && tmin <= max_distance
    }

    /// Gets the entry and exit offsets of a ray along one axis of the box.
    ///
    /// The smaller `t` is first in the tuple. A ray running parallel to the
    /// slab either lies inside it for every `t`, or misses it entirely, in
    /// which case `None` is returned.
    fn check_axis(minimum: f64, maximum: f64, origin: f64, direction: f64)
        -> Option<(f64, f64)> {
        let pad = BOX_PADDING * (1.0 + minimum.abs().max(maximum.abs()));
        let minimum = minimum - pad;
        let maximum = maximum + pad;

        if direction == 0.0 {
            return if minimum <= origin && origin <= maximum {
                Some((std::f64::NEG_INFINITY, std::f64::INFINITY))
            } else {
                None
            };
        }

        let t0 = (minimum - origin) / direction;
        let t1 = (maximum - origin) / direction;

        if t0 > t1 { Some((t1, t0)) } else { Some((t0, t1)) }
    }

    /// The center of the box.
    pub fn center(&self) -> Point {
        Point::from((self.minimum.xyz() + self.maximum.xyz()) * 0.5)
    }

    /// The size of the box along each axis.
    pub fn extent(&self) -> Double3 {
        self.maximum.xyz() - self.minimum.xyz()
    }
}

/* Tests */

#[cfg(test)]
fn unit_box() -> BoundingBox {
    BoundingBox::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
}

#[test]
fn box_corners_are_sorted() {
    let b = BoundingBox::new(Point::new(1.0, -2.0, 3.0), Point::new(-1.0, 2.0, -3.0));

    assert_eq!(b.minimum, Point::new(-1.0, -2.0, -3.0));
    assert_eq!(b.maximum, Point::new(1.0, 2.0, 3.0));
    assert_eq!(b.center(), Point::ORIGIN);
    assert_eq!(b.extent(), Double3::new(2.0, 4.0, 6.0));
}

#[test]
fn box_around_points_and_union() {
    let points = [
        Point::new(0.0, 5.0, -1.0),
        Point::new(2.0, -3.0, 1.0),
        Point::new(-4.0, 0.0, 0.0),
    ];
    let b = BoundingBox::around(points.iter()).unwrap();

    assert_eq!(b.minimum, Point::new(-4.0, -3.0, -1.0));
    assert_eq!(b.maximum, Point::new(2.0, 5.0, 1.0));
    assert!(BoundingBox::around(std::iter::empty()).is_none());

    let u = b.union(&unit_box());
    assert_eq!(u.minimum, Point::new(-4.0, -3.0, -1.0));
    assert_eq!(u.maximum, Point::new(2.0, 5.0, 1.0));
    assert!(u.contains(&Point::new(1.0, 1.0, 1.0)));
    assert!(!u.contains(&Point::new(3.0, 0.0, 0.0)));
}

#[test]
fn ray_intersects_box_on_each_face() {
    use crate::tuple::Vector;

    let b = unit_box();
    let cases = [
        (Point::new( 5.0,  0.5,  0.0), Vector::new(-1.0,  0.0,  0.0).unwrap()),
        (Point::new(-5.0,  0.5,  0.0), Vector::new( 1.0,  0.0,  0.0).unwrap()),
        (Point::new( 0.5,  5.0,  0.0), Vector::new( 0.0, -1.0,  0.0).unwrap()),
        (Point::new( 0.5, -5.0,  0.0), Vector::new( 0.0,  1.0,  0.0).unwrap()),
        (Point::new( 0.5,  0.0,  5.0), Vector::new( 0.0,  0.0, -1.0).unwrap()),
        (Point::new( 0.5,  0.0, -5.0), Vector::new( 0.0,  0.0,  1.0).unwrap()),
        (Point::new( 0.0,  0.5,  0.0), Vector::new( 0.0,  0.0,  1.0).unwrap()),
    ];

    for (origin, direction) in cases.iter() {
        let r = Ray::new(*origin, *direction);
        assert!(b.intersects(&r, std::f64::INFINITY));
    }
}

#[test]
fn ray_misses_box() {
    use crate::tuple::Vector;

    let b = unit_box();
    let cases = [
        (Point::new(-2.0,  0.0,  0.0), Vector::new(2.0, 4.0, 6.0).unwrap()),
        (Point::new( 0.0, -2.0,  0.0), Vector::new(6.0, 2.0, 4.0).unwrap()),
        (Point::new( 0.0,  0.0, -2.0), Vector::new(4.0, 6.0, 2.0).unwrap()),
        (Point::new( 2.0,  0.0,  2.0), Vector::new(0.0, 0.0, -1.0).unwrap()),
        (Point::new( 0.0,  2.0,  2.0), Vector::new(0.0, -1.0, 0.0).unwrap()),
        (Point::new( 2.0,  2.0,  0.0), Vector::new(-1.0, 0.0, 0.0).unwrap()),
    ];

    for (origin, direction) in cases.iter() {
        let r = Ray::new(*origin, *direction);
        assert!(!b.intersects(&r, std::f64::INFINITY));
    }
}

#[test]
fn box_behind_or_beyond_reach_is_missed() {
    use crate::tuple::Vector;

    let b = unit_box();
    let away = Ray::new(Point::new(0.0, 0.0, 5.0), Vector::Z);
    assert!(!b.intersects(&away, std::f64::INFINITY));

    let towards = Ray::new(Point::new(0.0, 0.0, 5.0), -Vector::Z);
    assert!(!b.intersects(&towards, 3.0));
    assert!(b.intersects(&towards, 4.5));
}

#[test]
fn flat_box_is_still_hit() {
    use crate::tuple::Vector;

    let flat = BoundingBox::new(Point::new(-1.0, -1.0, 0.0), Point::new(1.0, 1.0, 0.0));
    let r = Ray::new(Point::new(0.2, 0.3, -4.0), Vector::Z);

    assert!(flat.intersects(&r, std::f64::INFINITY));
}
