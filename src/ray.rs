use crate::consts::RAY_OFFSET_DELTA;
use crate::shape::Hit;
use crate::tuple::{ Point, Vector };

/// A half-line in space: an origin and a unit-length direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    direction: Vector,
}

impl Ray {
    /// Creates a ray. The direction is normalized on the way in.
    pub fn new(origin: Point, direction: Vector) -> Ray {
        Ray { origin, direction: direction.normalize() }
    }

    /// Creates a ray leaving a surface point.
    ///
    /// The origin is pushed `RAY_OFFSET_DELTA` along `normal`, towards the side
    /// of the surface that `direction` heads into. Without this, a ray cast
    /// from a surface would immediately hit that same surface again.
    pub fn offset(point: Point, normal: &Vector, direction: Vector) -> Ray {
        let direction = direction.normalize();
        let delta = if normal.dot(&direction) < 0.0 {
            -RAY_OFFSET_DELTA
        } else {
            RAY_OFFSET_DELTA
        };

        let origin = Point::from(point.xyz() + normal.xyz() * delta);
        Ray { origin, direction }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// The point at parameter `t` along the ray.
    ///
    /// Any finite `t` is accepted, including zero and negative values; callers
    /// that only care about what lies ahead of the ray filter on `t > 0`.
    pub fn point_at(&self, t: f64) -> Point {
        Point::from(self.origin.xyz() + self.direction.xyz() * t)
    }

    /// Picks the hit closest to the ray origin, or `None` if there are none.
    pub fn closest_hit<'a>(&self, hits: &[Hit<'a>]) -> Option<Hit<'a>> {
        hits.iter()
            .min_by(|a, b| {
                let da = a.point.distance_squared(&self.origin);
                let db = b.point.distance_squared(&self.origin);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }

    /// Picks the point closest to the ray origin, or `None` if there are none.
    pub fn closest_point(&self, points: &[Point]) -> Option<Point> {
        points.iter()
            .min_by(|a, b| {
                let da = a.distance_squared(&self.origin);
                let db = b.distance_squared(&self.origin);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }
}

/* Tests */

#[test]
fn ray_position() {
    let r = Ray::new(Point::new(2.0, 3.0, 4.0), Vector::X);

    assert_eq!(r.point_at(0.0), Point::new(2.0, 3.0, 4.0));
    assert_eq!(r.point_at(1.0), Point::new(3.0, 3.0, 4.0));
    assert_eq!(r.point_at(-1.0), Point::new(1.0, 3.0, 4.0));
    assert_eq!(r.point_at(2.5), Point::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let directions = [
        Vector::new(3.0, 4.0, 0.0).unwrap(),
        Vector::new(-0.001, 0.0, 0.002).unwrap(),
        Vector::new(100.0, -200.0, 300.0).unwrap(),
    ];

    for d in directions.iter() {
        let r = Ray::new(Point::ORIGIN, *d);
        assert!(crate::feq(r.direction().length(), 1.0));
        assert_eq!(r.direction(), d.normalize());
    }
}

#[test]
fn offset_moves_towards_exit_side() {
    let p = Point::new(0.0, 0.0, 0.0);
    let n = Vector::Y;

    let up = Ray::offset(p, &n, Vector::new(1.0, 1.0, 0.0).unwrap());
    assert_eq!(up.origin(), Point::new(0.0, RAY_OFFSET_DELTA, 0.0));

    let down = Ray::offset(p, &n, Vector::new(1.0, -1.0, 0.0).unwrap());
    assert_eq!(down.origin(), Point::new(0.0, -RAY_OFFSET_DELTA, 0.0));
}

#[test]
fn closest_point_of_many() {
    let r = Ray::new(Point::new(0.0, 0.0, 10.0), -Vector::Z);
    let points = [
        Point::new(0.0, 0.0, -5.0),
        Point::new(0.0, 0.0, 4.0),
        Point::new(0.0, 0.0, 1.0),
    ];

    assert_eq!(r.closest_point(&points), Some(Point::new(0.0, 0.0, 4.0)));
    assert_eq!(r.closest_point(&[]), None);
}

#[test]
fn closest_hit_of_many() {
    use crate::shape::Surface;

    let s = Surface::sphere(Point::ORIGIN, 1.0).unwrap();
    let r = Ray::new(Point::new(0.0, 0.0, -5.0), Vector::Z);
    let hits = vec![
        Hit { surface: &s, point: r.point_at(6.0), t: 6.0 },
        Hit { surface: &s, point: r.point_at(4.0), t: 4.0 },
    ];

    let closest = r.closest_hit(&hits).unwrap();
    assert_eq!(closest.point, Point::new(0.0, 0.0, -1.0));
    assert!(r.closest_hit(&[]).is_none());
}
