use crate::bounds::BoundingBox;
use crate::color::Color;
use crate::error::Result;
use crate::geometry::{ Sphere, Plane, Polygon, Tube, Cylinder };
use crate::material::Material;
use crate::ray::Ray;
use crate::tuple::{ Point, Vector };

/// The concrete geometry behind a surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceKind {
    /// A sphere with a center and radius.
    Sphere(Sphere),

    /// An infinite plane.
    Plane(Plane),

    /// A flat convex polygon; triangles included.
    Polygon(Polygon),

    /// An infinite tube around an axis ray.
    Tube(Tube),

    /// A tube cut to a height and closed with two discs.
    Cylinder(Cylinder),
}

/// A renderable surface: a piece of geometry with a material and an emission
/// color.
///
/// Surfaces are immutable once built; the fluent `with_*` methods consume and
/// return the surface while a scene is being put together.
///
/// # Examples
///
/// A shiny red ball:
///
/// ```
/// # use pinhole_tracer::shape::Surface;
/// # use pinhole_tracer::material::Material;
/// # use pinhole_tracer::color::Color;
/// # use pinhole_tracer::tuple::Point;
/// let ball = Surface::sphere(Point::new(0.0, 0.0, -50.0), 10.0).unwrap()
///     .with_emission(Color::rgb(0.4, 0.0, 0.0))
///     .with_material(Material::new().kd(0.5).ks(0.5).shininess(100));
///
/// assert!(ball.bounds().is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    kind: SurfaceKind,
    pub material: Material,
    pub emission: Color,
    bounds: Option<BoundingBox>,
}

impl Surface {
    fn from_kind(kind: SurfaceKind) -> Surface {
        let bounds = match &kind {
            SurfaceKind::Sphere(s) => Some(s.bounds()),
            SurfaceKind::Polygon(p) => p.bounds(),
            SurfaceKind::Cylinder(c) => Some(c.bounds()),
            SurfaceKind::Plane(_) | SurfaceKind::Tube(_) => None,
        };

        Surface {
            kind,
            material: Material::default(),
            emission: Color::BLACK,
            bounds,
        }
    }

    pub fn sphere(center: Point, radius: f64) -> Result<Surface> {
        Ok(Surface::from_kind(SurfaceKind::Sphere(Sphere::new(center, radius)?)))
    }

    pub fn plane(q0: Point, normal: Vector) -> Surface {
        Surface::from_kind(SurfaceKind::Plane(Plane::new(q0, normal)))
    }

    /// A plane through three non-collinear points.
    pub fn plane_through(p1: Point, p2: Point, p3: Point) -> Result<Surface> {
        Ok(Surface::from_kind(SurfaceKind::Plane(Plane::through(p1, p2, p3)?)))
    }

    pub fn triangle(p1: Point, p2: Point, p3: Point) -> Result<Surface> {
        Surface::polygon(vec![p1, p2, p3])
    }

    pub fn polygon(vertices: Vec<Point>) -> Result<Surface> {
        Ok(Surface::from_kind(SurfaceKind::Polygon(Polygon::new(vertices)?)))
    }

    pub fn tube(axis: Ray, radius: f64) -> Result<Surface> {
        Ok(Surface::from_kind(SurfaceKind::Tube(Tube::new(axis, radius)?)))
    }

    pub fn cylinder(axis: Ray, radius: f64, height: f64) -> Result<Surface> {
        Ok(Surface::from_kind(SurfaceKind::Cylinder(Cylinder::new(axis, radius, height)?)))
    }

    pub fn with_material(mut self, material: Material) -> Surface {
        self.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Surface {
        self.emission = emission;
        self
    }

    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    /// The axis-aligned box around the surface, if it is bounded.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Intersects a ray with this surface, keeping hits in `(0, max_distance]`.
    ///
    /// Hits are returned in no particular order.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<Hit<'_>> {
        let points = match &self.kind {
            SurfaceKind::Sphere(s) => s.intersect(ray, max_distance),
            SurfaceKind::Plane(p) => p.intersect(ray, max_distance),
            SurfaceKind::Polygon(p) => p.intersect(ray, max_distance),
            SurfaceKind::Tube(t) => t.intersect(ray, max_distance),
            SurfaceKind::Cylinder(c) => c.intersect(ray, max_distance),
        };

        points.into_iter()
            .map(|(t, point)| Hit { surface: self, point, t })
            .collect()
    }

    /// The unit normal of the surface at `point`, which is assumed to lie on
    /// the surface.
    ///
    /// Only a sphere can fail here, when asked about its own center.
    pub fn normal_at(&self, point: &Point) -> Result<Vector> {
        match &self.kind {
            SurfaceKind::Sphere(s) => s.normal_at(point),
            SurfaceKind::Plane(p) => Ok(p.normal_at(point)),
            SurfaceKind::Polygon(p) => Ok(p.normal_at(point)),
            SurfaceKind::Tube(t) => Ok(t.normal_at(point)),
            SurfaceKind::Cylinder(c) => Ok(c.normal_at(point)),
        }
    }
}

/// A ray hitting a surface.
///
/// Hits borrow the surface they land on, so they can't outlive the scene that
/// produced them.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    pub surface: &'a Surface,
    pub point: Point,
    pub t: f64,
}

/// Checks that two hits are equal.
///
/// Surfaces are compared by *pointer*: two identical spheres in a scene are
/// still different surfaces.
impl<'a> PartialEq for Hit<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.surface, other.surface) &&
            self.point == other.point &&
            crate::feq(self.t, other.t)
    }
}

/* Tests */

#[test]
fn surface_defaults() {
    let s = Surface::sphere(Point::ORIGIN, 1.0).unwrap();

    assert_eq!(s.material, Material::default());
    assert_eq!(s.emission, Color::BLACK);
    assert!(matches!(s.kind(), SurfaceKind::Sphere(_)));
}

#[test]
fn fluent_surface_setup() {
    let m = Material::new().kd(0.3).shininess(30);
    let s = Surface::plane(Point::ORIGIN, Vector::Y)
        .with_material(m)
        .with_emission(Color::rgb(0.1, 0.2, 0.3));

    assert_eq!(s.material, m);
    assert_eq!(s.emission, Color::rgb(0.1, 0.2, 0.3));
}

#[test]
fn unbounded_surfaces_have_no_box() {
    let plane = Surface::plane(Point::ORIGIN, Vector::Y);
    let tube = Surface::tube(Ray::new(Point::ORIGIN, Vector::X), 1.0).unwrap();

    assert!(plane.bounds().is_none());
    assert!(tube.bounds().is_none());

    let triangle = Surface::triangle(
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ).unwrap();
    assert!(triangle.bounds().is_some());
}

#[test]
fn hits_refer_back_to_surface() {
    let s = Surface::sphere(Point::ORIGIN, 1.0).unwrap();
    let r = Ray::new(Point::new(0.0, 0.0, -5.0), Vector::Z);
    let hits = s.intersect(&r, std::f64::INFINITY);

    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| std::ptr::eq(h.surface, &s)));

    let mut ts: Vec<f64> = hits.iter().map(|h| h.t).collect();
    ts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(ts, vec![4.0, 6.0]);
}

#[test]
fn identical_surfaces_give_distinct_hits() {
    let a = Surface::sphere(Point::ORIGIN, 1.0).unwrap();
    let b = Surface::sphere(Point::ORIGIN, 1.0).unwrap();
    let p = Point::new(0.0, 0.0, -1.0);

    assert_eq!(a, b);
    assert_ne!(Hit { surface: &a, point: p, t: 4.0 }, Hit { surface: &b, point: p, t: 4.0 });
    assert_eq!(Hit { surface: &a, point: p, t: 4.0 }, Hit { surface: &a, point: p, t: 4.0 });
}

#[test]
fn surface_normals() {
    let plane = Surface::plane(Point::ORIGIN, Vector::new(0.0, 2.0, 0.0).unwrap());
    assert_eq!(plane.normal_at(&Point::new(10.0, 0.0, -7.0)).unwrap(), Vector::Y);

    let s = Surface::sphere(Point::ORIGIN, 1.0).unwrap();
    assert_eq!(s.normal_at(&Point::new(1.0, 0.0, 0.0)).unwrap(), Vector::X);
    assert!(s.normal_at(&Point::ORIGIN).is_err());
}

#[test]
fn invalid_geometry_is_rejected() {
    assert!(Surface::sphere(Point::ORIGIN, -2.0).is_err());
    assert!(Surface::tube(Ray::new(Point::ORIGIN, Vector::X), 0.0).is_err());
    assert!(Surface::cylinder(Ray::new(Point::ORIGIN, Vector::X), 1.0, -1.0).is_err());
    assert!(Surface::polygon(vec![Point::ORIGIN]).is_err());
}
