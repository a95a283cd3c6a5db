use crate::bounds::BoundingBox;
use crate::consts::FEQ_EPSILON;
use crate::error::{ Result, TracerError };
use crate::ray::Ray;
use crate::tuple::{ Double3, Point, Vector, align_zero, is_zero };

/// Keeps the roots which lie ahead of the ray and within `max_distance`.
///
/// A root closer than `FEQ_EPSILON` to the origin counts as "at the origin"
/// and is dropped, so a ray leaving a surface does not hit that surface again.
fn in_range(t: f64, max_distance: f64) -> bool {
    align_zero(t) > 0.0 && align_zero(t - max_distance) <= 0.0
}

/// Pairs each admissible root with its point on the ray.
fn roots_to_hits(ray: &Ray, roots: &[f64], max_distance: f64) -> Vec<(f64, Point)> {
    roots.iter()
        .filter(|t| in_range(**t, max_distance))
        .map(|t| (*t, ray.point_at(*t)))
        .collect()
}

/// Snaps `th2 = r² − d²` to zero when it is within a relative `FEQ_EPSILON`
/// of `r2`.
///
/// The tolerance has to follow the size of the surface: an absolute one would
/// turn clear misses of a tiny sphere into tangent hits.
fn align_to_radius(th2: f64, r2: f64) -> f64 {
    if th2.abs() <= FEQ_EPSILON * r2 { 0.0 } else { th2 }
}

fn check_positive(what: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && align_zero(value) > 0.0 {
        Ok(value)
    } else {
        Err(TracerError::NonPositive { what, value })
    }
}

/// A sphere, given by its center and radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Result<Sphere> {
        Ok(Sphere { center, radius: check_positive("sphere radius", radius)? })
    }

    /// Intersects a ray with the sphere.
    ///
    /// Solved geometrically rather than through the raw quadratic: project the
    /// center onto the ray (`tm`), find the squared distance `d2` between the
    /// center and the ray, and step `th` either way from the projection. A
    /// tangent ray yields a single root; a ray starting inside the sphere
    /// yields only its exit.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<(f64, Point)> {
        let direction = ray.direction();

        // From the center, any direction leaves the sphere after one radius.
        let u = match self.center.subtract(&ray.origin()) {
            Ok(u) => u,
            Err(_) => return roots_to_hits(ray, &[self.radius], max_distance),
        };

        let tm = direction.dot(&u);
        let d2 = u.length_squared() - tm * tm;
        let r2 = self.radius * self.radius;
        let th2 = align_to_radius(r2 - d2, r2);

        if th2 < 0.0 {
            return Vec::new();
        }

        if th2 == 0.0 {
            return roots_to_hits(ray, &[tm], max_distance);
        }

        let th = th2.sqrt();
        roots_to_hits(ray, &[tm - th, tm + th], max_distance)
    }

    /// The outward normal at a point on the sphere.
    ///
    /// Fails only for the center itself, which has no outward direction.
    pub fn normal_at(&self, point: &Point) -> Result<Vector> {
        Ok(point.subtract(&self.center)?.normalize())
    }

    pub fn bounds(&self) -> BoundingBox {
        let r = Double3::splat(self.radius);
        let c = self.center.xyz();

        BoundingBox::new(Point::from(c - r), Point::from(c + r))
    }
}

/// An infinite plane through `q0` with unit normal `normal`.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane {
    pub q0: Point,
    pub normal: Vector,
}

impl Plane {
    pub fn new(q0: Point, normal: Vector) -> Plane {
        Plane { q0, normal: normal.normalize() }
    }

    /// The plane through three points.
    ///
    /// Fails when two of the points coincide or all three are collinear.
    pub fn through(p1: Point, p2: Point, p3: Point) -> Result<Plane> {
        let u = p2.subtract(&p1)?;
        let v = p3.subtract(&p1)?;
        let normal = u.cross(&v)?.normalize();

        Ok(Plane { q0: p1, normal })
    }

    /// Intersects a ray with the plane.
    ///
    /// `t = n·(q0 − p0) / n·v`. A ray parallel to the plane, or one that starts
    /// on it, never intersects it.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<(f64, Point)> {
        let p0 = ray.origin();

        let q0_p0 = match self.q0.subtract(&p0) {
            Ok(v) => v,
            Err(_) => return Vec::new(),
        };

        let nv = align_zero(self.normal.dot(&ray.direction()));
        if nv == 0.0 {
            return Vec::new();
        }

        let nqp = align_zero(self.normal.dot(&q0_p0));
        if nqp == 0.0 {
            return Vec::new();
        }

        roots_to_hits(ray, &[nqp / nv], max_distance)
    }

    pub fn normal_at(&self, _point: &Point) -> Vector {
        self.normal
    }
}

/// A flat, convex polygon.
///
/// Vertices are given in order around the boundary (either winding). A
/// triangle is a polygon with three vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
    plane: Plane,
}

impl Polygon {
    /// Builds a polygon, rejecting anything that isn't a proper convex polygon:
    /// fewer than three vertices, coincident or collinear neighbours, vertices
    /// off the plane of the first three, or a boundary that turns both ways.
    pub fn new(vertices: Vec<Point>) -> Result<Polygon> {
        let len = vertices.len();
        if len < 3 {
            return Err(TracerError::TooFewVertices(len));
        }

        // Every edge must have a direction.
        for i in 0..len {
            let j = (i + 1) % len;
            if vertices[j].subtract(&vertices[i]).is_err() {
                return Err(TracerError::DegenerateEdge(i, j));
            }
        }

        let plane = Plane::through(vertices[0], vertices[1], vertices[2])
            .map_err(|_| TracerError::DegenerateEdge(1, 2))?;
        let n = plane.normal.xyz();

        for p in vertices.iter().skip(3) {
            if !is_zero((p.xyz() - vertices[0].xyz()).dot(&n)) {
                return Err(TracerError::NonCoplanar);
            }
        }

        // Walk the boundary; every corner must turn the same way around n.
        let mut winding = 0.0;
        for i in 0..len {
            let a = vertices[i].xyz();
            let b = vertices[(i + 1) % len].xyz();
            let c = vertices[(i + 2) % len].xyz();

            let turn = align_zero((b - a).cross(&(c - b)).dot(&n));
            if turn == 0.0 {
                return Err(TracerError::DegenerateEdge((i + 1) % len, (i + 2) % len));
            }

            if winding == 0.0 {
                winding = turn.signum();
            } else if winding != turn.signum() {
                return Err(TracerError::NonConvex);
            }
        }

        Ok(Polygon { vertices, plane })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Intersects a ray with the polygon.
    ///
    /// First the supporting plane is hit, then the hit is kept only if it is
    /// inside every edge. For each edge, the triple product of the ray
    /// direction with the two vectors from the ray origin to the edge's ends
    /// tells which side of the edge the ray passes; all signs must agree. A
    /// zero triple product means the ray grazes an edge and counts as a miss.
    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<(f64, Point)> {
        let hits = self.plane.intersect(ray, max_distance);
        if hits.is_empty() {
            return hits;
        }

        let p0 = ray.origin().xyz();
        let v = ray.direction().xyz();
        let len = self.vertices.len();

        let mut positive = None;
        for i in 0..len {
            let v1 = self.vertices[i].xyz() - p0;
            let v2 = self.vertices[(i + 1) % len].xyz() - p0;

            let sign = align_zero(v.dot(&v1.cross(&v2)));
            if sign == 0.0 {
                return Vec::new();
            }

            match positive {
                None => positive = Some(sign > 0.0),
                Some(p) if p != (sign > 0.0) => return Vec::new(),
                Some(_) => (),
            }
        }

        hits
    }

    pub fn normal_at(&self, _point: &Point) -> Vector {
        self.plane.normal
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::around(self.vertices.iter())
    }
}

/// An infinite tube of radius `radius` around the axis ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Tube {
    pub axis: Ray,
    pub radius: f64,
}

impl Tube {
    pub fn new(axis: Ray, radius: f64) -> Result<Tube> {
        Ok(Tube { axis, radius: check_positive("tube radius", radius)? })
    }

    /// Offsets along the ray where it crosses the tube wall, unfiltered.
    ///
    /// Both the ray and the origin offset are projected onto the plane
    /// perpendicular to the axis; there the problem is the sphere case in two
    /// dimensions. A ray parallel to the axis has no wall crossings.
    fn wall_roots(&self, ray: &Ray) -> Vec<f64> {
        let va = self.axis.direction().xyz();
        let v = ray.direction().xyz();
        let dp = ray.origin().xyz() - self.axis.origin().xyz();

        let v_perp = v - va * v.dot(&va);
        let dp_perp = dp - va * dp.dot(&va);

        let a = v_perp.length_squared();
        if is_zero(a) {
            return Vec::new();
        }

        // Same as the sphere: `tm` is the closest approach to the axis in
        // the perpendicular plane, `d2` the squared distance there.
        let tm = -v_perp.dot(&dp_perp) / a;
        let d2 = dp_perp.length_squared() - tm * tm * a;
        let r2 = self.radius * self.radius;
        let th2 = align_to_radius(r2 - d2, r2);

        if th2 < 0.0 {
            Vec::new()
        } else if th2 == 0.0 {
            vec![tm]
        } else {
            let th = (th2 / a).sqrt();
            vec![tm - th, tm + th]
        }
    }

    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<(f64, Point)> {
        roots_to_hits(ray, &self.wall_roots(ray), max_distance)
    }

    /// Signed offset of the projection of `point` along the axis.
    fn axial_offset(&self, point: &Point) -> f64 {
        (point.xyz() - self.axis.origin().xyz()).dot(&self.axis.direction().xyz())
    }

    /// The normal points from the foot of the perpendicular on the axis to the
    /// point. A point on the axis itself gets the axis direction.
    pub fn normal_at(&self, point: &Point) -> Vector {
        let foot = self.axis.point_at(self.axial_offset(point));

        match point.subtract(&foot) {
            Ok(n) => n.normalize(),
            Err(_) => self.axis.direction(),
        }
    }
}

/// A finite, capped cylinder: the tube between the axis origin and `height`
/// along the axis, closed by two discs.
#[derive(Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub tube: Tube,
    pub height: f64,
}

impl Cylinder {
    pub fn new(axis: Ray, radius: f64, height: f64) -> Result<Cylinder> {
        Ok(Cylinder {
            tube: Tube::new(axis, radius)?,
            height: check_positive("cylinder height", height)?,
        })
    }

    pub fn bottom_center(&self) -> Point {
        self.tube.axis.origin()
    }

    pub fn top_center(&self) -> Point {
        self.tube.axis.point_at(self.height)
    }

    pub fn intersect(&self, ray: &Ray, max_distance: f64) -> Vec<(f64, Point)> {
        let mut hits: Vec<(f64, Point)> = self.tube.intersect(ray, max_distance)
            .into_iter()
            .filter(|(_, p)| {
                let s = self.tube.axial_offset(p);
                align_zero(s) > 0.0 && align_zero(s - self.height) < 0.0
            })
            .collect();

        let r2 = self.tube.radius * self.tube.radius;
        let axis = self.tube.axis.direction();

        for center in [self.bottom_center(), self.top_center()].iter() {
            let cap = Plane::new(*center, axis);
            for (t, p) in cap.intersect(ray, max_distance) {
                if p.distance_squared(center) < r2 {
                    hits.push((t, p));
                }
            }
        }

        hits.sort_by(|a, b|
            a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
        );
        hits
    }

    /// Caps face along the axis (down at the base, up at the top); the wall
    /// normal is the tube's.
    pub fn normal_at(&self, point: &Point) -> Vector {
        let s = self.tube.axial_offset(point);
        let axis = self.tube.axis.direction();

        if is_zero(s) {
            -axis
        } else if is_zero(s - self.height) {
            axis
        } else {
            self.tube.normal_at(point)
        }
    }

    /// The box around both cap discs. Along each world axis, a disc of radius
    /// `r` perpendicular to unit axis `a` reaches `r·sqrt(1 − a_i²)` from its
    /// center.
    pub fn bounds(&self) -> BoundingBox {
        let a = self.tube.axis.direction().xyz();
        let r = self.tube.radius;
        let reach = Double3::new(
            r * (1.0 - a.x * a.x).max(0.0).sqrt(),
            r * (1.0 - a.y * a.y).max(0.0).sqrt(),
            r * (1.0 - a.z * a.z).max(0.0).sqrt(),
        );

        let bottom = self.bottom_center().xyz();
        let top = self.top_center().xyz();

        BoundingBox::new(
            Point::from(bottom.min(&top) - reach),
            Point::from(bottom.max(&top) + reach),
        )
    }
}

/* Tests */

#[cfg(test)]
fn ray(o: (f64, f64, f64), d: (f64, f64, f64)) -> Ray {
    Ray::new(Point::new(o.0, o.1, o.2), Vector::new(d.0, d.1, d.2).unwrap())
}

#[cfg(test)]
fn ts(hits: &[(f64, Point)]) -> Vec<f64> {
    hits.iter().map(|(t, _)| *t).collect()
}

#[test]
fn ray_pierces_sphere() {
    for r in [0.5, 1.0, 3.0].iter() {
        let s = Sphere::new(Point::ORIGIN, *r).unwrap();
        let xs = s.intersect(&ray((0.0, 0.0, -2.0 * r), (0.0, 0.0, 1.0)),
            std::f64::INFINITY);

        assert_eq!(xs.len(), 2);
        assert!(crate::feq(xs[0].0, *r));
        assert!(crate::feq(xs[1].0, 3.0 * r));

        // The normals at entry and exit point straight out.
        assert_eq!(s.normal_at(&xs[0].1).unwrap(), -Vector::Z);
        assert_eq!(s.normal_at(&xs[1].1).unwrap(), Vector::Z);
    }
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Sphere::new(Point::ORIGIN, 1.0).unwrap();
    let xs = s.intersect(&ray((0.0, 1.0, -5.0), (0.0, 0.0, 1.0)), std::f64::INFINITY);

    assert_eq!(ts(&xs), vec![5.0]);
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::new(Point::ORIGIN, 1.0).unwrap();
    let xs = s.intersect(&ray((0.0, 2.0, -5.0), (0.0, 0.0, 1.0)), std::f64::INFINITY);

    assert!(xs.is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let s = Sphere::new(Point::ORIGIN, 1.0).unwrap();
    let xs = s.intersect(&ray((0.0, 0.0, 0.5), (0.0, 0.0, 1.0)), std::f64::INFINITY);

    assert_eq!(ts(&xs), vec![0.5]);
}

#[test]
fn ray_starts_at_sphere_center() {
    let s = Sphere::new(Point::new(1.0, 1.0, 1.0), 2.0).unwrap();
    let xs = s.intersect(&ray((1.0, 1.0, 1.0), (0.0, 3.0, 0.0)), std::f64::INFINITY);

    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].1, Point::new(1.0, 3.0, 1.0));
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::new(Point::ORIGIN, 1.0).unwrap();
    let xs = s.intersect(&ray((0.0, 0.0, 5.0), (0.0, 0.0, 1.0)), std::f64::INFINITY);

    assert!(xs.is_empty());
}

#[test]
fn sphere_roots_beyond_max_distance_are_dropped() {
    let s = Sphere::new(Point::ORIGIN, 1.0).unwrap();
    let r = ray((0.0, 0.0, -5.0), (0.0, 0.0, 1.0));

    assert_eq!(ts(&s.intersect(&r, 5.0)), vec![4.0]);
    assert!(s.intersect(&r, 3.0).is_empty());
}

#[test]
fn sphere_rejects_bad_radius() {
    assert!(Sphere::new(Point::ORIGIN, 0.0).is_err());
    assert!(Sphere::new(Point::ORIGIN, -1.0).is_err());
    assert!(Sphere::new(Point::ORIGIN, std::f64::NAN).is_err());
}

#[test]
fn sphere_normal_at_center_fails() {
    let s = Sphere::new(Point::new(0.0, 1.0, 0.0), 1.0).unwrap();

    assert!(s.normal_at(&Point::new(0.0, 1.0, 0.0)).is_err());

    let k = 3.0f64.sqrt() / 3.0;
    assert_eq!(s.normal_at(&Point::new(k, 1.0 + k, k)).unwrap(),
        Vector::new(k, k, k).unwrap());
}

#[test]
fn plane_through_three_points() {
    let p = Plane::through(
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
    ).unwrap();

    assert_eq!(p.normal, Vector::Z);
    assert!(crate::feq(p.normal.length(), 1.0));
}

#[test]
fn plane_through_degenerate_points_fails() {
    let a = Point::new(1.0, 2.0, 3.0);

    assert!(Plane::through(a, a, Point::new(0.0, 0.0, 0.0)).is_err());
    assert!(Plane::through(
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 1.0, 1.0),
        Point::new(2.0, 2.0, 2.0),
    ).is_err());
}

#[test]
fn ray_intersecting_plane_from_above_and_below() {
    let p = Plane::new(Point::ORIGIN, Vector::Y);

    let above = p.intersect(&ray((0.0, 1.0, 0.0), (0.0, -1.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&above), vec![1.0]);

    let below = p.intersect(&ray((0.0, -1.0, 0.0), (0.0, 1.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&below), vec![1.0]);

    let oblique = p.intersect(&ray((0.0, 2.0, -1.0), (0.0, -1.0, 1.0)), std::f64::INFINITY);
    assert_eq!(oblique.len(), 1);
    assert_eq!(oblique[0].1, Point::new(0.0, 0.0, 1.0));
}

#[test]
fn ray_parallel_to_or_away_from_plane() {
    let p = Plane::new(Point::ORIGIN, Vector::Y);

    // Parallel, above the plane
    assert!(p.intersect(&ray((0.0, 10.0, 0.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    // Parallel, inside the plane
    assert!(p.intersect(&ray((3.0, 0.0, 0.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    // Pointing away
    assert!(p.intersect(&ray((0.0, 1.0, 0.0), (0.0, 1.0, 1.0)), std::f64::INFINITY).is_empty());
}

#[test]
fn ray_from_plane_reference_point_never_hits() {
    let p = Plane::new(Point::new(1.0, 2.0, 3.0), Vector::new(1.0, 1.0, 0.0).unwrap());
    let directions = [
        (0.0, 1.0, 0.0), (1.0, 1.0, 0.0), (-1.0, -1.0, 0.0),
        (0.3, -0.7, 2.0), (0.0, 0.0, 1.0),
    ];

    for d in directions.iter() {
        assert!(p.intersect(&ray((1.0, 2.0, 3.0), *d), std::f64::INFINITY).is_empty());
    }
}

#[test]
fn ray_from_plane_surface_never_hits() {
    let p = Plane::new(Point::ORIGIN, Vector::Y);

    assert!(p.intersect(&ray((5.0, 0.0, 1.0), (0.0, 1.0, 1.0)), std::f64::INFINITY).is_empty());
}

#[cfg(test)]
fn equilateral() -> Polygon {
    let h = 3.0f64.sqrt() / 2.0;
    Polygon::new(vec![
        Point::new(-1.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 2.0 * h, 0.0),
    ]).unwrap()
}

#[test]
fn ray_through_triangle_centroid() {
    let t = equilateral();
    let centroid = 3.0f64.sqrt() / 3.0;

    let front = t.intersect(&ray((0.0, centroid, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY);
    assert_eq!(front.len(), 1);
    assert_eq!(front[0].1, Point::new(0.0, centroid, 0.0));

    let back = t.intersect(&ray((0.0, centroid, 3.0), (0.0, 0.0, -1.0)), std::f64::INFINITY);
    assert_eq!(back.len(), 1);
}

#[test]
fn ray_outside_triangle_edges() {
    let t = equilateral();

    // Beyond each of the three edges
    assert!(t.intersect(&ray((0.0, -1.0, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    assert!(t.intersect(&ray((1.0, 1.5, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    assert!(t.intersect(&ray((-1.0, 1.5, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    // Beyond a vertex
    assert!(t.intersect(&ray((-2.0, -0.5, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
}

#[test]
fn ray_through_triangle_edge_or_vertex_misses() {
    let t = equilateral();

    assert!(t.intersect(&ray((0.0, 0.0, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    assert!(t.intersect(&ray((1.0, 0.0, -3.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
}

#[test]
fn ray_through_quad() {
    let quad = Polygon::new(vec![
        Point::new(0.0, 0.0, 1.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(-1.0, 1.0, 1.0),
    ]).unwrap();

    let n = quad.normal_at(&Point::ORIGIN);
    let k = 3.0f64.sqrt() / 3.0;
    assert!(n == Vector::new(k, k, k).unwrap() || n == Vector::new(-k, -k, -k).unwrap());

    let xs = quad.intersect(&ray((0.0, 0.0, -1.0), (0.25, 0.5, 1.25)), std::f64::INFINITY);
    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].1, Point::new(0.25, 0.5, 0.25));
}

#[test]
fn polygon_validation() {
    assert!(matches!(
        Polygon::new(vec![Point::ORIGIN, Point::new(1.0, 0.0, 0.0)]),
        Err(TracerError::TooFewVertices(2))
    ));

    // Wrong vertex order
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(-1.0, 1.0, 1.0),
        ]),
        Err(TracerError::NonConvex)
    ));

    // Last point not in the plane
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(-1.0, 1.0, 2.0),
        ]),
        Err(TracerError::NonCoplanar)
    ));

    // Repeated vertex
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
        ]),
        Err(TracerError::DegenerateEdge(1, 2))
    ));

    // Vertex on an edge
    assert!(matches!(
        Polygon::new(vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.5, 0.5),
        ]),
        Err(TracerError::DegenerateEdge(_, _))
    ));

    // Collinear triangle
    assert!(Polygon::new(vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 1.0, 1.0),
        Point::new(2.0, 2.0, 2.0),
    ]).is_err());
}

#[test]
fn polygon_bounds() {
    let b = equilateral().bounds().unwrap();

    assert_eq!(b.minimum, Point::new(-1.0, 0.0, 0.0));
    assert_eq!(b.maximum, Point::new(1.0, 3.0f64.sqrt(), 0.0));
}

#[cfg(test)]
fn z_tube() -> Tube {
    Tube::new(Ray::new(Point::new(0.0, 0.0, -1.0), Vector::Z), 1.0).unwrap()
}

#[test]
fn tube_normal() {
    let tube = z_tube();

    assert_eq!(tube.normal_at(&Point::new(1.0, 0.0, 0.0)), Vector::X);
    assert_eq!(tube.normal_at(&Point::new(1.0, 0.0, 1.0)), Vector::X);
    // Level with the axis origin
    assert_eq!(tube.normal_at(&Point::new(0.0, -1.0, -1.0)), -Vector::Y);
    // On the axis
    assert_eq!(tube.normal_at(&Point::new(0.0, 0.0, 4.0)), Vector::Z);
}

#[test]
fn ray_crosses_tube() {
    let tube = z_tube();

    let across = tube.intersect(&ray((-3.0, 0.0, 5.0), (1.0, 0.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&across), vec![2.0, 4.0]);

    let inside = tube.intersect(&ray((0.0, 0.0, 0.0), (0.0, 1.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&inside), vec![1.0]);

    let tangent = tube.intersect(&ray((-3.0, 1.0, 0.0), (1.0, 0.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&tangent), vec![3.0]);
}

#[test]
fn ray_misses_tube() {
    let tube = z_tube();

    // Parallel to the axis, inside and outside
    assert!(tube.intersect(&ray((0.5, 0.0, 0.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
    assert!(tube.intersect(&ray((2.0, 0.0, 0.0), (0.0, 0.0, -1.0)), std::f64::INFINITY).is_empty());
    // Passing by
    assert!(tube.intersect(&ray((-3.0, 2.0, 0.0), (1.0, 0.0, 0.3)), std::f64::INFINITY).is_empty());

    // Just beside a very thin tube
    let thin = Tube::new(Ray::new(Point::ORIGIN, Vector::Z), 1e-5).unwrap();
    assert!(thin.intersect(&ray((-3.0, 1.3e-5, 0.0), (1.0, 0.0, 0.0)), std::f64::INFINITY).is_empty());
    assert_eq!(thin.intersect(&ray((-3.0, 0.5e-5, 0.0), (1.0, 0.0, 0.0)), std::f64::INFINITY).len(), 2);
}

#[cfg(test)]
fn z_cylinder() -> Cylinder {
    Cylinder::new(Ray::new(Point::ORIGIN, Vector::Z), 1.0, 2.0).unwrap()
}

#[test]
fn ray_hits_cylinder_wall_and_caps() {
    let c = z_cylinder();

    // Through the wall, between the caps
    let wall = c.intersect(&ray((-3.0, 0.0, 1.0), (1.0, 0.0, 0.0)), std::f64::INFINITY);
    assert_eq!(ts(&wall), vec![2.0, 4.0]);

    // Down the middle, through both caps
    let caps = c.intersect(&ray((0.0, 0.5, -2.0), (0.0, 0.0, 1.0)), std::f64::INFINITY);
    assert_eq!(ts(&caps), vec![2.0, 4.0]);

    // In through the top cap, out through the wall
    let mixed = c.intersect(&ray((0.0, 0.0, 3.0), (1.0, 0.0, -2.0)), std::f64::INFINITY);
    assert_eq!(mixed.len(), 2);
    assert_eq!(mixed[0].1, Point::new(0.5, 0.0, 2.0));
    assert_eq!(mixed[1].1, Point::new(1.0, 0.0, 1.0));
}

#[test]
fn ray_misses_finite_cylinder() {
    let c = z_cylinder();

    // Above the top cap
    assert!(c.intersect(&ray((-3.0, 0.0, 3.0), (1.0, 0.0, 0.0)), std::f64::INFINITY).is_empty());
    // Below the bottom cap
    assert!(c.intersect(&ray((-3.0, 0.0, -1.0), (1.0, 0.0, 0.0)), std::f64::INFINITY).is_empty());
    // Parallel to the axis, outside the caps' discs
    assert!(c.intersect(&ray((1.5, 0.0, -1.0), (0.0, 0.0, 1.0)), std::f64::INFINITY).is_empty());
}

#[test]
fn cylinder_normals() {
    let c = z_cylinder();

    assert_eq!(c.normal_at(&Point::new(0.0, 0.0, 0.0)), -Vector::Z);
    assert_eq!(c.normal_at(&Point::new(0.5, 0.0, 0.0)), -Vector::Z);
    assert_eq!(c.normal_at(&Point::new(0.0, 0.0, 2.0)), Vector::Z);
    assert_eq!(c.normal_at(&Point::new(0.0, 0.5, 2.0)), Vector::Z);
    assert_eq!(c.normal_at(&Point::new(0.0, -1.0, 1.0)), -Vector::Y);
}

#[test]
fn cylinder_bounds() {
    let c = z_cylinder();
    let b = c.bounds();

    assert_eq!(b.minimum, Point::new(-1.0, -1.0, 0.0));
    assert_eq!(b.maximum, Point::new(1.0, 1.0, 2.0));

    assert!(Cylinder::new(Ray::new(Point::ORIGIN, Vector::Z), 1.0, 0.0).is_err());
}
