use crate::bounds::BoundingBox;
use crate::ray::Ray;
use crate::shape::{ Surface, Hit };

/// Anything that can be put in a scene: a single surface or a nested group.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersectable {
    Surface(Surface),
    Group(Geometries),
}

impl From<Surface> for Intersectable {
    fn from(surface: Surface) -> Intersectable {
        Intersectable::Surface(surface)
    }
}

impl From<Geometries> for Intersectable {
    fn from(group: Geometries) -> Intersectable {
        Intersectable::Group(group)
    }
}

impl Intersectable {
    pub fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Intersectable::Surface(s) => s.bounds(),
            Intersectable::Group(g) => g.bounds(),
        }
    }

    fn intersect(&self, ray: &Ray, max_distance: f64, use_bounds: bool) -> Vec<Hit<'_>> {
        match self {
            Intersectable::Surface(s) => {
                if use_bounds {
                    if let Some(b) = s.bounds() {
                        if !b.intersects(ray, max_distance) {
                            return Vec::new();
                        }
                    }
                }

                s.intersect(ray, max_distance)
            },
            Intersectable::Group(g) => g.intersect(ray, max_distance, use_bounds),
        }
    }
}

/// A composite of surfaces and nested groups, intersected as one.
///
/// Every group keeps the box around all of its children. If any child is
/// unbounded, so is the group. With bounding boxes enabled, a ray that misses
/// a group's box skips the whole subtree; disabling them must never change
/// which hits are reported, only how much work it takes.
///
/// # Examples
///
/// ```
/// # use pinhole_tracer::geometries::Geometries;
/// # use pinhole_tracer::shape::Surface;
/// # use pinhole_tracer::ray::Ray;
/// # use pinhole_tracer::tuple::{ Point, Vector };
/// let mut group = Geometries::new();
/// group.add(Surface::sphere(Point::new(0.0, 0.0, -10.0), 1.0).unwrap());
/// group.add(Surface::sphere(Point::new(0.0, 0.0, -20.0), 1.0).unwrap());
///
/// let ray = Ray::new(Point::ORIGIN, -Vector::Z);
/// assert_eq!(group.intersect(&ray, std::f64::INFINITY, true).len(), 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometries {
    children: Vec<Intersectable>,
    bounds: Option<BoundingBox>,
}

impl Geometries {
    pub fn new() -> Geometries {
        Default::default()
    }

    /// Adds a child, widening the group's box to hold it.
    pub fn add(&mut self, child: impl Into<Intersectable>) {
        let child = child.into();

        self.bounds = if self.children.is_empty() {
            child.bounds()
        } else {
            match (self.bounds, child.bounds()) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                _ => None,
            }
        };

        self.children.push(child);
    }

    /// Builder-style variant of `add`.
    pub fn with(mut self, child: impl Into<Intersectable>) -> Geometries {
        self.add(child);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Intersectable] {
        &self.children
    }

    /// The box around all children; `None` if empty or any child is unbounded.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Collects every hit within `(0, max_distance]`, in no particular order.
    pub fn intersect(&self, ray: &Ray, max_distance: f64, use_bounds: bool) -> Vec<Hit<'_>> {
        if use_bounds {
            if let Some(b) = self.bounds {
                if !b.intersects(ray, max_distance) {
                    return Vec::new();
                }
            }
        }

        self.children.iter()
            .flat_map(|child| child.intersect(ray, max_distance, use_bounds))
            .collect()
    }

    /// The hit nearest the ray origin, if any.
    pub fn closest_hit(&self, ray: &Ray, use_bounds: bool) -> Option<Hit<'_>> {
        ray.closest_hit(&self.intersect(ray, std::f64::INFINITY, use_bounds))
    }
}

/* Tests */

#[cfg(test)]
use crate::tuple::{ Point, Vector };

#[cfg(test)]
fn sample_scene() -> Geometries {
    let mut inner = Geometries::new();
    inner.add(Surface::sphere(Point::new(3.0, 0.0, -10.0), 1.0).unwrap());
    inner.add(Surface::triangle(
        Point::new(-4.0, -1.0, -12.0),
        Point::new(-2.0, -1.0, -12.0),
        Point::new(-3.0, 1.0, -12.0),
    ).unwrap());

    let mut far = Geometries::new();
    far.add(Surface::cylinder(
        Ray::new(Point::new(0.0, -2.0, -30.0), Vector::Y), 1.5, 4.0).unwrap());
    far.add(Surface::sphere(Point::new(0.0, 5.0, -30.0), 0.5).unwrap());

    Geometries::new()
        .with(inner)
        .with(far)
        .with(Surface::sphere(Point::new(0.0, 0.0, -5.0), 0.75).unwrap())
}

#[test]
fn empty_group_has_no_hits() {
    let g = Geometries::new();
    let r = Ray::new(Point::ORIGIN, Vector::Z);

    assert!(g.is_empty());
    assert!(g.bounds().is_none());
    assert!(g.intersect(&r, std::f64::INFINITY, true).is_empty());
    assert!(g.closest_hit(&r, false).is_none());
}

#[test]
fn group_box_covers_children() {
    let g = sample_scene();
    let b = g.bounds().unwrap();

    assert_eq!(g.len(), 3);
    assert_eq!(b.minimum, Point::new(-4.0, -2.0, -31.5));
    assert_eq!(b.maximum, Point::new(4.0, 5.5, -4.25));
}

#[test]
fn unbounded_child_unbounds_group() {
    let mut g = Geometries::new();
    g.add(Surface::sphere(Point::ORIGIN, 1.0).unwrap());
    assert!(g.bounds().is_some());

    g.add(Surface::plane(Point::new(0.0, -1.0, 0.0), Vector::Y));
    assert!(g.bounds().is_none());

    g.add(Surface::sphere(Point::new(5.0, 0.0, 0.0), 1.0).unwrap());
    assert!(g.bounds().is_none());
}

#[test]
fn closest_hit_across_children() {
    let g = sample_scene();
    let r = Ray::new(Point::ORIGIN, -Vector::Z);

    let hit = g.closest_hit(&r, true).unwrap();
    assert_eq!(hit.point, Point::new(0.0, 0.0, -4.25));

    // Through the near sphere and the far cylinder's wall, twice each.
    assert_eq!(g.intersect(&r, std::f64::INFINITY, true).len(), 4);
    assert_eq!(g.intersect(&r, 10.0, true).len(), 2);
}

#[test]
fn bounding_boxes_never_change_hits() {
    let g = sample_scene();
    let origins = [
        Point::ORIGIN,
        Point::new(0.0, 0.0, 10.0),
        Point::new(5.0, 5.0, 5.0),
        Point::new(-3.0, 0.0, 0.0),
        Point::new(0.0, 20.0, -30.0),
    ];
    let targets = [
        Point::new(3.0, 0.0, -10.0),
        Point::new(-3.0, 0.0, -12.0),
        Point::new(0.0, 0.0, -30.0),
        Point::new(0.0, 5.0, -30.0),
        Point::new(1.4, 1.9, -29.0),
        Point::new(10.0, 10.0, 10.0),
        Point::new(0.9, 0.9, -5.0),
    ];

    for o in origins.iter() {
        for t in targets.iter() {
            let direction = match t.subtract(o) {
                Ok(d) => d,
                Err(_) => continue,
            };
            let r = Ray::new(*o, direction);

            for max in [5.0, 25.0, std::f64::INFINITY].iter() {
                let mut with: Vec<f64> = g.intersect(&r, *max, true).iter().map(|h| h.t).collect();
                let mut without: Vec<f64> = g.intersect(&r, *max, false).iter().map(|h| h.t).collect();
                with.sort_by(|a, b| a.partial_cmp(b).unwrap());
                without.sort_by(|a, b| a.partial_cmp(b).unwrap());

                assert_eq!(with, without);
            }
        }
    }

    // A tiny sphere, with rays through it and rays passing just beside it.
    let tiny = Geometries::new()
        .with(Surface::sphere(Point::new(0.0, 0.0, -10.0), 1e-5).unwrap());

    for (offset, expected) in [(0.0, 2), (0.5e-5, 2), (1.3e-5, 0), (3e-5, 0)].iter() {
        let direction = Point::new(*offset, 0.0, -10.0).subtract(&Point::ORIGIN).unwrap();
        let r = Ray::new(Point::ORIGIN, direction);

        let with = tiny.intersect(&r, std::f64::INFINITY, true).len();
        let without = tiny.intersect(&r, std::f64::INFINITY, false).len();

        assert_eq!(with, without);
        assert_eq!(with, *expected);
    }
}
