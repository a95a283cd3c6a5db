use log::debug;

use crate::color::Color;
use crate::geometries::{ Geometries, Intersectable };
use crate::light::{ AmbientLight, Light };
use crate::ray::Ray;
use crate::shape::Hit;

/// A scene: surfaces and lights, plus the background and ambient terms.
///
/// Scenes are assembled once through a `SceneBuilder` and are read-only
/// afterwards, so a single scene can be shared by every render thread.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    name: String,
    background: Color,
    ambient: AmbientLight,
    geometries: Geometries,
    lights: Vec<Light>,
}

impl Scene {
    /// Starts building a scene with a black background, no ambient light, no
    /// surfaces and no lights.
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder {
            name: name.into(),
            background: Color::BLACK,
            ambient: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn ambient_light(&self) -> &AmbientLight {
        &self.ambient
    }

    pub fn geometries(&self) -> &Geometries {
        &self.geometries
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Every hit of `ray` within `(0, max_distance]`.
    pub fn intersections(&self, ray: &Ray, max_distance: f64, use_bounds: bool) -> Vec<Hit<'_>> {
        self.geometries.intersect(ray, max_distance, use_bounds)
    }

    /// The visible hit of `ray`, if it hits anything.
    pub fn closest_hit(&self, ray: &Ray, use_bounds: bool) -> Option<Hit<'_>> {
        self.geometries.closest_hit(ray, use_bounds)
    }
}

/// Accumulates the parts of a `Scene`.
pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient: AmbientLight,
    geometries: Geometries,
    lights: Vec<Light>,
}

impl SceneBuilder {
    pub fn background(mut self, background: Color) -> SceneBuilder {
        self.background = background;
        self
    }

    pub fn ambient_light(mut self, ambient: AmbientLight) -> SceneBuilder {
        self.ambient = ambient;
        self
    }

    /// Adds a surface or a group of surfaces.
    pub fn geometry(mut self, geometry: impl Into<Intersectable>) -> SceneBuilder {
        self.geometries.add(geometry);
        self
    }

    pub fn geometries<I, G>(mut self, geometries: I) -> SceneBuilder
        where I: IntoIterator<Item = G>, G: Into<Intersectable> {
        for g in geometries {
            self.geometries.add(g);
        }
        self
    }

    pub fn light(mut self, light: Light) -> SceneBuilder {
        self.lights.push(light);
        self
    }

    pub fn build(self) -> Scene {
        debug!("scene `{}`: {} top-level geometries, {} lights, bounded: {}",
            self.name, self.geometries.len(), self.lights.len(),
            self.geometries.bounds().is_some());

        Scene {
            name: self.name,
            background: self.background,
            ambient: self.ambient,
            geometries: self.geometries,
            lights: self.lights,
        }
    }
}

/* Tests */

#[cfg(test)]
use crate::shape::Surface;
#[cfg(test)]
use crate::tuple::{ Point, Vector };

#[test]
fn empty_scene_defaults() {
    let scene = Scene::builder("empty").build();

    assert_eq!(scene.name(), "empty");
    assert_eq!(scene.background(), Color::BLACK);
    assert_eq!(scene.ambient_light().intensity, Color::BLACK);
    assert!(scene.geometries().is_empty());
    assert!(scene.lights().is_empty());
}

#[test]
fn scene_builder_collects_parts() {
    let scene = Scene::builder("two spheres")
        .background(Color::rgb(0.1, 0.2, 0.3))
        .ambient_light(AmbientLight::new(Color::WHITE, 0.15))
        .geometry(Surface::sphere(Point::new(0.0, 0.0, -5.0), 1.0).unwrap())
        .geometries(vec![
            Surface::sphere(Point::new(0.0, 0.0, -9.0), 1.0).unwrap(),
            Surface::plane(Point::new(0.0, -1.0, 0.0), Vector::Y),
        ])
        .light(Light::point(Color::WHITE, Point::new(0.0, 10.0, 0.0)))
        .light(Light::directional(Color::WHITE, -Vector::Y))
        .build();

    assert_eq!(scene.background(), Color::rgb(0.1, 0.2, 0.3));
    assert_eq!(scene.ambient_light().intensity, Color::rgb(0.15, 0.15, 0.15));
    assert_eq!(scene.geometries().len(), 3);
    assert_eq!(scene.lights().len(), 2);

    let r = Ray::new(Point::ORIGIN, -Vector::Z);
    assert_eq!(scene.closest_hit(&r, true).unwrap().point, Point::new(0.0, 0.0, -4.0));
    assert_eq!(scene.intersections(&r, std::f64::INFINITY, true).len(), 4);
}
