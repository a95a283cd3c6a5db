use log::{ debug, warn };

use crate::color::Color;
use crate::config::RenderConfig;
use crate::consts::{ INITIAL_K, MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K };
use crate::error::Result;
use crate::light::Light;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shape::Hit;
use crate::tuple::{ Double3, Point, Vector, align_zero };

/// Turns a ray into a color.
///
/// Tracers are shared between render threads, hence `Send + Sync`.
pub trait RayTracer: Send + Sync {
    /// The color seen along `ray`.
    fn trace_ray(&self, ray: &Ray) -> Color;

    /// The color used when a ray hits nothing, or when shading fails.
    fn background(&self) -> Color;

    /// Takes over the tracing settings of `config`: ray tree depth,
    /// contribution cut-off and bounding-box pruning.
    ///
    /// Tracers without such settings keep the default, which does nothing.
    fn configure(&mut self, _config: &RenderConfig) {}
}

/// A Whitted-style recursive ray tracer.
///
/// At each hit the color is the surface's emission, plus Phong diffuse and
/// specular terms for every light that isn't shadowed, plus (while the ray
/// tree is shallow enough and still carries enough weight) the colors seen
/// along the mirror-reflected and the transmitted rays. The scene's ambient
/// term is added once, at the primary hit.
pub struct SimpleRayTracer<'a> {
    scene: &'a Scene,
    max_level: usize,
    min_k: f64,
    use_bounds: bool,
}

impl<'a> SimpleRayTracer<'a> {
    pub fn new(scene: &'a Scene) -> SimpleRayTracer<'a> {
        SimpleRayTracer {
            scene,
            max_level: MAX_CALC_COLOR_LEVEL,
            min_k: MIN_CALC_COLOR_K,
            use_bounds: true,
        }
    }

    pub fn from_config(scene: &'a Scene, config: &RenderConfig) -> SimpleRayTracer<'a> {
        let mut tracer = SimpleRayTracer::new(scene);
        tracer.configure(config);
        tracer
    }

    /// Sets the depth of the ray tree; 1 means primary rays only.
    pub fn with_max_level(mut self, max_level: usize) -> SimpleRayTracer<'a> {
        self.set_max_level(max_level);
        self
    }

    fn set_max_level(&mut self, max_level: usize) {
        if max_level == 0 {
            warn!("ray tree depth of 0 would trace nothing; using 1");
        }

        self.max_level = max_level.max(1);
    }

    pub fn with_min_contribution(mut self, min_k: f64) -> SimpleRayTracer<'a> {
        self.min_k = min_k;
        self
    }

    pub fn with_bounding_boxes(mut self, enabled: bool) -> SimpleRayTracer<'a> {
        self.use_bounds = enabled;
        self
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Shades a primary hit.
    fn calc_color(&self, hit: &Hit, ray: &Ray) -> Result<Color> {
        let color = self.calc_color_rec(hit, ray, self.max_level, Double3::splat(INITIAL_K))?;
        Ok(color + self.scene.ambient_light().intensity)
    }

    fn calc_color_rec(&self, hit: &Hit, ray: &Ray, level: usize, k: Double3) -> Result<Color> {
        let n = hit.surface.normal_at(&hit.point)?;
        let v = ray.direction();

        // Grazing hits see nothing of the surface.
        if align_zero(n.dot(&v)) == 0.0 {
            return Ok(hit.surface.emission);
        }

        let color = hit.surface.emission + self.calc_local_effects(hit, &n, &v);

        if level == 1 {
            Ok(color)
        } else {
            Ok(color + self.calc_global_effects(hit, &n, &v, level, k)?)
        }
    }

    /// Phong diffuse and specular terms, summed over every light that reaches
    /// the hit point from the side the viewer is on.
    fn calc_local_effects(&self, hit: &Hit, n: &Vector, v: &Vector) -> Color {
        let material = &hit.surface.material;
        let nv = align_zero(n.dot(v));

        let mut color = Color::BLACK;
        for light in self.scene.lights() {
            let l = match light.direction_at(&hit.point) {
                Some(l) => l,
                None => continue,
            };

            let nl = align_zero(n.dot(&l));
            if nl * nv <= 0.0 || !self.unshaded(&hit.point, n, &l, light) {
                continue;
            }

            let intensity = light.intensity_at(&hit.point);
            let diffuse = intensity.scale(&(material.kd * nl.abs()));
            let specular = Self::calc_specular(&material.ks, material.shininess, &l, n, v, intensity);

            color = color + diffuse + specular;
        }

        color
    }

    fn calc_specular(ks: &Double3, shininess: i32, l: &Vector, n: &Vector, v: &Vector,
        intensity: Color) -> Color {
        let r = l.reflect(n);
        let minus_vr = -align_zero(r.dot(v));

        if minus_vr <= 0.0 {
            Color::BLACK
        } else {
            intensity.scale(&(*ks * minus_vr.powi(shininess)))
        }
    }

    /// Checks that nothing sits between `point` and the light.
    ///
    /// The shadow ray leaves from just off the surface, on the light's side,
    /// and only hits strictly closer than the light count as blockers.
    fn unshaded(&self, point: &Point, n: &Vector, l: &Vector, light: &Light) -> bool {
        let shadow_ray = Ray::offset(*point, n, -*l);
        let light_distance = light.distance_to(point);

        !self.scene
            .intersections(&shadow_ray, light_distance, self.use_bounds)
            .iter()
            .any(|h| h.point.distance(point) < light_distance)
    }

    fn calc_global_effects(&self, hit: &Hit, n: &Vector, v: &Vector, level: usize, k: Double3)
        -> Result<Color> {
        let material = &hit.surface.material;

        let reflected = Ray::offset(hit.point, n, v.reflect(n));
        let refracted = Ray::offset(hit.point, n, *v);

        Ok(self.calc_global_effect(&reflected, level, &k, &material.kr)? +
            self.calc_global_effect(&refracted, level, &k, &material.kt)?)
    }

    /// The color along a secondary ray, weighted by `kx`.
    ///
    /// Not cast at all once the accumulated weight `k·kx` becomes negligible.
    /// A secondary ray that escapes the scene contributes nothing.
    fn calc_global_effect(&self, ray: &Ray, level: usize, k: &Double3, kx: &Double3)
        -> Result<Color> {
        let kkx = k.product(kx);
        if kkx.lower_than(self.min_k) {
            return Ok(Color::BLACK);
        }

        match self.scene.closest_hit(ray, self.use_bounds) {
            None => Ok(Color::BLACK),
            Some(hit) => Ok(self.calc_color_rec(&hit, ray, level - 1, kkx)?.scale(kx)),
        }
    }
}

impl<'a> RayTracer for SimpleRayTracer<'a> {
    fn trace_ray(&self, ray: &Ray) -> Color {
        let hit = match self.scene.closest_hit(ray, self.use_bounds) {
            Some(hit) => hit,
            None => return self.scene.background(),
        };

        match self.calc_color(&hit, ray) {
            Ok(color) => color,
            Err(e) => {
                debug!("shading failed at {:?}: {}", hit.point, e);
                self.scene.background()
            },
        }
    }

    fn background(&self) -> Color {
        self.scene.background()
    }

    fn configure(&mut self, config: &RenderConfig) {
        self.set_max_level(config.max_depth);
        self.min_k = config.min_contribution;
        self.use_bounds = config.bounding_boxes;
    }
}

/* Tests */

#[cfg(test)]
use crate::light::AmbientLight;
#[cfg(test)]
use crate::material::Material;
#[cfg(test)]
use crate::shape::Surface;

#[cfg(test)]
fn lit_floor(occluded: bool) -> Scene {
    let floor = Surface::plane(Point::ORIGIN, Vector::Y)
        .with_material(Material::new().kd(1.0));

    let mut builder = Scene::builder("floor")
        .geometry(floor)
        .light(Light::point(Color::WHITE, Point::new(0.0, 10.0, 0.0)));

    if occluded {
        builder = builder.geometry(Surface::plane(Point::new(0.0, 5.0, 0.0), Vector::Y));
    }

    builder.build()
}

#[test]
fn ray_missing_everything_sees_background() {
    let scene = Scene::builder("empty").background(Color::rgb(0.2, 0.3, 0.4)).build();
    let tracer = SimpleRayTracer::new(&scene);

    assert_eq!(tracer.trace_ray(&Ray::new(Point::ORIGIN, Vector::Z)), Color::rgb(0.2, 0.3, 0.4));
    assert_eq!(tracer.background(), Color::rgb(0.2, 0.3, 0.4));
}

#[test]
fn unlit_surface_shows_emission_and_ambient() {
    let scene = Scene::builder("glow")
        .ambient_light(AmbientLight::new(Color::WHITE, 0.1))
        .geometry(Surface::sphere(Point::new(0.0, 0.0, -5.0), 1.0).unwrap()
            .with_emission(Color::rgb(0.5, 0.0, 0.0)))
        .build();
    let tracer = SimpleRayTracer::new(&scene);

    let color = tracer.trace_ray(&Ray::new(Point::ORIGIN, -Vector::Z));
    assert_eq!(color, Color::rgb(0.6, 0.1, 0.1));
}

#[test]
fn diffuse_light_on_floor() {
    let scene = lit_floor(false);
    let tracer = SimpleRayTracer::new(&scene);

    let ray = Ray::new(Point::new(0.0, 1.0, -1.0), Vector::new(0.0, -1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&ray), Color::WHITE);
}

#[test]
fn occluder_casts_shadow() {
    let ray = Ray::new(Point::new(0.0, 1.0, -1.0), Vector::new(0.0, -1.0, 1.0).unwrap());

    let shadowed = lit_floor(true);
    assert_eq!(SimpleRayTracer::new(&shadowed).trace_ray(&ray), Color::BLACK);
    assert_eq!(SimpleRayTracer::new(&shadowed).with_bounding_boxes(false).trace_ray(&ray),
        Color::BLACK);

    let lit = lit_floor(false);
    assert!(SimpleRayTracer::new(&lit).trace_ray(&ray).luminance() > 0.0);
}

#[test]
fn light_behind_surface_contributes_nothing() {
    let scene = lit_floor(false);
    let tracer = SimpleRayTracer::new(&scene);

    // Looking at the floor from below, the light is on the other side.
    let ray = Ray::new(Point::new(0.0, -1.0, -1.0), Vector::new(0.0, 1.0, 1.0).unwrap());
    assert_eq!(tracer.trace_ray(&ray), Color::BLACK);
}

#[test]
fn specular_highlight_along_mirror_direction() {
    let floor = Surface::plane(Point::ORIGIN, Vector::Y)
        .with_material(Material::new().ks(1.0).shininess(1));
    let scene = Scene::builder("shiny")
        .geometry(floor)
        .light(Light::directional(Color::WHITE, Vector::new(0.0, -1.0, 1.0).unwrap()))
        .build();
    let tracer = SimpleRayTracer::new(&scene);

    let head_on = Ray::new(Point::new(0.0, 1.0, 1.0), Vector::new(0.0, -1.0, -1.0).unwrap());
    assert_eq!(tracer.trace_ray(&head_on), Color::WHITE);

    // Looking straight down, half way off the mirror direction: cos 45°.
    let above = Ray::new(Point::new(0.0, 1.0, 0.0), -Vector::Y);
    assert_eq!(tracer.trace_ray(&above), Color::WHITE * (2.0f64.sqrt() / 2.0));
}

#[cfg(test)]
fn mirror_scene(kr: f64) -> Scene {
    let mirror = Surface::plane(Point::new(0.0, 0.0, -5.0), Vector::Z)
        .with_material(Material::new().kr(kr));
    let ball = Surface::sphere(Point::new(0.0, 0.0, 5.0), 1.0).unwrap()
        .with_emission(Color::rgb(1.0, 0.0, 0.0));

    Scene::builder("mirror").geometry(mirror).geometry(ball).build()
}

#[test]
fn mirror_reflects_what_is_behind_the_viewer() {
    let scene = mirror_scene(1.0);
    let ray = Ray::new(Point::ORIGIN, -Vector::Z);

    assert_eq!(SimpleRayTracer::new(&scene).trace_ray(&ray), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(SimpleRayTracer::new(&scene).with_max_level(1).trace_ray(&ray), Color::BLACK);

    let dim = mirror_scene(0.5);
    assert_eq!(SimpleRayTracer::new(&dim).trace_ray(&ray), Color::rgb(0.5, 0.0, 0.0));
}

#[test]
fn transparent_surface_shows_what_lies_beyond() {
    let pane = Surface::polygon(vec![
        Point::new(-1.0, -1.0, -5.0),
        Point::new(1.0, -1.0, -5.0),
        Point::new(1.0, 1.0, -5.0),
        Point::new(-1.0, 1.0, -5.0),
    ]).unwrap().with_material(Material::new().kt(0.5));
    let ball = Surface::sphere(Point::new(0.0, 0.0, -10.0), 1.0).unwrap()
        .with_emission(Color::rgb(0.0, 0.0, 1.0));
    let scene = Scene::builder("window").geometry(pane).geometry(ball).build();
    let ray = Ray::new(Point::ORIGIN, -Vector::Z);

    assert_eq!(SimpleRayTracer::new(&scene).trace_ray(&ray), Color::rgb(0.0, 0.0, 0.5));

    // Below the cut-off, the transmitted ray is never cast.
    let cut = SimpleRayTracer::new(&scene).with_min_contribution(0.6);
    assert_eq!(cut.trace_ray(&ray), Color::BLACK);
}

#[test]
fn escaping_secondary_ray_adds_nothing() {
    let mirror = Surface::plane(Point::new(0.0, 0.0, -5.0), Vector::Z)
        .with_material(Material::new().kr(1.0));
    let scene = Scene::builder("lonely mirror")
        .background(Color::WHITE)
        .geometry(mirror)
        .build();

    let color = SimpleRayTracer::new(&scene).trace_ray(&Ray::new(Point::ORIGIN, -Vector::Z));
    assert_eq!(color, Color::BLACK);
}

#[test]
fn tracer_follows_config() {
    let scene = mirror_scene(1.0);
    let config = RenderConfig::default().with_max_depth(1);
    let ray = Ray::new(Point::ORIGIN, -Vector::Z);

    assert_eq!(SimpleRayTracer::from_config(&scene, &config).trace_ray(&ray), Color::BLACK);
}
