use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;

use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::{ RenderConfig, Resolution };
use crate::error::{ Result, TracerError };
use crate::scene::Scene;
use crate::tracer::{ RayTracer, SimpleRayTracer };

/// Renders a scene through a camera into a `Canvas`.
///
/// Rows of the image are handed out to a rayon thread pool sized by the
/// configuration. Each worker writes only into its own row of the canvas, so
/// the render needs no locking; the camera and ray tracer are shared
/// read-only.
///
/// # Examples
///
/// ```
/// # use pinhole_tracer::camera::Camera;
/// # use pinhole_tracer::color::Color;
/// # use pinhole_tracer::config::RenderConfig;
/// # use pinhole_tracer::render::Renderer;
/// # use pinhole_tracer::scene::Scene;
/// # use pinhole_tracer::tuple::{ Point, Vector };
/// let scene = Scene::builder("nothing").background(Color::rgb(0.0, 0.0, 0.3)).build();
/// let camera = Camera::builder()
///     .position(Point::ORIGIN)
///     .direction(-Vector::Z, Vector::Y)
///     .view_plane_size(1.0, 1.0)
///     .view_plane_distance(1.0)
///     .build()
///     .unwrap();
///
/// let canvas = Renderer::builder()
///     .camera(camera)
///     .scene(&scene)
///     .config(RenderConfig::default().with_resolution(4, 3))
///     .build()
///     .unwrap()
///     .render()
///     .unwrap();
///
/// assert_eq!(canvas.read_pixel(3, 2), Some(Color::rgb(0.0, 0.0, 0.3)));
/// ```
pub struct Renderer<'a> {
    camera: Camera,
    tracer: Box<dyn RayTracer + 'a>,
    config: RenderConfig,
    resolution: Resolution,
}

impl<'a> Renderer<'a> {
    pub fn builder() -> RendererBuilder<'a> {
        RendererBuilder {
            camera: None,
            tracer: None,
            config: RenderConfig::default(),
            resolution: None,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders every pixel of the image.
    pub fn render(&self) -> Result<Canvas> {
        let Resolution { nx, ny } = self.resolution;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?;

        info!("rendering {}x{} pixels, {} ray(s) per pixel, {} thread(s), depth {}, bounding boxes {}",
            nx, ny, self.config.samples * self.config.samples, pool.current_num_threads(),
            self.config.max_depth, if self.config.bounding_boxes { "on" } else { "off" });
        let start = Instant::now();

        let mut canvas = Canvas::new(nx, ny);
        pool.install(|| {
            canvas.pixels_mut()
                .par_chunks_mut(nx)
                .enumerate()
                .for_each(|(row, pixels)| {
                    for (col, pixel) in pixels.iter_mut().enumerate() {
                        *pixel = self.render_pixel(col, row);
                    }
                });
        });

        info!("rendered {}x{} pixels in {:.2?}", nx, ny, start.elapsed());
        Ok(canvas)
    }

    /// The averaged color of all sample rays through pixel `(col, row)`.
    ///
    /// A pixel whose rays can't be built shows the background.
    pub fn render_pixel(&self, col: usize, row: usize) -> Color {
        let Resolution { nx, ny } = self.resolution;

        match self.camera.construct_rays(nx, ny, col, row, self.config.samples) {
            Ok(rays) => {
                let colors: Vec<Color> = rays.iter()
                    .map(|ray| self.tracer.trace_ray(ray))
                    .collect();
                Color::average(&colors)
            },
            Err(e) => {
                debug!("no rays for pixel ({}, {}): {}", col, row, e);
                self.tracer.background()
            },
        }
    }
}

/// Collects the camera, ray tracer and settings of a `Renderer`.
///
/// The configuration is handed to the ray tracer when the renderer is built,
/// so its depth, contribution cut-off and bounding-box settings win over
/// whatever the tracer was created with.
pub struct RendererBuilder<'a> {
    camera: Option<Camera>,
    tracer: Option<Box<dyn RayTracer + 'a>>,
    config: RenderConfig,
    resolution: Option<Resolution>,
}

impl<'a> RendererBuilder<'a> {
    pub fn camera(mut self, camera: Camera) -> RendererBuilder<'a> {
        self.camera = Some(camera);
        self
    }

    pub fn ray_tracer(mut self, tracer: impl RayTracer + 'a) -> RendererBuilder<'a> {
        self.tracer = Some(Box::new(tracer));
        self
    }

    /// Traces `scene` with a `SimpleRayTracer`.
    pub fn scene(self, scene: &'a Scene) -> RendererBuilder<'a> {
        self.ray_tracer(SimpleRayTracer::new(scene))
    }

    pub fn config(mut self, config: RenderConfig) -> RendererBuilder<'a> {
        self.config = config;
        self
    }

    /// Sets the image resolution.
    ///
    /// Takes precedence over the configuration's resolution, whichever of
    /// `resolution` and `config` is called first.
    pub fn resolution(mut self, nx: usize, ny: usize) -> RendererBuilder<'a> {
        self.resolution = Some(Resolution { nx, ny });
        self
    }

    pub fn build(self) -> Result<Renderer<'a>> {
        let camera = self.camera.ok_or(TracerError::MissingResource("camera"))?;
        let mut tracer = self.tracer.ok_or(TracerError::MissingResource("ray tracer"))?;

        let mut config = self.config;
        config.resolution = self.resolution.or(config.resolution);
        let resolution = config.resolution
            .ok_or(TracerError::MissingResource("image resolution"))?;

        config.validate()?;
        tracer.configure(&config);

        Ok(Renderer { camera, tracer, config, resolution })
    }
}

/* Tests */

#[cfg(test)]
use crate::tuple::{ Point, Vector };

#[cfg(test)]
fn front_camera() -> Camera {
    Camera::builder()
        .position(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y)
        .view_plane_size(100.0, 100.0)
        .view_plane_distance(100.0)
        .build()
        .unwrap()
}

#[cfg(test)]
fn glowing_ball() -> Scene {
    use crate::light::Light;
    use crate::material::Material;
    use crate::shape::Surface;

    let ball = Surface::sphere(Point::new(0.0, 0.0, -100.0), 20.0).unwrap()
        .with_emission(Color::WHITE)
        .with_material(Material::new().kd(0.5));

    Scene::builder("ball")
        .geometry(ball)
        .light(Light::directional(Color::WHITE, -Vector::Z))
        .build()
}

/// A solid color for every ray.
#[cfg(test)]
struct Flat(Color);

#[cfg(test)]
impl RayTracer for Flat {
    fn trace_ray(&self, _ray: &crate::ray::Ray) -> Color { self.0 }
    fn background(&self) -> Color { Color::BLACK }
}

#[test]
fn lit_ball_is_brighter_than_background() {
    crate::logger::init_logger(log::LevelFilter::Debug);

    let scene = glowing_ball();
    let canvas = Renderer::builder()
        .camera(front_camera())
        .ray_tracer(SimpleRayTracer::new(&scene))
        .resolution(9, 9)
        .build()
        .unwrap()
        .render()
        .unwrap();

    let center = canvas.read_pixel(4, 4).unwrap();
    let corner = canvas.read_pixel(0, 0).unwrap();

    assert_eq!(center, Color::rgb(1.5, 1.5, 1.5));
    assert_eq!(corner, Color::BLACK);
    assert!(center.luminance() > corner.luminance());
}

#[test]
fn thread_count_does_not_change_image() {
    let scene = glowing_ball();
    let render = |threads: usize, bounding_boxes: bool| {
        Renderer::builder()
            .camera(front_camera())
            .scene(&scene)
            .config(RenderConfig::default()
                .with_resolution(16, 12)
                .with_samples(2)
                .with_threads(threads)
                .with_bounding_boxes(bounding_boxes))
            .build()
            .unwrap()
            .render()
            .unwrap()
    };

    let single = render(1, true);
    assert_eq!(single, render(4, true));
    assert_eq!(single, render(3, false));
}

#[test]
fn samples_are_averaged() {
    let renderer = Renderer::builder()
        .camera(front_camera())
        .ray_tracer(Flat(Color::rgb(0.25, 0.5, 1.0)))
        .config(RenderConfig::default().with_resolution(2, 2).with_samples(3))
        .build()
        .unwrap();

    assert_eq!(renderer.render_pixel(1, 1), Color::rgb(0.25, 0.5, 1.0));

    // Outside the image there are no rays; the background is used instead.
    assert_eq!(renderer.render_pixel(5, 0), Color::BLACK);
}

#[test]
fn missing_resources_are_reported() {
    let no_camera = Renderer::builder()
        .ray_tracer(Flat(Color::WHITE))
        .resolution(2, 2)
        .build();
    assert!(matches!(no_camera, Err(TracerError::MissingResource("camera"))));

    let no_tracer = Renderer::builder()
        .camera(front_camera())
        .resolution(2, 2)
        .build();
    assert!(matches!(no_tracer, Err(TracerError::MissingResource("ray tracer"))));

    let no_resolution = Renderer::builder()
        .camera(front_camera())
        .ray_tracer(Flat(Color::WHITE))
        .build();
    assert!(matches!(no_resolution, Err(TracerError::MissingResource("image resolution"))));

    let bad_config = Renderer::builder()
        .camera(front_camera())
        .ray_tracer(Flat(Color::WHITE))
        .config(RenderConfig::default().with_resolution(2, 2).with_samples(0))
        .build();
    assert!(matches!(bad_config, Err(TracerError::InvalidConfig(_))));
}

#[test]
fn config_settings_reach_the_tracer() {
    use crate::material::Material;
    use crate::shape::Surface;

    // A mirror ahead, a red ball behind the camera.
    let mirror = Surface::plane(Point::new(0.0, 0.0, -5.0), Vector::Z)
        .with_material(Material::new().kr(1.0));
    let ball = Surface::sphere(Point::new(0.0, 0.0, 5.0), 1.0).unwrap()
        .with_emission(Color::rgb(1.0, 0.0, 0.0));
    let scene = Scene::builder("mirror").geometry(mirror).geometry(ball).build();

    let center_pixel = |config: RenderConfig| {
        Renderer::builder()
            .camera(front_camera())
            .ray_tracer(SimpleRayTracer::new(&scene))
            .config(config.with_resolution(1, 1))
            .build()
            .unwrap()
            .render()
            .unwrap()
            .read_pixel(0, 0)
            .unwrap()
    };

    assert_eq!(center_pixel(RenderConfig::default()), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(center_pixel(RenderConfig::default().with_max_depth(1)), Color::BLACK);
    assert_eq!(center_pixel(RenderConfig::default().with_min_contribution(0.5)), Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn resolution_survives_a_later_config() {
    let renderer = Renderer::builder()
        .camera(front_camera())
        .ray_tracer(Flat(Color::WHITE))
        .resolution(3, 2)
        .config(RenderConfig::default().with_samples(2))
        .build()
        .unwrap();

    assert_eq!(renderer.config().resolution, Some(Resolution { nx: 3, ny: 2 }));
    assert_eq!(renderer.config().samples, 2);

    let canvas = renderer.render().unwrap();
    assert_eq!((canvas.width, canvas.height), (3, 2));
}
