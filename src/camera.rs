use crate::error::{ Result, TracerError };
use crate::ray::Ray;
use crate::tuple::{ Double3, Point, Vector, is_zero };

/// A pinhole camera.
///
/// The camera sits at `position`, looking along `forward` with `up` pointing
/// to the top of the image. The view plane is `width` by `height` world units
/// and lies `distance` away from the eye; every primary ray leaves the eye and
/// passes through a point on that plane.
///
/// Cameras are built and validated once through a `CameraBuilder`. The three
/// axes are unit length and mutually orthogonal, with `right = forward × up`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Point,
    forward: Vector,
    up: Vector,
    right: Vector,
    width: f64,
    height: f64,
    distance: f64,
}

impl Camera {
    pub fn builder() -> CameraBuilder {
        Default::default()
    }

    pub fn position(&self) -> Point { self.position }
    pub fn forward(&self) -> Vector { self.forward }
    pub fn up(&self) -> Vector { self.up }
    pub fn right(&self) -> Vector { self.right }
    pub fn width(&self) -> f64 { self.width }
    pub fn height(&self) -> f64 { self.height }
    pub fn distance(&self) -> f64 { self.distance }

    /// The point on the view plane at offsets `(x, y)` from its center, along
    /// `right` and `up` respectively.
    fn view_plane_point(&self, x: f64, y: f64) -> Double3 {
        self.position.xyz() +
            self.forward.xyz() * self.distance +
            self.right.xyz() * x +
            self.up.xyz() * y
    }

    /// Offsets of the center of pixel `(col, row)` from the view plane center,
    /// and the size of one pixel.
    fn pixel_center(&self, nx: usize, ny: usize, col: usize, row: usize)
        -> Result<(f64, f64, f64, f64)> {
        if nx == 0 || ny == 0 {
            return Err(TracerError::InvalidConfig(
                format!("image must have pixels, got {}x{}", nx, ny)));
        }

        if col >= nx || row >= ny {
            return Err(TracerError::InvalidConfig(
                format!("pixel ({}, {}) lies outside a {}x{} image", col, row, nx, ny)));
        }

        let rx = self.width / nx as f64;
        let ry = self.height / ny as f64;

        // Row 0 is the top of the image, so y decreases as rows increase.
        let xj = (col as f64 - (nx as f64 - 1.0) / 2.0) * rx;
        let yi = -(row as f64 - (ny as f64 - 1.0) / 2.0) * ry;

        Ok((xj, yi, rx, ry))
    }

    fn ray_through(&self, target: Double3) -> Result<Ray> {
        let direction = Point::from(target).subtract(&self.position)?;
        Ok(Ray::new(self.position, direction))
    }

    /// The ray through the center of pixel `(col, row)` of an `nx` by `ny`
    /// image.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinhole_tracer::camera::Camera;
    /// # use pinhole_tracer::tuple::{ Point, Vector };
    /// let camera = Camera::builder()
    ///     .position(Point::ORIGIN)
    ///     .direction(-Vector::Z, Vector::Y)
    ///     .view_plane_size(3.0, 3.0)
    ///     .view_plane_distance(1.0)
    ///     .build()
    ///     .unwrap();
    ///
    /// let ray = camera.construct_ray(3, 3, 1, 1).unwrap();
    /// assert_eq!(ray.direction(), -Vector::Z);
    /// ```
    pub fn construct_ray(&self, nx: usize, ny: usize, col: usize, row: usize) -> Result<Ray> {
        let (xj, yi, _, _) = self.pixel_center(nx, ny, col, row)?;
        self.ray_through(self.view_plane_point(xj, yi))
    }

    /// Rays through a `samples` by `samples` grid of sub-pixel centers of pixel
    /// `(col, row)`, for anti-aliasing. One sample is the plain pixel ray.
    pub fn construct_rays(&self, nx: usize, ny: usize, col: usize, row: usize, samples: usize)
        -> Result<Vec<Ray>> {
        if samples <= 1 {
            return Ok(vec![self.construct_ray(nx, ny, col, row)?]);
        }

        let (xj, yi, rx, ry) = self.pixel_center(nx, ny, col, row)?;
        let n = samples as f64;

        let mut rays = Vec::with_capacity(samples * samples);
        for a in 0..samples {
            for b in 0..samples {
                let dx = ((b as f64 + 0.5) / n - 0.5) * rx;
                let dy = -((a as f64 + 0.5) / n - 0.5) * ry;
                rays.push(self.ray_through(self.view_plane_point(xj + dx, yi + dy))?);
            }
        }

        Ok(rays)
    }
}

/// Accumulates camera settings, validated in one go by `build`.
#[derive(Clone, Debug, Default)]
pub struct CameraBuilder {
    position: Option<Point>,
    direction: Option<(Vector, Vector)>,
    size: Option<(f64, f64)>,
    distance: Option<f64>,
    translation: Double3,
    roll: f64,
}

impl CameraBuilder {
    pub fn position(mut self, position: Point) -> CameraBuilder {
        self.position = Some(position);
        self
    }

    /// Sets the viewing direction and the image's up direction. The two must
    /// be orthogonal; neither needs to be unit length.
    pub fn direction(mut self, forward: Vector, up: Vector) -> CameraBuilder {
        self.direction = Some((forward, up));
        self
    }

    pub fn view_plane_size(mut self, width: f64, height: f64) -> CameraBuilder {
        self.size = Some((width, height));
        self
    }

    pub fn view_plane_distance(mut self, distance: f64) -> CameraBuilder {
        self.distance = Some(distance);
        self
    }

    /// Moves the camera by `offset`, on top of its position.
    pub fn translate(mut self, offset: Vector) -> CameraBuilder {
        self.translation = self.translation + offset.xyz();
        self
    }

    /// Rolls the camera about its viewing direction, counterclockwise as
    /// seen from behind the camera.
    pub fn roll(mut self, degrees: f64) -> CameraBuilder {
        self.roll += degrees;
        self
    }

    pub fn build(self) -> Result<Camera> {
        let position = self.position.ok_or(TracerError::MissingField("position"))?;
        let (forward, up) = self.direction.ok_or(TracerError::MissingField("direction"))?;
        let (width, height) = self.size.ok_or(TracerError::MissingField("view plane size"))?;
        let distance = self.distance.ok_or(TracerError::MissingField("view plane distance"))?;

        let forward = forward.normalize();
        let up = up.normalize();

        if !is_zero(forward.dot(&up)) {
            return Err(TracerError::NonOrthogonalAxes);
        }

        for (what, value) in [("view plane width", width), ("view plane height", height),
            ("view plane distance", distance)].iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(TracerError::NonPositive { what: *what, value: *value });
            }
        }

        // Rolling about forward keeps forward and up orthogonal.
        let up = up.rotate(&forward, -self.roll).normalize();
        let right = forward.cross(&up)?.normalize();

        Ok(Camera {
            position: Point::from(position.xyz() + self.translation),
            forward,
            up,
            right,
            width,
            height,
            distance,
        })
    }
}

/* Tests */

#[cfg(test)]
fn basic_builder() -> CameraBuilder {
    Camera::builder()
        .position(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y)
        .view_plane_size(6.0, 6.0)
        .view_plane_distance(10.0)
}

#[test]
fn right_is_derived_from_forward_and_up() {
    let camera = basic_builder().build().unwrap();

    assert_eq!(camera.forward(), -Vector::Z);
    assert_eq!(camera.up(), Vector::Y);
    assert_eq!(camera.right(), Vector::X);
}

#[test]
fn rays_through_odd_grid() {
    let camera = basic_builder().build().unwrap();

    // 3x3 pixels of 2x2 units each
    let center = camera.construct_ray(3, 3, 1, 1).unwrap();
    assert_eq!(center.origin(), Point::ORIGIN);
    assert_eq!(center.direction(), -Vector::Z);

    let top_left = camera.construct_ray(3, 3, 0, 0).unwrap();
    assert_eq!(top_left.direction(), Vector::new(-2.0, 2.0, -10.0).unwrap().normalize());

    let right_middle = camera.construct_ray(3, 3, 2, 1).unwrap();
    assert_eq!(right_middle.direction(), Vector::new(2.0, 0.0, -10.0).unwrap().normalize());

    let bottom_middle = camera.construct_ray(3, 3, 1, 2).unwrap();
    assert_eq!(bottom_middle.direction(), Vector::new(0.0, -2.0, -10.0).unwrap().normalize());
}

#[test]
fn rays_through_even_grid() {
    let camera = basic_builder().build().unwrap();

    // 4x4 pixels of 1.5x1.5 units each; no pixel sits on the center.
    let r = camera.construct_ray(4, 4, 1, 1).unwrap();
    assert_eq!(r.direction(), Vector::new(-0.75, 0.75, -10.0).unwrap().normalize());

    let r = camera.construct_ray(4, 4, 3, 0).unwrap();
    assert_eq!(r.direction(), Vector::new(2.25, 2.25, -10.0).unwrap().normalize());
}

#[test]
fn pixel_outside_image_is_rejected() {
    let camera = basic_builder().build().unwrap();

    assert!(camera.construct_ray(3, 3, 3, 0).is_err());
    assert!(camera.construct_ray(0, 3, 0, 0).is_err());
}

#[test]
fn supersampled_rays_stay_inside_pixel() {
    let camera = basic_builder().build().unwrap();

    assert_eq!(camera.construct_rays(3, 3, 1, 1, 1).unwrap(),
        vec![camera.construct_ray(3, 3, 1, 1).unwrap()]);

    let rays = camera.construct_rays(3, 3, 1, 1, 2).unwrap();
    assert_eq!(rays.len(), 4);

    // Sub-pixel centers at ±0.5 units around the pixel center
    assert_eq!(rays[0].direction(), Vector::new(-0.5, 0.5, -10.0).unwrap().normalize());
    assert_eq!(rays[3].direction(), Vector::new(0.5, -0.5, -10.0).unwrap().normalize());

    for r in rays.iter() {
        let x = r.direction().x() / -r.direction().z() * 10.0;
        let y = r.direction().y() / -r.direction().z() * 10.0;
        assert!(x.abs() < 1.0 && y.abs() < 1.0);
    }
}

#[test]
fn missing_fields_are_reported() {
    let no_position = Camera::builder()
        .direction(-Vector::Z, Vector::Y)
        .view_plane_size(1.0, 1.0)
        .view_plane_distance(1.0)
        .build();
    assert!(matches!(no_position, Err(TracerError::MissingField("position"))));

    let no_distance = Camera::builder()
        .position(Point::ORIGIN)
        .direction(-Vector::Z, Vector::Y)
        .view_plane_size(1.0, 1.0)
        .build();
    assert!(matches!(no_distance, Err(TracerError::MissingField("view plane distance"))));

    assert!(matches!(Camera::builder().build(), Err(TracerError::MissingField(_))));
}

#[test]
fn bad_axes_and_sizes_are_rejected() {
    let skewed = basic_builder().direction(-Vector::Z, Vector::new(0.0, 1.0, 0.1).unwrap()).build();
    assert!(matches!(skewed, Err(TracerError::NonOrthogonalAxes)));

    let flat = basic_builder().view_plane_size(0.0, 6.0).build();
    assert!(matches!(flat, Err(TracerError::NonPositive { .. })));

    let behind = basic_builder().view_plane_distance(-1.0).build();
    assert!(matches!(behind, Err(TracerError::NonPositive { .. })));
}

#[test]
fn translate_and_roll() {
    let camera = basic_builder()
        .translate(Vector::new(0.0, 0.0, 5.0).unwrap())
        .translate(Vector::X)
        .roll(90.0)
        .build()
        .unwrap();

    assert_eq!(camera.position(), Point::new(1.0, 0.0, 5.0));
    assert_eq!(camera.forward(), -Vector::Z);

    // Rolling a quarter turn counterclockwise brings up to the left.
    assert_eq!(camera.up(), -Vector::X);
    assert_eq!(camera.right(), Vector::Y);
}
