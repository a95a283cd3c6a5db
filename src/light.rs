use crate::color::Color;
use crate::tuple::{ Double3, Point, Vector, align_zero };

/// The scene-wide ambient term.
///
/// Stored already scaled: `intensity = Ia · Ka`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub intensity: Color,
}

impl AmbientLight {
    /// No ambient light at all.
    pub const NONE: AmbientLight = AmbientLight { intensity: Color::BLACK };

    /// Creates an ambient light from a base color `ia` and an attenuation
    /// factor `ka`, either a single number or a per-channel `Double3`.
    pub fn new(ia: Color, ka: impl Into<Double3>) -> AmbientLight {
        AmbientLight { intensity: ia.scale(&ka.into()) }
    }
}

impl Default for AmbientLight {
    fn default() -> AmbientLight {
        AmbientLight::NONE
    }
}

/// Distance attenuation for positioned lights: `kc + kl·d + kq·d²`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Attenuation {
    pub kc: f64,
    pub kl: f64,
    pub kq: f64,
}

impl Default for Attenuation {
    fn default() -> Attenuation {
        Attenuation { kc: 1.0, kl: 0.0, kq: 0.0 }
    }
}

impl Attenuation {
    fn factor(&self, distance: f64) -> f64 {
        self.kc + self.kl * distance + self.kq * distance * distance
    }

    /// Divides `intensity` by the attenuation factor at `distance`.
    ///
    /// A factor that isn't positive lets no light through.
    fn apply(&self, intensity: Color, distance: f64) -> Color {
        let factor = align_zero(self.factor(distance));
        if factor <= 0.0 {
            Color::BLACK
        } else {
            intensity * (1.0 / factor)
        }
    }
}

/// A light source.
///
/// # Examples
///
/// A spot light with a tight beam, fading out with distance:
///
/// ```
/// # use pinhole_tracer::light::Light;
/// # use pinhole_tracer::color::Color;
/// # use pinhole_tracer::tuple::{ Point, Vector };
/// let spot = Light::spot(Color::rgb(800.0, 500.0, 250.0),
///     Point::new(0.0, 0.0, 100.0), -Vector::Z)
///     .with_kl(0.001)
///     .with_kq(0.0001)
///     .with_narrow_beam(10.0);
///
/// let below = spot.intensity_at(&Point::new(0.0, 0.0, 0.0));
/// let aside = spot.intensity_at(&Point::new(50.0, 0.0, 0.0));
/// assert!(below.luminance() > aside.luminance());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Light {
    /// A light infinitely far away, shining along `direction` everywhere.
    Directional {
        intensity: Color,
        direction: Vector,
    },

    /// A light radiating from `position` in every direction.
    Point {
        intensity: Color,
        position: Point,
        attenuation: Attenuation,
    },

    /// A point light narrowed to a beam around `direction`.
    Spot {
        intensity: Color,
        position: Point,
        attenuation: Attenuation,
        direction: Vector,
        narrow_beam: f64,
    },
}

impl Light {
    pub fn directional(intensity: Color, direction: Vector) -> Light {
        Light::Directional { intensity, direction: direction.normalize() }
    }

    pub fn point(intensity: Color, position: Point) -> Light {
        Light::Point { intensity, position, attenuation: Attenuation::default() }
    }

    pub fn spot(intensity: Color, position: Point, direction: Vector) -> Light {
        Light::Spot {
            intensity,
            position,
            attenuation: Attenuation::default(),
            direction: direction.normalize(),
            narrow_beam: 1.0,
        }
    }

    fn attenuation_mut(&mut self) -> Option<&mut Attenuation> {
        match self {
            Light::Directional { .. } => None,
            Light::Point { attenuation, .. } | Light::Spot { attenuation, .. } =>
                Some(attenuation),
        }
    }

    /// Sets the constant attenuation. Has no effect on directional lights.
    pub fn with_kc(mut self, kc: f64) -> Light {
        if let Some(a) = self.attenuation_mut() { a.kc = kc; }
        self
    }

    /// Sets the linear attenuation. Has no effect on directional lights.
    pub fn with_kl(mut self, kl: f64) -> Light {
        if let Some(a) = self.attenuation_mut() { a.kl = kl; }
        self
    }

    /// Sets the quadratic attenuation. Has no effect on directional lights.
    pub fn with_kq(mut self, kq: f64) -> Light {
        if let Some(a) = self.attenuation_mut() { a.kq = kq; }
        self
    }

    /// Sets the beam exponent of a spot light. Has no effect on other lights.
    pub fn with_narrow_beam(mut self, exponent: f64) -> Light {
        if let Light::Spot { narrow_beam, .. } = &mut self {
            *narrow_beam = exponent;
        }
        self
    }

    /// The light reaching `point`, after attenuation and beam falloff.
    ///
    /// A spot light contributes nothing to points behind or beside its beam.
    pub fn intensity_at(&self, point: &Point) -> Color {
        match self {
            Light::Directional { intensity, .. } => *intensity,

            Light::Point { intensity, position, attenuation } => {
                attenuation.apply(*intensity, point.distance(position))
            },

            Light::Spot { intensity, position, attenuation, direction, narrow_beam } => {
                let l = match point.subtract(position) {
                    Ok(v) => v.normalize(),
                    Err(_) => return Color::BLACK,
                };

                let projection = align_zero(direction.dot(&l));
                if projection <= 0.0 {
                    return Color::BLACK;
                }

                let base = attenuation.apply(*intensity, point.distance(position));
                base * projection.powf(*narrow_beam)
            },
        }
    }

    /// The unit direction from the light towards `point`.
    ///
    /// `None` when `point` sits exactly on a positioned light.
    pub fn direction_at(&self, point: &Point) -> Option<Vector> {
        match self {
            Light::Directional { direction, .. } => Some(*direction),
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                point.subtract(position).ok().map(|v| v.normalize())
            },
        }
    }

    /// How far the light is from `point`; infinite for directional lights.
    pub fn distance_to(&self, point: &Point) -> f64 {
        match self {
            Light::Directional { .. } => std::f64::INFINITY,
            Light::Point { position, .. } | Light::Spot { position, .. } => {
                position.distance(point)
            },
        }
    }
}

/* Tests */

#[test]
fn ambient_light_is_prescaled() {
    let a = AmbientLight::new(Color::rgb(255.0, 191.0, 191.0), 0.1);
    assert_eq!(a.intensity, Color::rgb(25.5, 19.1, 19.1));

    let b = AmbientLight::new(Color::WHITE, Double3::new(0.5, 0.0, 1.0));
    assert_eq!(b.intensity, Color::rgb(0.5, 0.0, 1.0));

    assert_eq!(AmbientLight::default().intensity, Color::BLACK);
}

#[test]
fn directional_light_is_uniform() {
    let l = Light::directional(Color::rgb(1.0, 0.5, 0.2), Vector::new(0.0, -2.0, 0.0).unwrap());
    let far = Point::new(1000.0, -300.0, 42.0);

    assert_eq!(l.intensity_at(&Point::ORIGIN), Color::rgb(1.0, 0.5, 0.2));
    assert_eq!(l.intensity_at(&far), Color::rgb(1.0, 0.5, 0.2));
    assert_eq!(l.direction_at(&far), Some(-Vector::Y));
    assert!(l.distance_to(&far).is_infinite());
}

#[test]
fn point_light_attenuates_with_distance() {
    let l = Light::point(Color::rgb(100.0, 100.0, 100.0), Point::new(0.0, 10.0, 0.0))
        .with_kc(1.0)
        .with_kl(0.1)
        .with_kq(0.01);

    // 1 + 0.1·10 + 0.01·100 = 3
    assert_eq!(l.intensity_at(&Point::ORIGIN), Color::rgb(100.0, 100.0, 100.0) * (1.0 / 3.0));
    assert_eq!(l.direction_at(&Point::ORIGIN), Some(-Vector::Y));
    assert!(crate::feq(l.distance_to(&Point::ORIGIN), 10.0));
}

#[test]
fn point_light_without_attenuation_is_constant() {
    let l = Light::point(Color::WHITE, Point::new(5.0, 5.0, 5.0));

    assert_eq!(l.intensity_at(&Point::ORIGIN), Color::WHITE);
    assert_eq!(l.direction_at(&Point::new(5.0, 5.0, 5.0)), None);
}

#[test]
fn non_positive_attenuation_gives_no_light() {
    let zero = Light::point(Color::WHITE, Point::new(0.0, 10.0, 0.0)).with_kc(0.0);
    assert_eq!(zero.intensity_at(&Point::ORIGIN), Color::BLACK);

    // 0.5 − 0.1·10 < 0
    let negative = Light::spot(Color::WHITE, Point::new(0.0, 10.0, 0.0), -Vector::Y)
        .with_kc(0.5)
        .with_kl(-0.1);
    assert_eq!(negative.intensity_at(&Point::ORIGIN), Color::BLACK);

    // Only the linear term left: 0.2·10 = 2
    let linear = Light::point(Color::WHITE, Point::new(0.0, 10.0, 0.0))
        .with_kc(0.0)
        .with_kl(0.2);
    assert_eq!(linear.intensity_at(&Point::ORIGIN), Color::WHITE * 0.5);
}

#[test]
fn spot_light_falls_off_away_from_axis() {
    let l = Light::spot(Color::WHITE, Point::new(0.0, 10.0, 0.0), -Vector::Y);

    // Straight below: full intensity
    assert_eq!(l.intensity_at(&Point::ORIGIN), Color::WHITE);

    // 45 degrees off axis: cos = √2/2
    let k = 2.0f64.sqrt() / 2.0;
    assert_eq!(l.intensity_at(&Point::new(10.0, 0.0, 0.0)), Color::WHITE * k);

    // Beside and behind the light
    assert_eq!(l.intensity_at(&Point::new(10.0, 10.0, 0.0)), Color::BLACK);
    assert_eq!(l.intensity_at(&Point::new(0.0, 20.0, 0.0)), Color::BLACK);
}

#[test]
fn narrow_beam_concentrates_spot_light() {
    let wide = Light::spot(Color::WHITE, Point::new(0.0, 10.0, 0.0), -Vector::Y);
    let narrow = wide.with_narrow_beam(8.0);
    let off_axis = Point::new(10.0, 0.0, 0.0);

    let k = 2.0f64.sqrt() / 2.0;
    assert_eq!(narrow.intensity_at(&off_axis), Color::WHITE * k.powi(8));
    assert!(narrow.intensity_at(&off_axis).luminance() < wide.intensity_at(&off_axis).luminance());
    assert_eq!(narrow.intensity_at(&Point::ORIGIN), Color::WHITE);
}

#[test]
fn attenuation_setters_skip_directional_lights() {
    let l = Light::directional(Color::WHITE, Vector::X).with_kq(5.0).with_narrow_beam(3.0);

    assert_eq!(l, Light::directional(Color::WHITE, Vector::X));
}
