use serde::{ Serialize, Deserialize };

use crate::tuple::Double3;

/// A material record.
///
/// Materials use the Phong reflection model: a diffuse factor `kd`, specular
/// factor `ks` and `shininess` exponent. On top of that come the mirror
/// reflection factor `kr` and the transparency factor `kt`, which control how
/// much of the reflected and refracted rays reach the viewer.
///
/// Every factor is per channel, so a surface can reflect red but absorb blue.
/// The setters accept either a single number or a `Double3`.
///
/// # Examples
///
/// ```
/// # use pinhole_tracer::material::Material;
/// # use pinhole_tracer::tuple::Double3;
/// let glass = Material::new().kt(0.8).kr(Double3::new(0.1, 0.1, 0.2));
///
/// assert_eq!(glass.kt, Double3::splat(0.8));
/// assert_eq!(glass.kd, Double3::ZERO);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub kd: Double3,
    pub ks: Double3,
    pub kr: Double3,
    pub kt: Double3,
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            kd: Double3::ZERO,
            ks: Double3::ZERO,
            kr: Double3::ZERO,
            kt: Double3::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    /// Creates a material that neither scatters, reflects nor transmits.
    pub fn new() -> Material {
        Default::default()
    }

    pub fn kd(mut self, kd: impl Into<Double3>) -> Material {
        self.kd = kd.into();
        self
    }

    pub fn ks(mut self, ks: impl Into<Double3>) -> Material {
        self.ks = ks.into();
        self
    }

    pub fn kr(mut self, kr: impl Into<Double3>) -> Material {
        self.kr = kr.into();
        self
    }

    pub fn kt(mut self, kt: impl Into<Double3>) -> Material {
        self.kt = kt.into();
        self
    }

    pub fn shininess(mut self, shininess: i32) -> Material {
        self.shininess = shininess;
        self
    }
}

/* Tests */

#[test]
fn default_material_is_inert() {
    let m = Material::default();

    assert_eq!(m.kd, Double3::ZERO);
    assert_eq!(m.ks, Double3::ZERO);
    assert_eq!(m.kr, Double3::ZERO);
    assert_eq!(m.kt, Double3::ZERO);
    assert_eq!(m.shininess, 0);
}

#[test]
fn fluent_setters() {
    let m = Material::new()
        .kd(0.5)
        .ks(Double3::new(0.1, 0.2, 0.3))
        .kr(0.25)
        .shininess(60);

    assert_eq!(m.kd, Double3::new(0.5, 0.5, 0.5));
    assert_eq!(m.ks, Double3::new(0.1, 0.2, 0.3));
    assert_eq!(m.kr, Double3::splat(0.25));
    assert_eq!(m.kt, Double3::ZERO);
    assert_eq!(m.shininess, 60);
}

#[test]
fn material_from_partial_json() {
    let m: Material = serde_json::from_str(
        r#"{ "kd": { "x": 0.2, "y": 0.4, "z": 0.6 }, "shininess": 20 }"#
    ).unwrap();

    assert_eq!(m.kd, Double3::new(0.2, 0.4, 0.6));
    assert_eq!(m.ks, Double3::ZERO);
    assert_eq!(m.shininess, 20);
}
