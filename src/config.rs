use serde::{ Serialize, Deserialize };

use crate::consts::{ MAX_CALC_COLOR_LEVEL, MIN_CALC_COLOR_K };
use crate::error::{ Result, TracerError };

/// Output image size, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub nx: usize,
    pub ny: usize,
}

/// Per-render settings.
///
/// Everything that varies between renders of the same scene lives here, so
/// that nothing about a render depends on process-wide state. Missing fields
/// take their defaults when read from JSON.
///
/// # Examples
///
/// ```
/// # use pinhole_tracer::config::RenderConfig;
/// let config = RenderConfig::from_json(r#"{
///     "resolution": { "nx": 800, "ny": 500 },
///     "samples": 3,
///     "bounding_boxes": false
/// }"#).unwrap();
///
/// assert_eq!(config.samples, 3);
/// assert_eq!(config.max_depth, 10);
/// assert!(!config.bounding_boxes);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image size. Required before rendering, but may be set in code.
    pub resolution: Option<Resolution>,

    /// Supersampling grid per pixel side; `samples²` rays per pixel.
    pub samples: usize,

    /// Worker threads. Zero lets the pool pick one per core.
    pub threads: usize,

    /// Depth of the reflection/refraction ray tree, primary ray included.
    pub max_depth: usize,

    /// Secondary rays whose accumulated weight drops below this are not cast.
    pub min_contribution: f64,

    /// Whether to prune intersection tests with bounding boxes.
    pub bounding_boxes: bool,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            resolution: None,
            samples: 1,
            threads: 0,
            max_depth: MAX_CALC_COLOR_LEVEL,
            min_contribution: MIN_CALC_COLOR_K,
            bounding_boxes: true,
        }
    }
}

impl RenderConfig {
    /// Parses and validates a configuration.
    pub fn from_json(json: &str) -> Result<RenderConfig> {
        let config: RenderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolution(mut self, nx: usize, ny: usize) -> RenderConfig {
        self.resolution = Some(Resolution { nx, ny });
        self
    }

    pub fn with_samples(mut self, samples: usize) -> RenderConfig {
        self.samples = samples;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> RenderConfig {
        self.threads = threads;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> RenderConfig {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_contribution(mut self, min_contribution: f64) -> RenderConfig {
        self.min_contribution = min_contribution;
        self
    }

    pub fn with_bounding_boxes(mut self, enabled: bool) -> RenderConfig {
        self.bounding_boxes = enabled;
        self
    }

    /// Rejects settings no render could use.
    pub fn validate(&self) -> Result<()> {
        if let Some(r) = self.resolution {
            if r.nx == 0 || r.ny == 0 {
                return Err(TracerError::InvalidConfig(
                    format!("resolution must be non-zero, got {}x{}", r.nx, r.ny)));
            }
        }

        if self.samples == 0 {
            return Err(TracerError::InvalidConfig("samples must be at least 1".into()));
        }

        if self.max_depth == 0 {
            return Err(TracerError::InvalidConfig("max_depth must be at least 1".into()));
        }

        if !(self.min_contribution >= 0.0 && self.min_contribution < 1.0) {
            return Err(TracerError::InvalidConfig(
                format!("min_contribution must be in [0, 1), got {}", self.min_contribution)));
        }

        Ok(())
    }
}

/* Tests */

#[test]
fn default_config_is_valid() {
    let config = RenderConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.resolution, None);
    assert_eq!(config.samples, 1);
    assert!(config.bounding_boxes);
}

#[test]
fn empty_json_gives_defaults() {
    assert_eq!(RenderConfig::from_json("{}").unwrap(), RenderConfig::default());
}

#[test]
fn invalid_configs_are_rejected() {
    let zero_width = RenderConfig::default().with_resolution(0, 10);
    assert!(matches!(zero_width.validate(), Err(TracerError::InvalidConfig(_))));

    assert!(RenderConfig::default().with_samples(0).validate().is_err());
    assert!(RenderConfig::default().with_max_depth(0).validate().is_err());
    assert!(RenderConfig::default().with_min_contribution(1.5).validate().is_err());
    assert!(RenderConfig::default().with_min_contribution(std::f64::NAN).validate().is_err());

    assert!(matches!(RenderConfig::from_json(r#"{ "samples": 0 }"#),
        Err(TracerError::InvalidConfig(_))));
    assert!(matches!(RenderConfig::from_json(r#"{ "samples": "many" }"#),
        Err(TracerError::Parse(_))));
}
