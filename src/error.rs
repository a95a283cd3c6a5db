use thiserror::Error;

/// Everything that can go wrong while assembling a scene or starting a render.
///
/// Geometric edge cases met *during* tracing (a ray parallel to a plane, a ray
/// starting on a surface) are not errors; they are resolved locally as "no
/// intersection". Only construction-time problems and missing resources are
/// reported through this type.
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("zero vector is not allowed")]
    ZeroVector,

    #[error("{what} must be positive, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("all vertices of a polygon must lie in the same plane")]
    NonCoplanar,

    #[error("polygon vertices must be ordered and the polygon must be convex")]
    NonConvex,

    #[error("consecutive polygon vertices {0} and {1} are coincident or collinear")]
    DegenerateEdge(usize, usize),

    #[error("camera forward and up vectors must be orthogonal")]
    NonOrthogonalAxes,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("missing render resource `{0}`")]
    MissingResource(&'static str),

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TracerError>;
