// Floating point comparisons
pub const FEQ_EPSILON: f64 = 1e-10;

// Colors are compared more loosely; they are produced by long chains of
// products and are only ever quantised to 8 bits downstream.
pub const COLOR_EPSILON: f64 = 0.0001;

// Distance a secondary ray origin is pushed off the surface it starts on.
pub const RAY_OFFSET_DELTA: f64 = 0.0001;

// Recursion limits for reflected and refracted rays
pub const MAX_CALC_COLOR_LEVEL: usize = 10;
pub const MIN_CALC_COLOR_K: f64 = 0.001;
pub const INITIAL_K: f64 = 1.0;

// Relative padding applied to bounding boxes before slab tests
pub const BOX_PADDING: f64 = 1e-6;
