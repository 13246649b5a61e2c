//! Constants used throughout the overlay engine

/// Hand landmark indices (21-point hand model)
pub mod hand {
    /// Ring finger base joint
    pub const RING_FINGER_MCP: usize = 13;
    /// Ring finger middle joint
    pub const RING_FINGER_PIP: usize = 14;
}

/// Face landmark indices (468-point face mesh)
pub mod face {
    /// Outer corner of the subject's right eye
    pub const RIGHT_EYE_OUTER: usize = 33;
    /// Outer corner of the subject's left eye
    pub const LEFT_EYE_OUTER: usize = 263;
    /// Chin
    pub const CHIN: usize = 152;
    /// Left cheek edge, used both as ear tragus and neck side
    pub const LEFT_TRAGUS: usize = 234;
    /// Right cheek edge, used both as ear tragus and neck side
    pub const RIGHT_TRAGUS: usize = 454;
    /// Low point under the mouth used as neck base
    pub const NECK_BASE: usize = 199;

    /// Closed face outline, clockwise from the forehead
    pub const FACE_OVAL: [usize; 36] = [
        10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152, 148, 176,
        149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109,
    ];
}

/// Accepted range for the user size slider, in percent
pub const SIZE_SCALE_MIN_PERCENT: u32 = 50;
pub const SIZE_SCALE_MAX_PERCENT: u32 = 200;
pub const SIZE_SCALE_DEFAULT_PERCENT: u32 = 100;

/// Ring geometry
pub const RING_ANCHOR_LERP: f64 = 0.55;
pub const RING_RADIUS_FACTOR: f64 = 0.30;
pub const RING_RADIUS_MIN: f64 = 5.0;
pub const RING_RADIUS_MAX: f64 = 24.0;
pub const RING_DRAW_SIZE_FACTOR: f64 = 2.592;
pub const RING_PLACEHOLDER_LINE_FACTOR: f64 = 0.28;
pub const RING_PLACEHOLDER_MIN_LINE: f64 = 2.0;
/// Gold used for the procedural ring placeholder (#d4af37)
pub const RING_PLACEHOLDER_COLOR: [u8; 4] = [0xd4, 0xaf, 0x37, 0xff];

/// Sunglasses geometry
pub const SUNGLASSES_EYE_SPAN_FACTOR: f64 = 2.4;
pub const SUNGLASSES_FIT_FACTOR: f64 = 0.65;
pub const SUNGLASSES_TOP_OFFSET: f64 = 0.45;

/// Necklace geometry
pub const NECKLACE_EYE_WIDTH_FACTOR: f64 = 1.2;
pub const NECKLACE_FACE_HEIGHT_FACTOR: f64 = 0.9;
pub const NECKLACE_SIDES_WEIGHT: f64 = 0.6;
pub const NECKLACE_CHIN_BLEND: f64 = 0.10;
pub const NECKLACE_DROP_FACTOR: f64 = 0.52;
pub const NECKLACE_TOP_OFFSET: f64 = 0.20;
pub const NECKLACE_CLAMP_X: f64 = 0.10;
pub const NECKLACE_CLAMP_Y: f64 = 0.05;

/// Earring geometry
pub const EARRING_SIZE_FACTOR: f64 = 0.2275;
pub const EARRING_OUTWARD_FRONT: f64 = 0.18;
pub const EARRING_OUTWARD_SIDE: f64 = 0.65;
pub const EARRING_DROP_FACTOR: f64 = 1.7;
pub const EAR_MARGIN: f64 = 0.05;
pub const EAR_BOUNDS_MIN: f64 = 0.01;
pub const EAR_BOUNDS_MAX: f64 = 0.99;

/// Face outline expansion about the eye-line midpoint
pub const OCCLUSION_EXPAND_FRONT: f64 = 1.06;
pub const OCCLUSION_EXPAND_PARTIAL: f64 = 1.03;

/// Default smoothing alphas per anchor category
pub const RING_ALPHA: f64 = 0.30;
pub const EAR_POSITION_ALPHA: f64 = 0.28;
pub const EAR_ANGLE_ALPHA: f64 = 0.18;
pub const NECKLACE_ALPHA: f64 = 0.12;

/// Cache-busting query parameter appended to asset URLs
pub const CACHE_BUST_PARAM: &str = "v";
