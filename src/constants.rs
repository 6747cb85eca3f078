//! Tunable constants for hoopshot
//!
//! Defaults for every tuning value live here so the JSON/text config files only
//! need to list what they override.

// =============================================================================
// WORLD
// =============================================================================

pub const STANDARD_GRAVITY: f32 = 9.81; // m/s², scaled by scene_scale and gravity_multiplier

// =============================================================================
// SHOT PROFILE DEFAULTS
// =============================================================================

pub const IMPULSE_PER_CM: f32 = 6.5;
pub const IMPULSE_PER_CM_PER_SEC: f32 = 0.03;
pub const MAX_IMPULSE: f32 = 90.0;
pub const HORIZONTAL_INFLUENCE: f32 = 0.40;
pub const VERTICAL_INFLUENCE: f32 = 1.3;
pub const FORWARD_BIAS: f32 = 0.65;
pub const GRAVITY_MULTIPLIER: f32 = 3.2;
pub const AIR_DRAG: f32 = 0.08;
pub const BACKSPIN_PER_IMPULSE: f32 = 0.25;
pub const SIDESPIN_PER_IMPULSE: f32 = 0.12;
pub const MAX_ANGULAR_SPEED: f32 = 45.0;
pub const DIRECTION_WEIGHT_FLOOR: f32 = 0.01; // canonical direction never loses its up/forward terms

// =============================================================================
// HOOP / BALL GEOMETRY (scene units)
// =============================================================================

pub const HOOP_RADIUS: f32 = 0.225; // ~0.45 m diameter
pub const BALL_RADIUS: f32 = 0.12;
pub const ENTRY_Y_OFFSET: f32 = -0.02; // aim slightly below rim centre
pub const PERFECT_HORIZ_SLACK: f32 = 0.10;
pub const MAKE_HORIZ_SLACK: f32 = 0.22;
pub const BACKBOARD_EXTRA: f32 = 0.32; // beyond the rim, overshoot side
pub const BACKBOARD_BAND_WIDTH: f32 = 0.25; // fixed extra width of the backboard window
pub const MIN_PERFECT_TOLERANCE: f32 = 0.005;

pub const RIM_TUBE_RADIUS: f32 = 0.01;
pub const BACKBOARD_GAP: f32 = 0.15; // rim edge to board face
pub const BACKBOARD_WIDTH: f32 = 1.8;
pub const BACKBOARD_HEIGHT: f32 = 1.05;
pub const BACKBOARD_THICKNESS: f32 = 0.05;
pub const BACKBOARD_RISE: f32 = 0.30; // board centre above the rim plane
pub const NET_PLANE_DEPTH: f32 = 0.10; // net plane below the rim plane
pub const MIN_DOWNWARD_SPEED: f32 = 0.1;

// =============================================================================
// CALIBRATION
// =============================================================================

pub const CAL_DT: f32 = 0.005;
pub const CAL_MAX_TIME: f32 = 5.0;
pub const CAL_OVERTIME_FACTOR: usize = 8; // extra budget for a ball still above the hoop at max time
pub const CAL_BISECT_ITERATIONS: u32 = 18;
pub const CAL_BRACKET_FRACTION: f32 = 0.001; // stop bisecting below 0.1% of max impulse
pub const CAL_BRACKET_SHRINKS: u32 = 8; // halvings of the top impulse while it never comes down
pub const CAL_SLOPE_EPS_FRACTION: f32 = 0.01;
pub const CAL_SLOPE_EPS_MIN: f32 = 0.25;
pub const CAL_SLOPE_FLOOR: f32 = 1e-4;
pub const MIN_HORIZONTAL_DISTANCE: f32 = 0.05;

pub const SAMPLING_COUNT: u32 = 40;
pub const SAMPLING_DT: f32 = 0.01;
pub const SAMPLING_MAX_TIME: f32 = 4.0;

pub const ANALYTIC_ANGLE_MIN_DEG: f32 = 35.0;
pub const ANALYTIC_ANGLE_MAX_DEG: f32 = 60.0;
pub const ANALYTIC_ANGLE_SAMPLES: u32 = 50;

// Minimum fractional widths so consumers never see a zero-width band
pub const PERFECT_MIN_WIDTH: f32 = 0.06;
pub const MAKE_MIN_WIDTH: f32 = 0.10;
pub const BACKBOARD_MIN_WIDTH: f32 = 0.08;

// =============================================================================
// LAUNCHER
// =============================================================================

pub const MIN_SWIPE_CM: f32 = 1.0;
pub const MAX_ANGLE_FROM_UP_DEG: f32 = 40.0;
pub const LAUNCH_COOLDOWN: f32 = 0.25;
pub const MAX_YAW_FROM_SWIPE_DEG: f32 = 12.0;
pub const SNAP_PAD: f32 = 0.02;
pub const MAX_LATERAL_IN_PERFECT: f32 = 0.20;
pub const MIN_SWIPE_DURATION: f32 = 0.02;
pub const DEFAULT_SCREEN_WIDTH: f32 = 1080.0;
pub const DEFAULT_SCREEN_HEIGHT: f32 = 1920.0;
pub const DEFAULT_SCREEN_DPI: f32 = 326.0;
pub const SCREEN_DPI_MIN: f32 = 100.0;
pub const SCREEN_DPI_MAX: f32 = 400.0;
pub const CM_PER_INCH: f32 = 2.54;

// =============================================================================
// OPPONENT
// =============================================================================

pub const AI_MIN_SHOT_INTERVAL: f32 = 1.2;
pub const AI_MAX_SHOT_INTERVAL: f32 = 2.4;
pub const AI_INITIAL_DELAY: f32 = 0.75;
pub const AI_WEIGHT_PERFECT: f32 = 0.55;
pub const AI_WEIGHT_MAKE: f32 = 0.30;
pub const AI_WEIGHT_BACKBOARD: f32 = 0.10;
pub const AI_WEIGHT_MISS: f32 = 0.05;
pub const AI_POWER_JITTER: f32 = 0.04; // ± fraction of the bar
pub const AI_LATERAL_NOISE_DEG: f32 = 6.0;
pub const AI_BACKBOARD_BOOST: f32 = 2.0;
pub const AI_BACKBOARD_BOOST_MAX: f32 = 10.0;
pub const AI_WEIGHT_MAX: f32 = 1000.0; // per outcome class

// Picks used when the matching band is unavailable
pub const AI_DEFAULT_FRACTION: f32 = 0.6;
pub const AI_DEFAULT_BACKBOARD_FRACTION: f32 = 0.7;
pub const AI_DEFAULT_UNDERSHOOT: f32 = 0.35;
pub const AI_DEFAULT_OVERSHOOT: f32 = 0.85;
pub const AI_MISS_MARGIN: f32 = 0.08;
pub const AI_MISS_MARGIN_NO_BACKBOARD: f32 = 0.12;
pub const AI_FALLBACK_STEP: f32 = 0.05;
pub const AI_MIN_MAKE_SIDE: f32 = 0.02;

// =============================================================================
// EVENTS
// =============================================================================

pub const EVENT_HISTORY_LIMIT: usize = 256; // drained events kept for late readers

// =============================================================================
// FILES
// =============================================================================

pub const SHOT_TUNING_FILE: &str = "config/shot_tuning.json";
pub const AI_DIFFICULTY_FILE: &str = "assets/ai_difficulty.txt";
