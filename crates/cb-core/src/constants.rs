//! Global constants for cb-core

/// Uniform multiplier from lattice units to display/export units
pub const DISPLAY_SCALE: f32 = 5.0;

/// Default number of segments for wheel cylinder generation
pub const WHEEL_SEGMENTS: u32 = 32;

/// Gap kept between a wheel and its body cutout (lattice units)
pub const WHEEL_ARC_CLEARANCE: f32 = 0.5;

/// Extra height the top panel keeps above a wheel arc (lattice units)
pub const WHEEL_TOP_CLEARANCE: f32 = 1.0;

/// Value for wheel `offset`/`width` fields missing from older records
pub const DEFAULT_WHEEL_OFFSET: f32 = 10.0;

/// See [`DEFAULT_WHEEL_OFFSET`]
pub const DEFAULT_WHEEL_WIDTH: f32 = 10.0;

/// Default lattice resolution of a new design: (length, width, height)
pub const DEFAULT_BOX_SIZE: (usize, usize, usize) = (101, 41, 31);

/// Checkerboard colors of a new design (0xRRGGBB)
pub const DEFAULT_COLOR_ODD: u32 = 0xEB7D09;
pub const DEFAULT_COLOR_EVEN: u32 = 0x000000;
pub const DEFAULT_COLOR_WHEELS: u32 = 0x202020;

/// Current storage model version
pub const STORAGE_VERSION: u32 = 1;

/// Placeholder texture coordinate for every generated vertex
pub const PLACEHOLDER_UV: [f32; 2] = [0.5, 0.5];
