//! Brickfall - a brick-breaker with splitting multi-balls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, entity lifecycle, game state)
//! - `settings`: User preferences (ball speed preset)
//!
//! Rendering and input wiring live in the binary (`main.rs`); the sim has no
//! platform dependencies and can be driven headless by calling `tick` in a loop.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SpeedPreset};

/// Game configuration constants
pub mod consts {
    /// Ball radius (shared by primary and split balls)
    pub const BALL_RADIUS: f32 = 5.0;
    /// Divisor applied to sqrt(width * height) to derive the base ball speed
    pub const BASE_SPEED_DIVISOR: f32 = 300.0;
    /// Speed scale applied to split balls (relative to the primary's speed)
    pub const SPLIT_SPEED_SCALE: f32 = 0.7;

    /// Paddle dimensions
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Gap between paddle bottom and canvas bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Keyboard paddle step, pixels per key press
    pub const PADDLE_KEY_STEP: f32 = 20.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 12;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 20.0;
    /// Chance a brick is special (drops a powerup)
    pub const SPECIAL_BRICK_CHANCE: f64 = 0.2;

    /// Powerup dimensions and fall speed (pixels per tick)
    pub const POWERUP_SIZE: f32 = 15.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;

    /// Paddle rebound angle range: 30 deg (shallow edge hit) to 150 deg
    pub const REBOUND_MIN_ANGLE: f32 = std::f32::consts::PI / 6.0;
    pub const REBOUND_MAX_ANGLE: f32 = std::f32::consts::PI * 5.0 / 6.0;
}
