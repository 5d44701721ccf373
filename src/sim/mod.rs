//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only (velocities are pixels per tick)
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Coordinates are screen-style: origin top-left, y grows downward.

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{BrickHit, collide_bricks, collide_paddle, collide_walls, rebound_angle};
pub use state::{ArenaConfig, Ball, Brick, BrickGrid, GamePhase, GameState, Paddle, Powerup, Rect};
pub use tick::{TickInput, tick};
