//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the start signal; render only, no physics
    NotStarted,
    /// Active gameplay
    Running,
    /// All bricks cleared (terminal)
    Won,
    /// Primary ball lost with no split balls left (terminal)
    Lost,
}

impl GamePhase {
    /// Terminal phases never tick again; a full reset is the only way out
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Axis-aligned rectangle, top-left anchored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Play field dimensions, fixed for the lifetime of a game
#[derive(Debug, Clone, Copy)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl ArenaConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reference ball speed, scaled so pace tracks the canvas size
    pub fn base_speed(&self) -> f32 {
        (self.width * self.height).sqrt() / BASE_SPEED_DIVISOR
    }
}

/// A ball entity; radius is the shared `BALL_RADIUS` constant
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Bounding square used for brick AABB tests
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - BALL_RADIUS,
            self.pos.y - BALL_RADIUS,
            BALL_RADIUS * 2.0,
            BALL_RADIUS * 2.0,
        )
    }

    /// Rescale velocity to the target speed, preserving direction.
    ///
    /// A live ball must never have exact-zero velocity magnitude; if it
    /// somehow does, the direction is unrecoverable and velocity is left
    /// untouched rather than dividing by zero.
    pub fn set_speed(&mut self, target: f32) {
        let current = self.speed();
        debug_assert!(current > f32::EPSILON, "live ball has zero velocity");
        if current > f32::EPSILON {
            self.vel *= target / current;
        }
    }
}

/// The player's paddle; dimensions are the `PADDLE_*` constants
#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    pub pos: Vec2,
}

impl Paddle {
    /// Paddle centered horizontally, resting just above the bottom edge
    pub fn centered(arena: &ArenaConfig) -> Self {
        Self {
            pos: Vec2::new(
                arena.width / 2.0 - PADDLE_WIDTH / 2.0,
                arena.height - PADDLE_HEIGHT - PADDLE_BOTTOM_MARGIN,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    /// Move the paddle's left edge to `x`, clamped inside the arena
    pub fn set_x(&mut self, x: f32, arena: &ArenaConfig) {
        self.pos.x = x.clamp(0.0, arena.width - PADDLE_WIDTH);
    }
}

/// One grid cell; position is cached at grid creation and never moves
#[derive(Debug, Clone, Copy)]
pub struct Brick {
    pub pos: Vec2,
    pub alive: bool,
    /// Special (yellow) bricks drop a powerup when destroyed
    pub special: bool,
}

/// Fixed brick grid, created once at game start
#[derive(Debug, Clone)]
pub struct BrickGrid {
    pub bricks: Vec<Brick>,
    pub cols: usize,
    pub rows: usize,
    /// Uniform brick dimensions, derived from the arena width
    pub brick_size: Vec2,
}

impl BrickGrid {
    /// Lay out the grid for the given arena, rolling special bricks from `rng`
    pub fn new(arena: &ArenaConfig, cols: usize, rows: usize, rng: &mut Pcg32) -> Self {
        let brick_w = (arena.width
            - 2.0 * BRICK_OFFSET_LEFT
            - (cols as f32 - 1.0) * BRICK_PADDING)
            / cols as f32;
        let brick_size = Vec2::new(brick_w, BRICK_HEIGHT);

        let mut bricks = Vec::with_capacity(cols * rows);
        for c in 0..cols {
            for r in 0..rows {
                let pos = Vec2::new(
                    c as f32 * (brick_w + BRICK_PADDING) + BRICK_OFFSET_LEFT,
                    r as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
                );
                bricks.push(Brick {
                    pos,
                    alive: true,
                    special: rng.random_bool(SPECIAL_BRICK_CHANCE),
                });
            }
        }

        Self {
            bricks,
            cols,
            rows,
            brick_size,
        }
    }

    pub fn total(&self) -> u32 {
        (self.cols * self.rows) as u32
    }

    pub fn rect_of(&self, brick: &Brick) -> Rect {
        Rect::new(brick.pos.x, brick.pos.y, self.brick_size.x, self.brick_size.y)
    }

    pub fn alive_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }
}

/// A falling collectible that splits the primary ball on paddle capture
#[derive(Debug, Clone, Copy)]
pub struct Powerup {
    pub pos: Vec2,
}

impl Powerup {
    /// Spawn centered horizontally under a destroyed brick
    pub fn under_brick(brick_pos: Vec2, brick_width: f32) -> Self {
        Self {
            pos: Vec2::new(
                brick_pos.x + brick_width / 2.0 - POWERUP_SIZE / 2.0,
                brick_pos.y,
            ),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, POWERUP_SIZE, POWERUP_SIZE)
    }
}

/// Complete game state, owned by the frame driver
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: ArenaConfig,
    pub phase: GamePhase,
    pub paddle: Paddle,
    /// The primary ball: present from game start, sole driver of the loss
    /// condition. Kept even while off-screen below the paddle.
    pub ball: Ball,
    /// Split balls; pruned silently when they leave the bottom
    pub extra_balls: Vec<Ball>,
    pub bricks: BrickGrid,
    pub powerups: Vec<Powerup>,
    pub score: u32,
    /// User-selected speed scale (0.5x - 2x), read once per start
    pub speed_multiplier: f32,
}

impl GameState {
    pub fn new(config: ArenaConfig, speed_multiplier: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = BrickGrid::new(&config, BRICK_COLS, BRICK_ROWS, &mut rng);
        let paddle = Paddle::centered(&config);
        let ball = Self::serve_ball(&config, speed_multiplier);

        Self {
            config,
            phase: GamePhase::NotStarted,
            paddle,
            ball,
            extra_balls: Vec::new(),
            bricks,
            powerups: Vec::new(),
            score: 0,
            speed_multiplier,
        }
    }

    /// Primary ball at its serve position, heading up-right
    fn serve_ball(config: &ArenaConfig, speed_multiplier: f32) -> Ball {
        let speed = config.base_speed() * speed_multiplier;
        Ball::new(
            Vec2::new(config.width / 2.0, config.height - 30.0),
            Vec2::new(speed, -speed),
        )
    }

    /// Per-tick ball speed after the user's multiplier
    pub fn ball_speed(&self) -> f32 {
        self.config.base_speed() * self.speed_multiplier
    }

    /// Re-initialize ball and paddle for a (re)start; split balls and
    /// in-flight powerups do not survive the transition
    pub fn reset_ball_and_paddle(&mut self) {
        self.paddle = Paddle::centered(&self.config);
        self.ball = Self::serve_ball(&self.config, self.speed_multiplier);
        self.extra_balls.clear();
        self.powerups.clear();
    }

    /// True once every brick has been destroyed
    pub fn cleared(&self) -> bool {
        self.score == self.bricks.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn arena() -> ArenaConfig {
        ArenaConfig::new(800.0, 600.0)
    }

    #[test]
    fn test_grid_layout_fits_arena() {
        let mut rng = Pcg32::seed_from_u64(1);
        let grid = BrickGrid::new(&arena(), BRICK_COLS, BRICK_ROWS, &mut rng);

        assert_eq!(grid.bricks.len(), BRICK_COLS * BRICK_ROWS);
        for brick in &grid.bricks {
            let r = grid.rect_of(brick);
            assert!(r.x >= BRICK_OFFSET_LEFT - 0.001);
            assert!(r.right() <= arena().width - BRICK_OFFSET_LEFT + 0.001);
            assert!(r.y >= BRICK_OFFSET_TOP - 0.001);
        }
    }

    #[test]
    fn test_special_bricks_deterministic_per_seed() {
        let a = GameState::new(arena(), 1.0, 42);
        let b = GameState::new(arena(), 1.0, 42);
        let specials_a: Vec<bool> = a.bricks.bricks.iter().map(|b| b.special).collect();
        let specials_b: Vec<bool> = b.bricks.bricks.iter().map(|b| b.special).collect();
        assert_eq!(specials_a, specials_b);
    }

    #[test]
    fn test_paddle_clamped_to_arena() {
        let arena = arena();
        let mut paddle = Paddle::centered(&arena);

        paddle.set_x(-50.0, &arena);
        assert_eq!(paddle.pos.x, 0.0);

        paddle.set_x(10_000.0, &arena);
        assert_eq!(paddle.pos.x, arena.width - PADDLE_WIDTH);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching edges do not overlap
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_set_speed_preserves_direction() {
        let mut ball = Ball::new(Vec2::ZERO, Vec2::new(3.0, -4.0));
        ball.set_speed(10.0);
        assert!((ball.speed() - 10.0).abs() < 1e-4);
        assert!((ball.vel.x - 6.0).abs() < 1e-4);
        assert!((ball.vel.y - -8.0).abs() < 1e-4);
    }
}
