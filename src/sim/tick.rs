//! Per-tick simulation update
//!
//! One call to `tick` advances the whole game by a single frame: brick
//! collisions for every live ball, powerup fall/capture, ball splitting,
//! wall/paddle response, position integration, pruning, and the terminal
//! win/loss transitions. The caller owns the cadence (requestAnimationFrame
//! on the web, a plain loop in headless runs).

use glam::Vec2;

use super::collision::{collide_bricks, collide_paddle, collide_walls};
use super::state::{ArenaConfig, Ball, GamePhase, GameState, Paddle, Powerup};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Target paddle left-edge x, already translated from pointer/touch/keys
    pub target_x: Option<f32>,
    /// Start signal (UI affordance); only honored while not started
    pub start: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase.is_over() {
        return;
    }

    // Paddle tracks input even before the start signal, matching the
    // pointer-follow behavior of the attract screen
    if let Some(x) = input.target_x {
        let arena = state.config;
        state.paddle.set_x(x, &arena);
    }

    match state.phase {
        GamePhase::NotStarted => {
            if input.start {
                state.reset_ball_and_paddle();
                state.phase = GamePhase::Running;
                log::info!(
                    "game started: {} bricks, speed x{}",
                    state.bricks.total(),
                    state.speed_multiplier
                );
            }
        }
        GamePhase::Running => run_frame(state),
        GamePhase::Won | GamePhase::Lost => {}
    }
}

fn run_frame(state: &mut GameState) {
    // Brick pass first; a win ends the frame with no further motion
    if resolve_brick_collisions(state) {
        state.phase = GamePhase::Won;
        log::info!("all {} bricks cleared - you win", state.score);
        return;
    }

    update_powerups(state);

    // Primary ball: keeps integrating even below the paddle, so a split ball
    // can carry the game while it is off-screen
    step_ball(&mut state.ball, &state.paddle, &state.config);

    // Split balls: out-of-bounds ones drop out silently, the rest step.
    // retain_mut keeps removal safe while iterating in place.
    let arena = state.config;
    let paddle = state.paddle;
    state.extra_balls.retain_mut(|ball| {
        if ball.pos.y + BALL_RADIUS > arena.height {
            return false;
        }
        step_ball(ball, &paddle, &arena);
        true
    });

    // Loss is driven by the primary ball alone; split balls only postpone it
    if state.ball.pos.y + BALL_RADIUS > arena.height && state.extra_balls.is_empty() {
        state.phase = GamePhase::Lost;
        log::info!("primary ball lost with no splits left - game over");
    }
}

/// Run the brick pass for every live ball, apply scoring and powerup spawns.
/// Returns true when the grid is cleared.
fn resolve_brick_collisions(state: &mut GameState) -> bool {
    let mut hits = Vec::new();
    if let Some(hit) = collide_bricks(&mut state.ball, &mut state.bricks) {
        hits.push(hit);
    }
    for ball in &mut state.extra_balls {
        if let Some(hit) = collide_bricks(ball, &mut state.bricks) {
            hits.push(hit);
        }
    }

    let brick_width = state.bricks.brick_size.x;
    for hit in hits {
        state.score += 1;
        if hit.special {
            state.powerups.push(Powerup::under_brick(hit.pos, brick_width));
            log::debug!("special brick at {:?} dropped a powerup", hit.pos);
        }
    }

    state.cleared()
}

/// Advance powerups: fall, capture (split), or drop off the bottom
fn update_powerups(state: &mut GameState) {
    let paddle_rect = state.paddle.rect();
    let height = state.config.height;

    let mut captured = 0u32;
    state.powerups.retain_mut(|p| {
        p.pos.y += POWERUP_FALL_SPEED;
        if p.rect().overlaps(&paddle_rect) {
            captured += 1;
            false
        } else {
            // Past the bottom without capture: discard, no penalty
            p.pos.y <= height
        }
    });

    for _ in 0..captured {
        split_primary_ball(state);
    }
}

/// Spawn two split balls at the primary ball's position, moving upward and
/// outward at 0.7x the primary's current speed. The primary is unaffected.
fn split_primary_ball(state: &mut GameState) {
    let speed = state.ball.speed();
    debug_assert!(speed > f32::EPSILON, "live ball has zero velocity");
    // Zero speed cannot be scaled; fall back to the configured serve speed
    let speed = if speed > f32::EPSILON {
        speed
    } else {
        state.ball_speed()
    };
    let split_speed = speed * SPLIT_SPEED_SCALE;

    let pos = state.ball.pos;
    for dir_x in [-1.0f32, 1.0] {
        let dir = Vec2::new(dir_x, -1.0).normalize();
        state.extra_balls.push(Ball::new(pos, dir * split_speed));
    }
    log::debug!(
        "powerup captured: {} balls in play",
        state.extra_balls.len() + 1
    );
}

/// Wall and paddle response for one ball, then position integration
fn step_ball(ball: &mut Ball, paddle: &Paddle, arena: &ArenaConfig) {
    collide_walls(ball, arena);
    collide_paddle(ball, paddle);
    ball.pos += ball.vel;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game() -> GameState {
        GameState::new(ArenaConfig::new(800.0, 600.0), 1.0, 42)
    }

    /// Park the primary ball mid-air so it neither hits bricks nor falls out
    fn park_primary(state: &mut GameState) {
        state.ball.pos = Vec2::new(400.0, 400.0);
        state.ball.vel = Vec2::new(0.0, 0.0001);
    }

    /// Place the primary ball just under the first alive brick, moving up
    fn aim_at_next_brick(state: &mut GameState) {
        let brick = state
            .bricks
            .bricks
            .iter()
            .find(|b| b.alive)
            .copied()
            .expect("a brick is alive");
        let rect = state.bricks.rect_of(&brick);
        state.ball.pos = Vec2::new(rect.x + rect.w / 2.0, rect.bottom() + BALL_RADIUS - 2.0);
        state.ball.vel = Vec2::new(0.0, -2.0);
    }

    #[test]
    fn test_start_transition() {
        let mut state = new_game();
        assert_eq!(state.phase, GamePhase::NotStarted);

        // No physics before start: the ball does not move
        let before = state.ball.pos;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.ball.pos, before);

        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.extra_balls.is_empty());
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_paddle_follows_target_before_start() {
        let mut state = new_game();
        tick(
            &mut state,
            &TickInput {
                target_x: Some(123.0),
                ..Default::default()
            },
        );
        assert_eq!(state.paddle.pos.x, 123.0);
    }

    #[test]
    fn test_full_clear_wins_without_powerups() {
        let mut state = new_game();
        for brick in &mut state.bricks.bricks {
            brick.special = false;
        }
        tick(&mut state, &TickInput { start: true, ..Default::default() });

        let total = state.bricks.total();
        for _ in 0..total {
            aim_at_next_brick(&mut state);
            tick(&mut state, &TickInput::default());
        }

        assert_eq!(state.score, total);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.powerups.is_empty());

        // Terminal: further ticks change nothing
        let ball_before = state.ball.pos;
        let score_before = state.score;
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.ball.pos, ball_before);
        assert_eq!(state.score, score_before);
    }

    #[test]
    fn test_special_brick_drops_one_powerup() {
        let mut state = new_game();
        for brick in &mut state.bricks.bricks {
            brick.special = false;
        }
        state.bricks.bricks[0].special = true;
        tick(&mut state, &TickInput { start: true, ..Default::default() });

        aim_at_next_brick(&mut state);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 1);
        assert_eq!(state.powerups.len(), 1);
        // Centered horizontally under the brick, at the brick's y (plus the
        // first tick of fall)
        let brick_pos = state.bricks.bricks[0].pos;
        let expected_x = brick_pos.x + state.bricks.brick_size.x / 2.0 - POWERUP_SIZE / 2.0;
        assert!((state.powerups[0].pos.x - expected_x).abs() < 1e-4);
        assert!((state.powerups[0].pos.y - (brick_pos.y + POWERUP_FALL_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_powerup_capture_splits_primary() {
        let mut state = new_game();
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        park_primary(&mut state);
        state.ball.vel = Vec2::new(2.0, -3.0);
        let primary_speed = state.ball.speed();

        // Powerup one tick of fall above the paddle surface
        state.powerups.push(Powerup {
            pos: Vec2::new(
                state.paddle.pos.x + 10.0,
                state.paddle.pos.y - POWERUP_SIZE + 1.0,
            ),
        });
        tick(&mut state, &TickInput::default());

        assert!(state.powerups.is_empty());
        assert_eq!(state.extra_balls.len(), 2);
        for ball in &state.extra_balls {
            assert!((ball.speed() - primary_speed * SPLIT_SPEED_SCALE).abs() < 1e-3);
            assert!(ball.vel.y < 0.0);
        }
        // Symmetric about vertical: one left, one right
        assert!(state.extra_balls[0].vel.x < 0.0);
        assert!(state.extra_balls[1].vel.x > 0.0);
        // Primary keeps its trajectory
        assert!((state.ball.speed() - primary_speed).abs() < 1e-4);
    }

    #[test]
    fn test_uncaptured_powerup_falls_out_without_split() {
        let mut state = new_game();
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        park_primary(&mut state);

        // Far from the paddle horizontally, just above the bottom edge
        let cfg = state.config;
        state.paddle.set_x(0.0, &cfg);
        state.powerups.push(Powerup {
            pos: Vec2::new(700.0, state.config.height - 1.0),
        });
        tick(&mut state, &TickInput::default());

        assert!(state.powerups.is_empty());
        assert!(state.extra_balls.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_split_ball_pruned_silently() {
        let mut state = new_game();
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        park_primary(&mut state);

        state.extra_balls.push(Ball::new(
            Vec2::new(300.0, state.config.height + 10.0),
            Vec2::new(1.0, 2.0),
        ));
        state.extra_balls.push(Ball::new(
            Vec2::new(500.0, 300.0),
            Vec2::new(1.0, -2.0),
        ));
        tick(&mut state, &TickInput::default());

        assert_eq!(state.extra_balls.len(), 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_loss_requires_primary_out_and_no_splits() {
        let mut state = new_game();
        tick(&mut state, &TickInput { start: true, ..Default::default() });

        // Primary below the bottom, one split ball still live: no loss
        state.ball.pos = Vec2::new(400.0, state.config.height + 50.0);
        state.ball.vel = Vec2::new(0.0, 2.0);
        state.extra_balls.push(Ball::new(
            Vec2::new(400.0, 300.0),
            Vec2::new(1.0, -2.0),
        ));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Running);

        // Last split ball gone: the primary's exit now ends the game
        state.extra_balls.clear();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Lost);

        // Terminal: even a start signal does not revive it
        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Lost);
    }
}
