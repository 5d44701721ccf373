//! Collision detection and response
//!
//! Walls and bricks are axis-aligned, so everything here is AABB tests plus
//! per-axis velocity inversion. The one piece of real response math is the
//! paddle rebound, which maps the horizontal hit point to an exit angle while
//! conserving the ball's speed.
//!
//! Brick overlap resolution uses the axis-overlap-depth policy: the velocity
//! component inverted is the one on the axis with the smaller penetration.

use glam::Vec2;

use super::state::{ArenaConfig, Ball, BrickGrid, Paddle};
use crate::consts::*;

/// Side effects of destroying a brick, reported to the lifecycle pass
#[derive(Debug, Clone, Copy)]
pub struct BrickHit {
    /// Top-left corner of the destroyed brick
    pub pos: Vec2,
    /// True if the brick drops a powerup
    pub special: bool,
}

/// Bounce the ball off the side and ceiling walls.
///
/// After the response the ball's bounding box lies within `[0, width]`
/// horizontally and below `y = 0`; position is corrected along with the
/// velocity so a deep penetration cannot re-trigger next tick.
pub fn collide_walls(ball: &mut Ball, arena: &ArenaConfig) {
    if ball.pos.x + BALL_RADIUS > arena.width || ball.pos.x - BALL_RADIUS < 0.0 {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.pos.x.clamp(BALL_RADIUS, arena.width - BALL_RADIUS);
    }
    if ball.pos.y - BALL_RADIUS < 0.0 {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.pos.y.max(BALL_RADIUS);
    }
}

/// Map the normalized paddle hit point (0 = left edge, 1 = right edge) to a
/// rebound angle measured from the positive x axis.
///
/// Piecewise linear: left half interpolates 150 deg -> 90 deg, right half
/// 90 deg -> 30 deg. Center hits go straight up, edge hits leave shallow.
pub fn rebound_angle(hit_point: f32) -> f32 {
    use std::f32::consts::FRAC_PI_2;
    let t = hit_point.clamp(0.0, 1.0);
    if t <= 0.5 {
        REBOUND_MAX_ANGLE - (t * 2.0) * (REBOUND_MAX_ANGLE - FRAC_PI_2)
    } else {
        FRAC_PI_2 - ((t - 0.5) * 2.0) * (FRAC_PI_2 - REBOUND_MIN_ANGLE)
    }
}

/// Deflect the ball off the paddle if its bottom edge is inside the paddle's
/// vertical band and its center is within the paddle span.
///
/// The rebound conserves speed magnitude and always sends the ball upward.
/// Returns true if a bounce happened.
pub fn collide_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    let bottom = ball.pos.y + BALL_RADIUS;
    let in_band = bottom >= paddle.pos.y && bottom < paddle.pos.y + PADDLE_HEIGHT;
    if !in_band {
        return false;
    }
    let in_span =
        ball.pos.x > paddle.pos.x && ball.pos.x < paddle.pos.x + PADDLE_WIDTH;
    if !in_span {
        return false;
    }

    let hit_point = (ball.pos.x - paddle.pos.x) / PADDLE_WIDTH;
    let angle = rebound_angle(hit_point);
    let speed = ball.speed();
    debug_assert!(speed > f32::EPSILON, "live ball has zero velocity");
    if speed <= f32::EPSILON {
        return false;
    }

    ball.vel.x = speed * angle.cos();
    ball.vel.y = -(speed * angle.sin()).abs();
    true
}

/// Test one ball against every active brick, resolving at most one hit.
///
/// On overlap the smaller-penetration axis decides which velocity component
/// inverts, the brick is marked destroyed, and scanning stops for this ball.
pub fn collide_bricks(ball: &mut Ball, grid: &mut BrickGrid) -> Option<BrickHit> {
    let ball_box = ball.bounds();
    let brick_size = grid.brick_size;

    for brick in grid.bricks.iter_mut().filter(|b| b.alive) {
        let bx = brick.pos.x;
        let by = brick.pos.y;
        let hit = ball_box.x < bx + brick_size.x
            && ball_box.right() > bx
            && ball_box.y < by + brick_size.y
            && ball_box.bottom() > by;
        if !hit {
            continue;
        }

        let overlap_x = (ball_box.right() - bx).min(bx + brick_size.x - ball_box.x);
        let overlap_y = (ball_box.bottom() - by).min(by + brick_size.y - ball_box.y);
        if overlap_x < overlap_y {
            ball.vel.x = -ball.vel.x;
        } else {
            ball.vel.y = -ball.vel.y;
        }

        brick.alive = false;
        return Some(BrickHit {
            pos: brick.pos,
            special: brick.special,
        });
    }

    None
}
