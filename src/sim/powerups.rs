//! Power-up lifecycle management
//!
//! Each type runs Inactive -> Active -> Inactive. Fixed-duration effects
//! refresh their timer on re-collection instead of stacking; reverts are
//! exact (the pre-activation value / applied multiplier is stored, never
//! re-derived). Multi-ball has no timer - it persists while extra balls
//! exist.

use rand::Rng;

use super::state::{Ball, GameState};
use crate::clamp_speed;
use crate::consts::*;

/// Power-up pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    MultiBall,
    WidePaddle,
    SlowBall,
    Shield,
}

impl PowerUpKind {
    /// Draw a uniformly random pickup type from the round RNG
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..4u32) {
            0 => PowerUpKind::MultiBall,
            1 => PowerUpKind::WidePaddle,
            2 => PowerUpKind::SlowBall,
            _ => PowerUpKind::Shield,
        }
    }
}

/// Active timed-effect state. At most one active instance per type.
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    /// Remaining wide-paddle ticks (0 = inactive)
    pub wide_ticks: u32,
    /// Paddle width before widening; restored exactly on expiry
    pub wide_base: Option<f32>,
    /// Remaining slow-ball ticks (0 = inactive)
    pub slow_ticks: u32,
    /// The multiplier actually applied at activation, inverted on expiry
    pub slow_factor: Option<f32>,
    /// One-shot shield, consumed as a unit on a bottom-boundary save
    pub shield: bool,
}

impl ActiveEffects {
    pub fn wide_active(&self) -> bool {
        self.wide_ticks > 0
    }

    pub fn slow_active(&self) -> bool {
        self.slow_ticks > 0
    }
}

/// Activate a collected power-up on the running state
pub fn activate(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::MultiBall => {
            let room = MAX_EXTRA_BALLS.saturating_sub(state.extra_balls.len());
            let spawn = MULTIBALL_SPAWN.min(room);
            if spawn == 0 {
                log::debug!("multi-ball pickup at extra-ball cap, consumed with no effect");
                return;
            }
            // Split off the primary ball at fixed angular offsets
            let src = state.ball;
            for i in 0..spawn {
                let offset: f32 = if i % 2 == 0 { 0.5 } else { -0.5 };
                let (sin, cos) = offset.sin_cos();
                let vel = glam::Vec2::new(
                    src.vel.x * cos - src.vel.y * sin,
                    src.vel.x * sin + src.vel.y * cos,
                );
                state.extra_balls.push(Ball {
                    pos: src.pos,
                    vel: clamp_speed(vel),
                    radius: BALL_RADIUS,
                });
            }
        }
        PowerUpKind::WidePaddle => {
            // First activation stores the base width; re-activation only
            // refreshes the timer. Width is always base * factor, so
            // repeated pickups cannot compound past the cap.
            if state.effects.wide_base.is_none() {
                state.effects.wide_base = Some(state.paddle.width);
                state.paddle.width = state.paddle.width * WIDE_PADDLE_FACTOR;
            }
            state.effects.wide_ticks = WIDE_PADDLE_TICKS;
        }
        PowerUpKind::SlowBall => {
            if state.effects.slow_factor.is_none() {
                state.effects.slow_factor = Some(SLOW_BALL_FACTOR);
                state.ball.vel = clamp_speed(state.ball.vel * SLOW_BALL_FACTOR);
                for ball in &mut state.extra_balls {
                    ball.vel = clamp_speed(ball.vel * SLOW_BALL_FACTOR);
                }
            }
            state.effects.slow_ticks = SLOW_BALL_TICKS;
        }
        PowerUpKind::Shield => {
            state.effects.shield = true;
        }
    }
}

/// Advance effect timers by one tick, reverting expired effects exactly
pub fn update(state: &mut GameState) {
    if state.effects.wide_ticks > 0 {
        state.effects.wide_ticks -= 1;
        if state.effects.wide_ticks == 0 {
            if let Some(base) = state.effects.wide_base.take() {
                state.paddle.width = base;
            }
        }
    }

    if state.effects.slow_ticks > 0 {
        state.effects.slow_ticks -= 1;
        if state.effects.slow_ticks == 0 {
            if let Some(factor) = state.effects.slow_factor.take() {
                // Invert exactly what was applied, then re-clamp
                state.ball.vel = clamp_speed(state.ball.vel / factor);
                for ball in &mut state.extra_balls {
                    ball.vel = clamp_speed(ball.vel / factor);
                }
            }
        }
    }
}
