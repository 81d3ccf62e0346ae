//! Brickwave - a brick breaker arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `driver`: Frame loop driver and outbound event callbacks
//! - `replay`: Time-sampled replay capture, storage, and playback
//! - `render`: Pure read-only render pass producing a display list
//! - `cosmetics`: Equipped-item lookup with graceful fallbacks
//! - `audio`: Explicitly constructed audio service
//! - `settings`: Effect toggles and quality presets

pub mod audio;
pub mod cosmetics;
pub mod driver;
pub mod render;
pub mod replay;
pub mod settings;
pub mod sim;

pub use audio::{AudioService, Sfx};
pub use cosmetics::{CosmeticSlot, EquippedCosmetics, Rarity};
pub use driver::{FrameLoop, LoopStatus, RoundCallbacks, RoundOutcome};
pub use replay::{Replay, ReplayPlayback, ReplayRecorder, ReplayStore};
pub use settings::{QualityPreset, Settings};
pub use sim::{Difficulty, GameEvent, GameState, RoundConfig, TickInput};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Duration of one simulation tick in milliseconds (~60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Frames arriving faster than this are skipped by the loop driver
    pub const FRAME_INTERVAL_MS: f64 = 16.0;

    /// Playfield dimensions (origin top-left, +y down)
    pub const PLAYFIELD_W: f32 = 800.0;
    pub const PLAYFIELD_H: f32 = 600.0;

    /// Ball defaults - velocities are pixels per tick
    pub const BALL_RADIUS: f32 = 8.0;
    pub const MIN_BALL_SPEED: f32 = 1.5;
    pub const MAX_BALL_SPEED: f32 = 9.0;
    /// Respawn position after a life is lost
    pub const BALL_START_X: f32 = PLAYFIELD_W / 2.0;
    pub const BALL_START_Y: f32 = 400.0;
    /// Half-angle of the randomized upward launch cone (radians)
    pub const LAUNCH_CONE: f32 = 0.6;

    /// Paddle defaults - `x` is the paddle center
    pub const PADDLE_W: f32 = 100.0;
    pub const PADDLE_H: f32 = 14.0;
    pub const PADDLE_Y: f32 = 560.0;
    /// Maximum outgoing angle from vertical on a paddle hit (~54 degrees)
    pub const PADDLE_MAX_BOUNCE: f32 = 0.942_478;

    /// Brick grid defaults
    pub const BRICK_H: f32 = 24.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_TOP_MARGIN: f32 = 60.0;
    pub const STRONG_BRICK_HITS: u8 = 2;

    /// Falling entity speed (coins and power-up pickups), pixels per tick
    pub const FALL_SPEED: f32 = 2.5;
    pub const COIN_RADIUS: f32 = 7.0;
    pub const PICKUP_RADIUS: f32 = 10.0;

    /// Scoring
    pub const BRICK_BASE_POINTS: u64 = 10;
    pub const COMBO_WINDOW_MS: f64 = 1000.0;
    pub const COMBO_CAP: u32 = 10;
    /// Bonus points per second left on the clock in timed rounds
    pub const TIME_BONUS_PER_SEC: u64 = 10;

    /// Power-ups
    pub const POWERUP_DROP_CHANCE: f32 = 0.12;
    pub const WIDE_PADDLE_FACTOR: f32 = 1.5;
    pub const WIDE_PADDLE_TICKS: u32 = 600;
    pub const SLOW_BALL_FACTOR: f32 = 0.6;
    pub const SLOW_BALL_TICKS: u32 = 360;
    /// Extra balls alive at once (multi-ball stacking cap)
    pub const MAX_EXTRA_BALLS: usize = 4;
    /// Balls added per multi-ball pickup
    pub const MULTIBALL_SPAWN: usize = 2;

    /// Lives at round start
    pub const START_LIVES: u8 = 3;
}

/// Clamp a velocity's magnitude into the legal speed band.
///
/// A zero-length (or NaN) velocity falls back to straight up at minimum
/// speed instead of propagating NaN through subsequent frames.
pub fn clamp_speed(vel: Vec2) -> Vec2 {
    use consts::{MAX_BALL_SPEED, MIN_BALL_SPEED};

    let speed = vel.length();
    if !speed.is_finite() || speed < f32::EPSILON {
        return Vec2::new(0.0, -MIN_BALL_SPEED);
    }
    if speed < MIN_BALL_SPEED {
        vel / speed * MIN_BALL_SPEED
    } else if speed > MAX_BALL_SPEED {
        vel / speed * MAX_BALL_SPEED
    } else {
        vel
    }
}

/// Convert a launch angle (radians, measured from straight up) to a velocity
#[inline]
pub fn launch_velocity(angle_from_up: f32, speed: f32) -> Vec2 {
    // +y is down, so "up" is -y
    Vec2::new(angle_from_up.sin(), -angle_from_up.cos()) * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_clamp_speed_band() {
        let slow = clamp_speed(Vec2::new(0.1, 0.1));
        assert!((slow.length() - MIN_BALL_SPEED).abs() < 1e-4);

        let fast = clamp_speed(Vec2::new(50.0, -30.0));
        assert!((fast.length() - MAX_BALL_SPEED).abs() < 1e-4);

        let ok = Vec2::new(2.0, -2.0);
        assert_eq!(clamp_speed(ok), ok);
    }

    #[test]
    fn test_clamp_speed_degenerate() {
        let v = clamp_speed(Vec2::ZERO);
        assert!(v.y < 0.0);
        assert!((v.length() - MIN_BALL_SPEED).abs() < 1e-4);

        let v = clamp_speed(Vec2::new(f32::NAN, 0.0));
        assert!(v.x.is_finite() && v.y.is_finite());
    }

    #[test]
    fn test_launch_velocity_points_up() {
        for angle in [-LAUNCH_CONE, -0.2, 0.0, 0.2, LAUNCH_CONE] {
            let v = launch_velocity(angle, 3.0);
            assert!(v.y < 0.0, "launch at {angle} must move upward");
            assert!((v.length() - 3.0).abs() < 1e-4);
        }
    }
}
