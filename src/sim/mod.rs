//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (vecs, never hash maps)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fx;
pub mod layout;
pub mod powerups;
pub mod state;
pub mod tick;

pub use collision::{ContactAxis, circle_rect_overlap, contact_axis, paddle_bounce_velocity};
pub use fx::{FxState, Particle, ParticleKind};
pub use layout::{BrickPattern, Difficulty, DifficultyProfile, LayoutParams, generate_layout};
pub use powerups::{ActiveEffects, PowerUpKind};
pub use state::{
    Ball, Brick, BrickKind, Coin, GameEvent, GameState, Paddle, Pickup, RoundPhase,
};
pub use tick::{RoundConfig, TickInput, step_paddle, tick};
