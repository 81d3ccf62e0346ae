//! Game state and core simulation types
//!
//! The entity state store. Everything mutable in a round lives here and is
//! written only by `sim::tick`; the render pass reads it and never writes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::layout::{Difficulty, DifficultyProfile};
use super::powerups::{ActiveEffects, PowerUpKind};
use crate::consts::*;
use crate::launch_velocity;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Round initialized, ball waiting; paddle still tracks input visually
    Idle,
    /// Active gameplay
    Playing,
    /// Round finished (win or loss); terminal
    Over,
}

/// A ball entity. The primary ball costs a life when it exits the bottom;
/// extra balls from multi-ball are removed silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn at_start(vel: Vec2) -> Self {
        Self {
            pos: Vec2::new(BALL_START_X, BALL_START_Y),
            vel,
            radius: BALL_RADIUS,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle. Input handlers write `target_x` only; the tick
/// moves `x` toward it at `speed` pixels per tick.
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Center x
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub target_x: f32,
}

impl Paddle {
    pub fn new(speed: f32) -> Self {
        Self {
            x: PLAYFIELD_W / 2.0,
            y: PADDLE_Y,
            width: PADDLE_W,
            height: PADDLE_H,
            speed,
            target_x: PLAYFIELD_W / 2.0,
        }
    }

    pub fn half_width(&self) -> f32 {
        // Width can transiently hit zero during a power-up revert; never
        // let the hit-offset division see it.
        (self.width / 2.0).max(f32::EPSILON)
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x - self.width / 2.0, self.y - self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Step toward `target_x`, clamped so the paddle stays in the playfield
    pub fn step(&mut self) -> bool {
        let target = self
            .target_x
            .clamp(self.width / 2.0, PLAYFIELD_W - self.width / 2.0);
        let delta = (target - self.x).clamp(-self.speed, self.speed);
        if delta.abs() < f32::EPSILON {
            return false;
        }
        self.x += delta;
        true
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrickKind {
    #[default]
    Normal,
    /// Requires two hits before deactivating
    Strong,
    /// Takes its neighbors with it when destroyed
    Explosive,
}

/// A brick entity. Created at round init, mutated only by collision
/// resolution, never resurrected.
#[derive(Debug, Clone)]
pub struct Brick {
    pub col: u32,
    pub row: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub hits_left: u8,
    pub active: bool,
    pub has_coin: bool,
}

impl Brick {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A falling coin spawned at a destroyed brick's center
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    pub pos: Vec2,
    pub value: u64,
}

/// A falling power-up pickup
#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// Gameplay events raised by the physics engine, drained each frame by the
/// loop driver and forwarded to the external callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BrickDestroyed { pos: Vec2, kind: BrickKind },
    CoinCollected { value: u64, total: u64 },
    PowerUpCollected { kind: PowerUpKind },
    LifeLost { lives_left: u8 },
    ShieldConsumed,
    /// Ball reflected off a side or top wall
    WallBounce,
    /// Ball reflected off the paddle
    PaddleBounce,
    /// Strong brick took a non-breaking hit
    BrickCracked { pos: Vec2 },
    ScoreChanged { score: u64 },
    PaddleMoved { x: f32 },
    BallMoved { pos: Vec2 },
    RoundOver { win: bool, score: u64, coins: u64, time_bonus: u64 },
}

/// Complete per-round simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub difficulty: Difficulty,
    pub profile: DifficultyProfile,
    pub phase: RoundPhase,
    /// Simulation tick counter
    pub tick: u64,
    pub ball: Ball,
    pub extra_balls: Vec<Ball>,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    pub coins: Vec<Coin>,
    pub pickups: Vec<Pickup>,
    pub effects: ActiveEffects,
    pub fx: super::fx::FxState,
    pub score: u64,
    pub coins_collected: u64,
    pub lives: u8,
    /// Current combo multiplier (0 until the first brick breaks)
    pub combo: u32,
    /// Tick-derived timestamp of the last brick destruction
    pub last_break_ms: Option<f64>,
    /// Events pending for the driver, appended in tick order
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh round from a difficulty profile and a brick layout
    pub fn new(seed: u64, difficulty: Difficulty, bricks: Vec<Brick>) -> Self {
        let profile = difficulty.profile();
        let mut rng = Pcg32::seed_from_u64(seed);
        let angle = rng.random_range(-LAUNCH_CONE..LAUNCH_CONE);
        let ball = Ball::at_start(launch_velocity(angle, profile.ball_speed));

        Self {
            seed,
            difficulty,
            profile,
            phase: RoundPhase::Idle,
            tick: 0,
            ball,
            extra_balls: Vec::new(),
            paddle: Paddle::new(profile.paddle_speed),
            bricks,
            coins: Vec::new(),
            pickups: Vec::new(),
            effects: ActiveEffects::default(),
            fx: super::fx::FxState::default(),
            score: 0,
            coins_collected: 0,
            lives: START_LIVES,
            combo: 0,
            last_break_ms: None,
            events: Vec::new(),
            rng,
        }
    }

    /// Elapsed simulation time in milliseconds (tick-derived, deterministic)
    pub fn time_ms(&self) -> f64 {
        self.tick as f64 * TICK_MS
    }

    /// Respawn the primary ball with a fresh randomized upward launch
    pub fn respawn_ball(&mut self) {
        let angle = self.rng.random_range(-LAUNCH_CONE..LAUNCH_CONE);
        self.ball = Ball::at_start(launch_velocity(angle, self.profile.ball_speed));
        self.fx.clear_trail();
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.active).count()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the pending events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
