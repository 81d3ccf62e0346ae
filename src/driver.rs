//! Frame loop driver
//!
//! Owns the bridge between the host's frame callbacks (wall-clock) and
//! the fixed-timestep simulation. The host calls [`FrameLoop::on_frame`]
//! once per display frame; the driver throttles early frames, steps the
//! sim one tick per accepted frame, dispatches gameplay events to sound
//! and callbacks, and records the replay.

use rand::SeedableRng;

use crate::audio::{AudioService, Sfx};
use crate::consts::*;
use crate::replay::{Replay, ReplayRecorder};
use crate::sim::{
    BrickKind, Difficulty, GameEvent, GameState, LayoutParams, RoundConfig, RoundPhase, TickInput,
    generate_layout, step_paddle, tick,
};

/// Whether the loop is consuming frame callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopStatus {
    #[default]
    Stopped,
    Running,
}

/// Final state of a finished round
#[derive(Debug)]
pub struct RoundOutcome {
    pub win: bool,
    pub score: u64,
    pub coins: u64,
    pub time_bonus: u64,
    /// Present when the round ran long enough to keep
    pub replay: Option<Replay>,
}

/// Host hooks invoked from event dispatch. All optional.
#[derive(Default)]
pub struct RoundCallbacks {
    pub on_score: Option<Box<dyn FnMut(u64)>>,
    /// (value, running total) per collected coin
    pub on_coins: Option<Box<dyn FnMut(u64, u64)>>,
    pub on_life_lost: Option<Box<dyn FnMut(u8)>>,
    pub on_round_over: Option<Box<dyn FnMut(&RoundOutcome)>>,
    /// Receives PaddleMoved/BallMoved for split-screen mirroring
    pub on_mirror: Option<Box<dyn FnMut(&GameEvent)>>,
}

/// What a frame callback did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAdvance {
    /// Frame arrived early or while stopped; render only
    Skipped,
    /// Simulation advanced by this many ticks
    Ticked(u32),
}

pub struct FrameLoop {
    state: GameState,
    config: RoundConfig,
    input: TickInput,
    status: LoopStatus,
    /// A host frame callback is outstanding; cleared on stop so a stale
    /// callback scheduled before the stop is ignored
    pending: bool,
    last_frame_ms: Option<f64>,
    recorder: Option<ReplayRecorder>,
    outcome: Option<RoundOutcome>,
    pub callbacks: RoundCallbacks,
    pub audio: AudioService,
}

impl FrameLoop {
    pub fn new(audio: AudioService) -> Self {
        Self {
            state: GameState::new(0, Difficulty::default(), Vec::new()),
            config: RoundConfig::standard(),
            input: TickInput::default(),
            status: LoopStatus::Stopped,
            pending: false,
            last_frame_ms: None,
            recorder: None,
            outcome: None,
            callbacks: RoundCallbacks::default(),
            audio,
        }
    }

    /// The finished round's outcome, with its replay, once per round
    pub fn take_outcome(&mut self) -> Option<RoundOutcome> {
        self.outcome.take()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Build a fresh round. The loop stays stopped and the sim idles
    /// until [`set_playing`](Self::set_playing).
    pub fn start_round(
        &mut self,
        seed: u64,
        difficulty: Difficulty,
        params: &LayoutParams,
        config: RoundConfig,
    ) {
        let profile = difficulty.profile();
        let mut layout_rng = rand_pcg::Pcg32::seed_from_u64(seed);
        let bricks = generate_layout(params, profile.coin_drop_chance, &mut layout_rng);
        self.state = GameState::new(seed, difficulty, bricks);
        self.config = config;
        self.input = TickInput::default();
        self.status = LoopStatus::Stopped;
        self.pending = false;
        self.last_frame_ms = None;
        self.recorder = Some(ReplayRecorder::new());
        self.outcome = None;
        log::info!(
            "round started: seed={seed} difficulty={difficulty:?} bricks={}",
            self.state.bricks_remaining()
        );
    }

    /// Start or stop consuming frames. Starting from the idle phase
    /// launches the ball.
    pub fn set_playing(&mut self, playing: bool) {
        match (playing, self.status) {
            (true, LoopStatus::Stopped) => {
                self.status = LoopStatus::Running;
                self.last_frame_ms = None;
                if self.state.phase == RoundPhase::Idle {
                    self.state.phase = RoundPhase::Playing;
                    self.audio.play(Sfx::Launch);
                }
            }
            (false, LoopStatus::Running) => {
                self.status = LoopStatus::Stopped;
                // Any frame already scheduled must not step the sim
                self.pending = false;
            }
            _ => {}
        }
    }

    /// Abandon the current round and rebuild it from the same seed
    pub fn reset_round(&mut self, params: &LayoutParams) {
        let seed = self.state.seed;
        let difficulty = self.state.difficulty;
        let config = self.config;
        self.start_round(seed, difficulty, params, config);
    }

    /// Pointer/touch handler target; applied at the next tick boundary
    pub fn move_paddle_to(&mut self, x: f32) {
        self.input.target_x = Some(x.clamp(0.0, PLAYFIELD_W));
    }

    /// Demo mode toggle
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// The host should call this before scheduling a frame callback;
    /// returns false when one is already outstanding.
    pub fn request_frame(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// One host frame callback with the current wall-clock time in ms
    pub fn on_frame(&mut self, now_ms: f64) -> FrameAdvance {
        self.pending = false;

        if self.status != LoopStatus::Running {
            // Render-only pass: no physics, but the paddle still tracks
            // pointer input so it does not freeze while paused
            if self.state.phase != RoundPhase::Over {
                step_paddle(&mut self.state, &self.input);
            }
            return FrameAdvance::Skipped;
        }

        // High-refresh displays call faster than the sim rate; a frame
        // arriving early is render-only
        if let Some(last) = self.last_frame_ms
            && now_ms - last < FRAME_INTERVAL_MS
        {
            return FrameAdvance::Skipped;
        }
        self.last_frame_ms = Some(now_ms);

        // Exactly one physics step per processed frame; a long wall-clock
        // gap (hidden tab, debugger) never fast-forwards the sim
        tick(&mut self.state, &self.input, &self.config);

        if let Some(rec) = &mut self.recorder {
            rec.capture(now_ms, &self.state);
        }

        self.dispatch_events(now_ms);
        FrameAdvance::Ticked(1)
    }

    /// Drain sim events into sound and host callbacks
    fn dispatch_events(&mut self, now_ms: f64) {
        for event in self.state.drain_events() {
            match &event {
                GameEvent::BrickDestroyed { kind, .. } => {
                    self.audio.play(match kind {
                        BrickKind::Explosive => Sfx::Explosion,
                        _ => Sfx::BrickBreak,
                    });
                }
                GameEvent::CoinCollected { value, total } => {
                    self.audio.play(Sfx::CoinCollect);
                    if let Some(cb) = &mut self.callbacks.on_coins {
                        cb(*value, *total);
                    }
                }
                GameEvent::PowerUpCollected { .. } => self.audio.play(Sfx::PowerUpCollect),
                GameEvent::ShieldConsumed => self.audio.play(Sfx::ShieldPop),
                GameEvent::WallBounce => self.audio.play(Sfx::WallHit),
                GameEvent::PaddleBounce => self.audio.play(Sfx::PaddleHit),
                GameEvent::BrickCracked { .. } => self.audio.play(Sfx::BrickHit),
                GameEvent::ScoreChanged { score } => {
                    if let Some(cb) = &mut self.callbacks.on_score {
                        cb(*score);
                    }
                }
                GameEvent::LifeLost { lives_left } => {
                    self.audio.play(Sfx::LifeLost);
                    if let Some(cb) = &mut self.callbacks.on_life_lost {
                        cb(*lives_left);
                    }
                }
                GameEvent::PaddleMoved { .. } | GameEvent::BallMoved { .. } => {
                    if let Some(cb) = &mut self.callbacks.on_mirror {
                        cb(&event);
                    }
                }
                GameEvent::RoundOver {
                    win,
                    score,
                    coins,
                    time_bonus,
                } => {
                    self.audio.play(if *win { Sfx::Victory } else { Sfx::GameOver });
                    self.status = LoopStatus::Stopped;
                    self.pending = false;
                    let replay = self
                        .recorder
                        .take()
                        .and_then(|rec| rec.finish(&self.state, *win, now_ms));
                    let outcome = RoundOutcome {
                        win: *win,
                        score: *score,
                        coins: *coins,
                        time_bonus: *time_bonus,
                        replay,
                    };
                    if let Some(cb) = &mut self.callbacks.on_round_over {
                        cb(&outcome);
                    }
                    self.outcome = Some(outcome);
                }
            }
        }
    }
}
