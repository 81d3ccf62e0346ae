//! Replay capture, storage, and playback
//!
//! Replays are sampled on a wall-clock interval, independent of the
//! simulation tick rate, and persisted as JSON. The store keeps the
//! top replays by final score.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{Difficulty, GameState};

/// Sampling interval in wall-clock ms
pub const CAPTURE_INTERVAL_MS: f64 = 100.0;
/// Hard cap on captured frames (two minutes at the sampling rate)
pub const MAX_CAPTURED_FRAMES: usize = 1200;
/// A round shorter than this is not worth keeping
pub const MIN_REPLAY_FRAMES: usize = 10;
/// Maximum number of stored replays
pub const MAX_REPLAYS: usize = 10;

/// One sampled snapshot of the visible round state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Wall-clock ms since capture started
    pub t_ms: f64,
    pub ball_pos: Vec2,
    pub paddle_x: f32,
    pub score: u64,
    pub lives: u8,
    /// Active flag per brick, layout order
    pub bricks: Vec<bool>,
}

/// A finished recording
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replay {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub final_score: u64,
    pub total_coins: u64,
    pub win: bool,
    /// Host clock reading (ms) when the round ended, in whatever epoch
    /// the host feeds to the frame loop
    pub timestamp: f64,
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    pub fn duration_ms(&self) -> f64 {
        self.frames.last().map(|f| f.t_ms).unwrap_or(0.0)
    }
}

/// Captures frames during a live round
#[derive(Debug, Default)]
pub struct ReplayRecorder {
    frames: Vec<ReplayFrame>,
    last_capture_ms: Option<f64>,
    base_ms: Option<f64>,
}

impl ReplayRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the state if the interval has elapsed since the last sample.
    /// `now_ms` is wall-clock time; the first call always captures.
    pub fn capture(&mut self, now_ms: f64, state: &GameState) {
        let due = match self.last_capture_ms {
            None => true,
            Some(last) => now_ms - last >= CAPTURE_INTERVAL_MS,
        };
        if !due {
            return;
        }
        self.last_capture_ms = Some(now_ms);

        let t_ms = match self.base_ms {
            Some(base) => now_ms - base,
            None => {
                self.base_ms = Some(now_ms);
                0.0
            }
        };

        // At capacity the oldest frame rolls off; offsets stay as recorded
        // so playback of a truncated replay starts mid-round
        if self.frames.len() >= MAX_CAPTURED_FRAMES {
            self.frames.remove(0);
        }
        self.frames.push(ReplayFrame {
            t_ms,
            ball_pos: state.ball.pos,
            paddle_x: state.paddle.x,
            score: state.score,
            lives: state.lives,
            bricks: state.bricks.iter().map(|b| b.active).collect(),
        });
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Finish recording. Returns None when too short to keep.
    pub fn finish(
        self,
        state: &GameState,
        win: bool,
        timestamp: f64,
    ) -> Option<Replay> {
        if self.frames.len() < MIN_REPLAY_FRAMES {
            log::debug!("replay discarded, only {} frames", self.frames.len());
            return None;
        }
        Some(Replay {
            seed: state.seed,
            difficulty: state.difficulty,
            final_score: state.score,
            total_coins: state.coins_collected,
            win,
            timestamp,
            frames: self.frames,
        })
    }
}

/// Stored collection of best replays, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReplayStore {
    pub replays: Vec<Replay>,
}

impl ReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score qualifies for the store
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.replays.len() < MAX_REPLAYS {
            return true;
        }
        self.replays
            .last()
            .map(|r| score > r.final_score)
            .unwrap_or(true)
    }

    /// Insert a replay keeping descending score order, evicting the
    /// lowest when full. Returns the rank achieved (1-indexed).
    pub fn add(&mut self, replay: Replay) -> Option<usize> {
        if !self.qualifies(replay.final_score) {
            return None;
        }
        let score = replay.final_score;
        let pos = self.replays.iter().position(|r| score > r.final_score);
        let rank = match pos {
            Some(i) => {
                self.replays.insert(i, replay);
                i + 1
            }
            None => {
                self.replays.push(replay);
                self.replays.len()
            }
        };
        self.replays.truncate(MAX_REPLAYS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.replays.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.replays.first().map(|r| r.final_score)
    }

    /// Serialize for the host's storage
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the host's storage; malformed blobs start fresh
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("replay store unreadable ({err}), starting fresh");
                Self::new()
            }
        }
    }
}

/// Plays a recorded replay back against wall-clock time
#[derive(Debug)]
pub struct ReplayPlayback {
    replay: Replay,
}

impl ReplayPlayback {
    pub fn new(replay: Replay) -> Self {
        Self { replay }
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    /// The frame to show `elapsed_ms` into playback: the latest frame at
    /// or before the play head. None once past the end.
    pub fn frame_at(&self, elapsed_ms: f64) -> Option<&ReplayFrame> {
        if elapsed_ms > self.replay.duration_ms() {
            return None;
        }
        self.replay
            .frames
            .iter()
            .rev()
            .find(|f| f.t_ms <= elapsed_ms)
    }

    pub fn finished(&self, elapsed_ms: f64) -> bool {
        elapsed_ms > self.replay.duration_ms()
    }
}
