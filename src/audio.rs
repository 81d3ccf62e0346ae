//! Audio service
//!
//! Procedurally described sound effects - no external files needed. The
//! service owns volume/mute state and lowers each effect to a small tone
//! program; actual playback goes through an injected [`AudioSink`] so the
//! game logic never touches a platform audio API directly.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    /// Ball hits paddle
    PaddleHit,
    /// Ball hits wall
    WallHit,
    /// Brick hit (doesn't break)
    BrickHit,
    /// Brick breaks
    BrickBreak,
    /// Explosive brick detonates
    Explosion,
    /// Coin collected
    CoinCollect,
    /// Power-up collected
    PowerUpCollect,
    /// Shield absorbed a bottom exit
    ShieldPop,
    /// Life lost
    LifeLost,
    /// Ball launched
    Launch,
    /// Round won
    Victory,
    /// Round lost
    GameOver,
}

/// Oscillator waveform for a tone step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One envelope step of a tone program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    /// Frequency at the end of the step (sweep when different)
    pub end_freq_hz: f32,
    pub waveform: Waveform,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Start offset from the program origin, seconds
    pub at: f32,
    pub duration: f32,
}

impl Tone {
    fn flat(freq_hz: f32, waveform: Waveform, gain: f32, at: f32, duration: f32) -> Self {
        Self {
            freq_hz,
            end_freq_hz: freq_hz,
            waveform,
            gain,
            at,
            duration,
        }
    }

    fn sweep(
        freq_hz: f32,
        end_freq_hz: f32,
        waveform: Waveform,
        gain: f32,
        at: f32,
        duration: f32,
    ) -> Self {
        Self {
            freq_hz,
            end_freq_hz,
            waveform,
            gain,
            at,
            duration,
        }
    }
}

/// Playback backend. Implementations render tone programs however the
/// platform allows; the service only ever calls this trait.
pub trait AudioSink {
    /// Render one tone program at the given pre-scaled gain multiplier
    fn play(&mut self, tones: &[Tone], volume: f32);
}

/// Sink that discards everything. Used when audio is unavailable and as
/// the default for headless runs.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _tones: &[Tone], _volume: f32) {}
}

/// Audio service for the game
pub struct AudioService {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioService {
    fn default() -> Self {
        Self::new(Box::new(NullSink))
    }
}

impl AudioService {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink: Some(sink),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Release the sink. Further play calls are no-ops; safe to call twice.
    pub fn dispose(&mut self) {
        if self.sink.take().is_some() {
            log::debug!("audio sink released");
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: Sfx) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = &mut self.sink else { return };
        sink.play(&program(effect), vol);
    }
}

/// Tone program for each effect
fn program(effect: Sfx) -> Vec<Tone> {
    use Waveform::*;
    match effect {
        // Solid thump, pitch dropping
        Sfx::PaddleHit => vec![Tone::sweep(150.0, 60.0, Sine, 0.6, 0.0, 0.1)],
        // Higher ping
        Sfx::WallHit => vec![Tone::flat(400.0, Sine, 0.3, 0.0, 0.08)],
        // Soft tap
        Sfx::BrickHit => vec![Tone::flat(300.0, Triangle, 0.25, 0.0, 0.05)],
        // Crack plus bass thump
        Sfx::BrickBreak => vec![
            Tone::sweep(900.0, 200.0, Sawtooth, 0.35, 0.0, 0.12),
            Tone::flat(60.0, Sine, 0.3, 0.0, 0.1),
        ],
        // Boom with a high crack
        Sfx::Explosion => vec![
            Tone::sweep(100.0, 30.0, Sawtooth, 0.5, 0.0, 0.4),
            Tone::flat(1500.0, Square, 0.2, 0.0, 0.1),
        ],
        // Happy ascending dings
        Sfx::CoinCollect => vec![
            Tone::flat(600.0, Sine, 0.25, 0.0, 0.1),
            Tone::flat(900.0, Sine, 0.25, 0.08, 0.12),
        ],
        Sfx::PowerUpCollect => vec![
            Tone::flat(500.0, Triangle, 0.25, 0.0, 0.1),
            Tone::flat(700.0, Triangle, 0.25, 0.08, 0.1),
            Tone::flat(1000.0, Triangle, 0.25, 0.16, 0.15),
        ],
        // Bubble pop, rising
        Sfx::ShieldPop => vec![Tone::sweep(300.0, 800.0, Sine, 0.35, 0.0, 0.12)],
        // Ominous descend
        Sfx::LifeLost => vec![Tone::sweep(300.0, 60.0, Sine, 0.4, 0.0, 0.5)],
        // Whoosh up
        Sfx::Launch => vec![Tone::sweep(200.0, 600.0, Triangle, 0.3, 0.0, 0.15)],
        // Triumphant fanfare
        Sfx::Victory => vec![
            Tone::flat(400.0, Triangle, 0.3, 0.0, 0.2),
            Tone::flat(500.0, Triangle, 0.3, 0.1, 0.2),
            Tone::flat(600.0, Triangle, 0.3, 0.2, 0.2),
            Tone::flat(800.0, Triangle, 0.3, 0.3, 0.4),
        ],
        // Sad descending steps
        Sfx::GameOver => vec![
            Tone::flat(400.0, Sine, 0.3, 0.0, 0.25),
            Tone::flat(350.0, Sine, 0.3, 0.2, 0.25),
            Tone::flat(300.0, Sine, 0.3, 0.4, 0.25),
            Tone::flat(200.0, Sine, 0.3, 0.6, 0.35),
        ],
    }
}
