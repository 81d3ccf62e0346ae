//! Visual effect scheduling: particles, screen shake, screen flash, trail
//!
//! Cosmetic but stateful. Driven by gameplay events, advanced once per
//! tick, and fully decoupled from physics - dropping this module would not
//! change gameplay. Particle spread uses integer hashing instead of the
//! round RNG so visuals never perturb the gameplay RNG stream.

use glam::Vec2;

/// Maximum live particles; oldest are evicted when the pool is full
pub const MAX_PARTICLES: usize = 512;
/// Trail history length (positions, newest first)
pub const TRAIL_LENGTH: usize = 20;

/// Downward gravity bias per tick for weighty particle kinds
const PARTICLE_GRAVITY: f32 = 0.08;
const SHAKE_DECAY: f32 = 0.9;
const FLASH_DECAY: f32 = 0.92;

/// Particle category tag (selects color/physics treatment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Explosion,
    Coin,
    PowerUp,
    /// Rarity sparkle on cosmetic-flavored bursts
    Sparkle,
    Trail,
}

/// A short-lived point particle
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks
    pub life: f32,
    pub max_life: f32,
    /// Hue in degrees, resolved to a color by the render pass
    pub hue: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Render opacity, 1.0 at spawn fading to 0.0
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// All visual-effect state for a round
#[derive(Debug, Clone, Default)]
pub struct FxState {
    pub particles: Vec<Particle>,
    /// Screen shake intensity, 0..=1, decays per tick
    pub shake: f32,
    /// Screen flash alpha, 0..=1, decays per tick
    pub flash: f32,
    /// Recent primary-ball positions, newest first
    pub trail: Vec<Vec2>,
    /// Monotonic counter feeding the particle spread hash
    spawn_seq: u32,
}

/// Cheap integer hash for deterministic particle spread
#[inline]
fn hash(seq: u32, i: u32) -> u32 {
    seq.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919))
}

#[inline]
fn unit(h: u32) -> f32 {
    (h % 1000) as f32 / 1000.0
}

impl FxState {
    /// Advance one tick: integrate, apply gravity bias, cull dead particles,
    /// decay shake and flash.
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            if matches!(p.kind, ParticleKind::Explosion | ParticleKind::Coin) {
                p.vel.y += PARTICLE_GRAVITY;
            }
            p.vel *= 0.98;
            p.life -= 1.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.shake *= SHAKE_DECAY;
        if self.shake < 0.01 {
            self.shake = 0.0;
        }
        self.flash *= FLASH_DECAY;
        if self.flash < 0.01 {
            self.flash = 0.0;
        }
    }

    fn push(&mut self, p: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(p);
    }

    /// Radial burst at a destroyed brick
    pub fn spawn_explosion(&mut self, pos: Vec2, hue: f32, count: usize) {
        self.spawn_seq = self.spawn_seq.wrapping_add(1);
        let seq = self.spawn_seq;
        for i in 0..count as u32 {
            let h = hash(seq, i);
            let angle = unit(h) * std::f32::consts::TAU;
            let speed = 1.0 + unit(h >> 10) * 2.5;
            let life = 25.0 + unit(h >> 20) * 20.0;
            self.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life,
                max_life: life,
                hue,
                kind: ParticleKind::Explosion,
            });
        }
    }

    /// Small golden burst on coin collection
    pub fn spawn_coin_burst(&mut self, pos: Vec2) {
        self.spawn_seq = self.spawn_seq.wrapping_add(1);
        let seq = self.spawn_seq;
        for i in 0..6u32 {
            let h = hash(seq, i);
            let angle = unit(h) * std::f32::consts::TAU;
            let life = 15.0 + unit(h >> 10) * 10.0;
            self.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * 1.5,
                life,
                max_life: life,
                hue: 48.0,
                kind: ParticleKind::Coin,
            });
        }
    }

    /// Upward fountain on power-up collection, plus rarity sparkles
    pub fn spawn_powerup_burst(&mut self, pos: Vec2, sparkles: usize) {
        self.spawn_seq = self.spawn_seq.wrapping_add(1);
        let seq = self.spawn_seq;
        for i in 0..10u32 {
            let h = hash(seq, i);
            let angle = (unit(h) - 0.5) * 1.2;
            let life = 20.0 + unit(h >> 10) * 15.0;
            self.push(Particle {
                pos,
                vel: Vec2::new(angle.sin(), -angle.cos()) * 2.0,
                life,
                max_life: life,
                hue: 280.0,
                kind: ParticleKind::PowerUp,
            });
        }
        for i in 0..sparkles as u32 {
            let h = hash(seq, 1000 + i);
            let angle = unit(h) * std::f32::consts::TAU;
            let life = 30.0 + unit(h >> 10) * 20.0;
            self.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * 0.8,
                life,
                max_life: life,
                hue: unit(h >> 20) * 360.0,
                kind: ParticleKind::Sparkle,
            });
        }
    }

    pub fn trigger_shake(&mut self, amount: f32) {
        self.shake = (self.shake + amount).min(1.0);
    }

    pub fn trigger_flash(&mut self, amount: f32) {
        self.flash = (self.flash + amount).min(1.0);
    }

    /// Deterministic shake offset for the current tick
    pub fn shake_offset(&self, tick: u64) -> Vec2 {
        if self.shake <= 0.0 {
            return Vec2::ZERO;
        }
        let h = hash(tick as u32, 17);
        let max = self.shake * 6.0;
        Vec2::new(
            (unit(h) - 0.5) * 2.0 * max,
            (unit(h >> 12) - 0.5) * 2.0 * max,
        )
    }

    /// Record the primary ball's position (call each tick while playing)
    pub fn record_trail(&mut self, pos: Vec2) {
        self.trail.insert(0, pos);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on respawn)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}
