//! Scene building
//!
//! Turns a `GameState` plus cosmetics and settings into a flat display
//! list of primitives. Pure: no platform surface is touched here, so a
//! canvas, GPU, or test harness can all consume the same scene.

use glam::Vec2;

use crate::consts::*;
use crate::cosmetics::{Color, EquippedCosmetics};
use crate::settings::Settings;
use crate::sim::fx::TRAIL_LENGTH;
use crate::sim::{BrickKind, GameState, ParticleKind, RoundPhase};

/// One draw command, back-to-front order within the scene
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        min: Vec2,
        size: Vec2,
        color: [f32; 4],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 4],
    },
    /// Fading polyline segment of the ball trail
    TrailSegment {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 4],
    },
}

/// HUD values the host overlays as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub score: u64,
    pub lives: u8,
    pub combo: u32,
    pub coins: u64,
    pub round_over: bool,
}

/// Complete frame description
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Camera translation from screen shake, already settings-gated
    pub camera_offset: Vec2,
    /// Full-screen white overlay alpha, 0 when flashes are off
    pub flash_alpha: f32,
    pub shapes: Vec<Shape>,
    pub hud: Hud,
}

fn rgba(c: Color, a: f32) -> [f32; 4] {
    [
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        a,
    ]
}

/// HSL-ish hue to rgb for particle tinting, full saturation
fn hue_color(hue: f32, alpha: f32) -> [f32; 4] {
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [r, g, b, alpha]
}

fn brick_color(kind: BrickKind, hits_left: u8) -> [f32; 4] {
    match kind {
        BrickKind::Normal => [0.3, 0.6, 0.9, 1.0],
        // Strong bricks dim once cracked
        BrickKind::Strong if hits_left > 1 => [0.85, 0.6, 0.2, 1.0],
        BrickKind::Strong => [0.6, 0.4, 0.15, 1.0],
        BrickKind::Explosive => [0.9, 0.25, 0.2, 1.0],
    }
}

/// Build the display list for one frame
pub fn build_scene(
    state: &GameState,
    cosmetics: &EquippedCosmetics,
    settings: &Settings,
) -> Scene {
    let mut scene = Scene {
        camera_offset: if settings.effective_screen_shake() {
            state.fx.shake_offset(state.tick)
        } else {
            Vec2::ZERO
        },
        flash_alpha: if settings.effective_flashes() {
            state.fx.flash
        } else {
            0.0
        },
        ..Scene::default()
    };

    // Background first
    scene.shapes.push(Shape::Rect {
        min: Vec2::ZERO,
        size: Vec2::new(PLAYFIELD_W, PLAYFIELD_H),
        color: rgba(cosmetics.background_color, 1.0),
    });

    // Bricks; an equipped brick skin retints normal bricks only, so the
    // strong/explosive warning colors stay readable
    for brick in state.bricks.iter().filter(|b| b.active) {
        let color = match (brick.kind, cosmetics.brick_tint) {
            (BrickKind::Normal, Some(tint)) => rgba(tint, 1.0),
            _ => brick_color(brick.kind, brick.hits_left),
        };
        scene.shapes.push(Shape::Rect {
            min: brick.pos,
            size: brick.size,
            color,
        });
    }

    // Falling entities
    for coin in &state.coins {
        scene.shapes.push(Shape::Circle {
            center: coin.pos,
            radius: COIN_RADIUS,
            color: [1.0, 0.85, 0.2, 1.0],
        });
    }
    for pickup in &state.pickups {
        scene.shapes.push(Shape::Circle {
            center: pickup.pos,
            radius: PICKUP_RADIUS,
            color: [0.7, 0.4, 1.0, 1.0],
        });
    }

    // Trail is stored newest first; fade and thin toward the tail
    if settings.trails {
        let trail = &state.fx.trail;
        let keep = ((TRAIL_LENGTH as f32 * settings.quality.trail_quality()) as usize).max(2);
        let visible = &trail[..trail.len().min(keep)];
        let n = visible.len().max(1) as f32;
        for (i, pair) in visible.windows(2).enumerate() {
            let t = 1.0 - i as f32 / n;
            scene.shapes.push(Shape::TrailSegment {
                from: pair[0],
                to: pair[1],
                width: state.ball.radius * (0.3 + 0.7 * t),
                color: rgba(cosmetics.trail_color, t * 0.8),
            });
        }
    }

    // Particles, capped by quality
    let cap = settings.max_particles();
    for particle in state.fx.particles.iter().take(cap) {
        let radius = match particle.kind {
            ParticleKind::Trail => 2.0,
            ParticleKind::Sparkle => 2.5,
            _ => 3.0,
        };
        let color = match (particle.kind, cosmetics.explosion_color) {
            (ParticleKind::Explosion, Some(c)) => rgba(c, particle.opacity()),
            _ => hue_color(particle.hue, particle.opacity()),
        };
        scene.shapes.push(Shape::Circle {
            center: particle.pos,
            radius,
            color,
        });
    }

    // Paddle and balls on top
    scene.shapes.push(Shape::Rect {
        min: state.paddle.min(),
        size: state.paddle.size(),
        color: rgba(cosmetics.paddle_color, 1.0),
    });
    scene.shapes.push(Shape::Circle {
        center: state.ball.pos,
        radius: state.ball.radius,
        color: rgba(cosmetics.ball_color, 1.0),
    });
    for ball in &state.extra_balls {
        scene.shapes.push(Shape::Circle {
            center: ball.pos,
            radius: ball.radius,
            color: rgba(cosmetics.ball_color, 0.85),
        });
    }

    scene.hud = Hud {
        score: state.score,
        lives: state.lives,
        combo: state.combo,
        coins: state.coins_collected,
        round_over: state.phase == RoundPhase::Over,
    };

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;
    use crate::sim::{Difficulty, GameState};

    fn small_state() -> GameState {
        use crate::sim::{BrickPattern, LayoutParams, generate_layout};
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
        let bricks = generate_layout(&LayoutParams::new(BrickPattern::Standard, 2, 4), 0.0, &mut rng);
        GameState::new(1, Difficulty::Easy, bricks)
    }

    fn circles(scene: &Scene) -> usize {
        scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count()
    }

    #[test]
    fn test_scene_contains_bricks_paddle_ball() {
        let state = small_state();
        let scene = build_scene(&state, &EquippedCosmetics::default(), &Settings::default());
        let rects = scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { .. }))
            .count();
        // background + 8 bricks + paddle
        assert_eq!(rects, 10);
        assert!(circles(&scene) >= 1);
        assert_eq!(scene.hud.lives, START_LIVES);
    }

    #[test]
    fn test_build_scene_is_pure() {
        let state = small_state();
        let cosmetics = EquippedCosmetics::default();
        let settings = Settings::default();
        let a = build_scene(&state, &cosmetics, &settings);
        let b = build_scene(&state, &cosmetics, &settings);
        assert_eq!(a.shapes, b.shapes);
        assert_eq!(a.camera_offset, b.camera_offset);
    }

    #[test]
    fn test_reduced_motion_zeroes_shake_and_flash() {
        let mut state = small_state();
        state.fx.trigger_shake(1.0);
        state.fx.trigger_flash(1.0);
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        let scene = build_scene(&state, &EquippedCosmetics::default(), &settings);
        assert_eq!(scene.camera_offset, Vec2::ZERO);
        assert_eq!(scene.flash_alpha, 0.0);
    }

    #[test]
    fn test_particles_off_draws_none() {
        let mut state = small_state();
        state.fx.spawn_explosion(Vec2::new(400.0, 300.0), 200.0, 24);
        let mut settings = Settings::from_preset(QualityPreset::High);
        settings.particles = false;
        let scene = build_scene(&state, &EquippedCosmetics::default(), &settings);
        let base = build_scene(
            &state,
            &EquippedCosmetics::default(),
            &Settings {
                particles: true,
                ..settings.clone()
            },
        );
        assert!(circles(&scene) < circles(&base));
    }

    #[test]
    fn test_brick_tint_recolors_normal_bricks() {
        use crate::sim::{BrickPattern, LayoutParams, generate_layout};
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
        let mut params = LayoutParams::new(BrickPattern::Standard, 2, 4);
        params.strong_enabled = false;
        params.explosive_enabled = false;
        let bricks = generate_layout(&params, 0.0, &mut rng);
        let state = GameState::new(1, Difficulty::Easy, bricks);
        let mut cosmetics = EquippedCosmetics::default();
        cosmetics.brick_tint = Some(Color::rgb(255, 0, 0));
        let scene = build_scene(&state, &cosmetics, &Settings::default());
        let tinted = scene
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { color, .. } if *color == [1.0, 0.0, 0.0, 1.0]))
            .count();
        assert_eq!(tinted, state.bricks.len());
    }

    #[test]
    fn test_explosion_color_overrides_hue() {
        let mut state = small_state();
        state.fx.spawn_explosion(Vec2::new(400.0, 300.0), 10.0, 4);
        let mut cosmetics = EquippedCosmetics::default();
        cosmetics.explosion_color = Some(Color::rgb(0, 255, 0));
        let scene = build_scene(&state, &cosmetics, &Settings::from_preset(QualityPreset::High));
        assert!(scene.shapes.iter().any(
            |s| matches!(s, Shape::Circle { color, .. } if color[0] == 0.0 && color[1] == 1.0)
        ));
    }

    #[test]
    fn test_trails_toggle() {
        let mut state = small_state();
        for i in 0..10 {
            state.fx.record_trail(Vec2::new(100.0 + i as f32, 100.0));
        }
        let mut settings = Settings::default();
        settings.trails = false;
        let scene = build_scene(&state, &EquippedCosmetics::default(), &settings);
        assert!(
            !scene
                .shapes
                .iter()
                .any(|s| matches!(s, Shape::TrailSegment { .. }))
        );
    }
}
