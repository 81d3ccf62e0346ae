//! Brickwave entry point
//!
//! Runs a headless demo round with the autopilot driving the paddle,
//! capturing a replay and printing the outcome. The playable build embeds
//! the same `FrameLoop` behind a real display surface.

use brickwave::audio::AudioService;
use brickwave::consts::*;
use brickwave::driver::{FrameLoop, LoopStatus, RoundOutcome};
use brickwave::render::build_scene;
use brickwave::replay::ReplayStore;
use brickwave::settings::Settings;
use brickwave::sim::{BrickPattern, Difficulty, LayoutParams, RoundConfig, RoundPhase};
use brickwave::EquippedCosmetics;

fn main() {
    env_logger::init();
    log::info!("Brickwave (headless demo) starting...");

    let seed = 0xb41c_c0de;
    let settings = Settings::default();
    let mut frame_loop = FrameLoop::new(AudioService::default());
    settings.apply_to(&mut frame_loop.audio);
    frame_loop.start_round(
        seed,
        Difficulty::Medium,
        &LayoutParams::new(BrickPattern::Pyramid, 5, 10),
        RoundConfig::standard(),
    );
    frame_loop.set_autopilot(true);
    frame_loop.set_playing(true);

    let outcome = run_to_completion(&mut frame_loop);

    let mut store = ReplayStore::new();
    if let Some(replay) = outcome.replay {
        let secs = replay.duration_ms() / 1000.0;
        println!("replay captured: {} frames, {secs:.1}s", replay.frames.len());
        if let Some(rank) = store.add(replay) {
            println!("saved as replay #{rank}");
        }
    }

    println!(
        "round finished: {} | score {} | coins {} | time bonus {}",
        if outcome.win { "WIN" } else { "LOSS" },
        outcome.score,
        outcome.coins,
        outcome.time_bonus
    );

    // One scene build to show what the renderer would draw
    let scene = build_scene(frame_loop.state(), &EquippedCosmetics::default(), &settings);
    println!("final frame: {} shapes", scene.shapes.len());

    if let Ok(json) = store.to_json() {
        log::debug!("replay store blob: {} bytes", json.len());
    }
}

/// Drive simulated 60 Hz frames until the round ends
fn run_to_completion(frame_loop: &mut FrameLoop) -> RoundOutcome {
    let mut now_ms = 0.0;
    // Ten simulated minutes is far beyond any real round
    while frame_loop.status() == LoopStatus::Running && now_ms < 600_000.0 {
        if frame_loop.request_frame() {
            frame_loop.on_frame(now_ms);
        }
        now_ms += FRAME_INTERVAL_MS + 0.7;
    }

    if frame_loop.state().phase != RoundPhase::Over {
        log::warn!("demo round hit the wall-clock cap before finishing");
    }

    frame_loop.take_outcome().unwrap_or(RoundOutcome {
        win: false,
        score: frame_loop.state().score,
        coins: frame_loop.state().coins_collected,
        time_bonus: 0,
        replay: None,
    })
}
