//! One discrete simulation tick
//!
//! Advances every ball, resolves wall/paddle/brick collisions, applies the
//! combo/score rules, spawns and collects falling entities, steps effect
//! timers and visual effects, and checks the terminal conditions. All
//! mutation of `GameState` happens here, synchronously.

use rand::Rng;

use super::collision::{ContactAxis, circle_rect_overlap, contact_axis, paddle_bounce_velocity};
use super::layout::DifficultyProfile;
use super::powerups::{self, PowerUpKind};
use super::state::{Ball, Brick, BrickKind, Coin, GameEvent, GameState, Pickup, RoundPhase};
use crate::clamp_speed;
use crate::consts::*;

/// Input for a single tick. Pointer/touch/keyboard handlers write the
/// paddle target outside the tick boundary; it is read here once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Target paddle center x (from mouse/touch position)
    pub target_x: Option<f32>,
    /// Demo mode - the paddle tracks the primary ball by itself
    pub autopilot: bool,
}

/// Per-round engine parameters. The four canvas modes of the original are
/// thin configurations over this one engine.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    /// Round clock in ticks for timed modes; expiry ends the round
    pub time_limit_ticks: Option<u64>,
    /// Emit PaddleMoved/BallMoved each tick for opponent mirroring
    pub mirror_motion: bool,
    /// Whether destroyed bricks may drop power-up pickups
    pub powerups_enabled: bool,
    /// Extra sparkle particles on pickup bursts (cosmetic rarity bonus)
    pub sparkle_bonus: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl RoundConfig {
    /// Classic single-player round
    pub fn standard() -> Self {
        Self {
            time_limit_ticks: None,
            mirror_motion: false,
            powerups_enabled: true,
            sparkle_bonus: 0,
        }
    }

    /// Time-limited round; the clock comes from the difficulty profile
    pub fn timed(profile: &DifficultyProfile) -> Self {
        Self {
            time_limit_ticks: Some(profile.time_limit_secs as u64 * 60),
            ..Self::standard()
        }
    }

    /// Split-screen/networked round: motion events mirrored to the peer
    pub fn split_screen() -> Self {
        Self {
            mirror_motion: true,
            ..Self::standard()
        }
    }

    /// Editor test round over a caller-supplied layout; no pickups so the
    /// layout is judged on its own geometry
    pub fn level_test() -> Self {
        Self {
            powerups_enabled: false,
            ..Self::standard()
        }
    }
}

/// Apply input to the paddle and move it one step toward its target.
/// Also runs on its own for render-only passes while the loop is paused,
/// so the paddle keeps tracking the pointer. Returns whether it moved.
pub fn step_paddle(state: &mut GameState, input: &TickInput) -> bool {
    if let Some(x) = input.target_x {
        state.paddle.target_x = x;
    }
    if input.autopilot {
        state.paddle.target_x = state.ball.pos.x;
    }
    state.paddle.step()
}

/// Advance the round by one tick
pub fn tick(state: &mut GameState, input: &TickInput, config: &RoundConfig) {
    if state.phase == RoundPhase::Over {
        return;
    }

    let paddle_moved = step_paddle(state, input);
    if paddle_moved && config.mirror_motion {
        let x = state.paddle.x;
        state.push_event(GameEvent::PaddleMoved { x });
    }

    if state.phase != RoundPhase::Playing {
        // Idle: the paddle tracks input visually, nothing else advances
        return;
    }

    state.tick += 1;

    // Primary ball - its bottom exit costs a life (or a shield)
    let mut ball = state.ball;
    let exited = step_ball(&mut ball, state, true, config);
    state.ball = ball;
    if exited {
        handle_primary_exit(state, config);
        if state.phase == RoundPhase::Over {
            return;
        }
    }

    // Extra balls exit silently
    let mut extras = std::mem::take(&mut state.extra_balls);
    extras.retain_mut(|b| !step_ball(b, state, false, config));
    state.extra_balls = extras;

    if config.mirror_motion {
        let pos = state.ball.pos;
        state.push_event(GameEvent::BallMoved { pos });
    }

    update_falling(state, config);
    powerups::update(state);

    state.fx.record_trail(state.ball.pos);
    state.fx.update();

    // Victory wins a photo finish against the clock
    if state.bricks_remaining() == 0 {
        finish_round(state, true, config);
        return;
    }
    if config.time_limit_ticks.is_some_and(|limit| state.tick >= limit) {
        finish_round(state, false, config);
    }
}

/// Move one ball through walls, paddle, and bricks.
/// Returns true when the ball has exited the bottom boundary.
fn step_ball(ball: &mut Ball, state: &mut GameState, is_primary: bool, config: &RoundConfig) -> bool {
    let r = ball.radius;

    // Wall reflection when the next position would cross a boundary.
    // Sign flip only - no energy loss.
    let next = ball.pos + ball.vel;
    let mut bounced = false;
    if (next.x - r < 0.0 && ball.vel.x < 0.0) || (next.x + r > PLAYFIELD_W && ball.vel.x > 0.0) {
        ball.vel.x = -ball.vel.x;
        bounced = true;
    }
    if next.y - r < 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        bounced = true;
    }
    if bounced {
        state.push_event(GameEvent::WallBounce);
    }

    // Predictive paddle collision: vertical band overlap on the next
    // position, horizontal span extended by the radius for the primary
    // ball only (collision forgiveness).
    if ball.vel.y > 0.0 {
        let next = ball.pos + ball.vel;
        let band_top = state.paddle.top();
        let band_bottom = state.paddle.y + state.paddle.height / 2.0;
        if next.y + r >= band_top && ball.pos.y - r <= band_bottom {
            let reach = state.paddle.width / 2.0 + if is_primary { r } else { 0.0 };
            if (ball.pos.x - state.paddle.x).abs() <= reach {
                let offset = (ball.pos.x - state.paddle.x) / state.paddle.half_width();
                ball.vel = paddle_bounce_velocity(offset, ball.speed());
                // Reposition just above the paddle so the next tick cannot
                // re-trigger the band test
                ball.pos.y = band_top - r - 0.1;
                state.push_event(GameEvent::PaddleBounce);
                return false;
            }
        }
    }

    ball.pos += ball.vel;

    // Brick collision: first overlapping active brick, one per tick
    let hit = state
        .bricks
        .iter()
        .position(|b| b.active && circle_rect_overlap(ball.pos, r, b.pos, b.size));
    if let Some(idx) = hit {
        let brick = &state.bricks[idx];
        match contact_axis(ball.pos, brick.pos, brick.size) {
            ContactAxis::Vertical => ball.vel.y = -ball.vel.y,
            ContactAxis::Horizontal => ball.vel.x = -ball.vel.x,
        }
        hit_brick(state, idx, config);
    }

    ball.pos.y - r > PLAYFIELD_H
}

/// Primary ball crossed the bottom boundary
fn handle_primary_exit(state: &mut GameState, config: &RoundConfig) {
    if state.effects.shield {
        // Consume the shield and bounce back upward from just above the
        // paddle; no life lost.
        state.effects.shield = false;
        let r = state.ball.radius;
        state.ball.pos.y = state.paddle.top() - r - 1.0;
        state.ball.pos.x = state.ball.pos.x.clamp(r, PLAYFIELD_W - r);
        state.ball.vel.y = -state.ball.vel.y.abs();
        state.ball.vel = clamp_speed(state.ball.vel);
        state.push_event(GameEvent::ShieldConsumed);
        state.fx.trigger_flash(0.3);
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.combo = 0;
    let lives_left = state.lives;
    state.push_event(GameEvent::LifeLost { lives_left });
    state.fx.trigger_shake(0.5);
    log::debug!("life lost, {} remaining", state.lives);

    if state.lives == 0 {
        finish_round(state, false, config);
        return;
    }

    state.respawn_ball();
    // A respawn during slow-ball gets the same multiplier so the expiry
    // revert stays exact
    if let Some(factor) = state.effects.slow_factor {
        state.ball.vel = clamp_speed(state.ball.vel * factor);
    }
}

/// Resolve a ball contact on a brick
fn hit_brick(state: &mut GameState, idx: usize, config: &RoundConfig) {
    let brick = &mut state.bricks[idx];
    if brick.kind == BrickKind::Strong && brick.hits_left > 1 {
        brick.hits_left -= 1;
        let pos = brick.center();
        state.push_event(GameEvent::BrickCracked { pos });
        return;
    }
    destroy_bricks(state, idx, config);
}

/// Destroy a brick and, for explosives, chain through the neighborhood.
/// Each destroyed brick scores through the combo rule and may spawn a coin
/// or a power-up pickup.
fn destroy_bricks(state: &mut GameState, start: usize, config: &RoundConfig) {
    let mut queue = vec![start];
    while let Some(idx) = queue.pop() {
        if !state.bricks[idx].active {
            continue;
        }
        state.bricks[idx].active = false;
        let brick = state.bricks[idx].clone();

        register_break(state, &brick);

        let center = brick.center();
        if brick.has_coin {
            state.coins.push(Coin {
                pos: center,
                value: state.profile.coin_value,
            });
        }
        if config.powerups_enabled && state.rng.random::<f32>() < POWERUP_DROP_CHANCE {
            let kind = PowerUpKind::random(&mut state.rng);
            state.pickups.push(Pickup { pos: center, kind });
        }

        let hue = match brick.kind {
            BrickKind::Normal => 200.0,
            BrickKind::Strong => 30.0,
            BrickKind::Explosive => 10.0,
        };
        state.fx.spawn_explosion(center, hue, 24);

        if brick.kind == BrickKind::Explosive {
            state.fx.trigger_shake(0.4);
            state.fx.trigger_flash(0.2);
            // Blast the 8-neighborhood; chained explosives keep going
            for (j, other) in state.bricks.iter().enumerate() {
                if other.active
                    && other.col.abs_diff(brick.col) <= 1
                    && other.row.abs_diff(brick.row) <= 1
                {
                    queue.push(j);
                }
            }
        }
    }
}

/// Combo/score bookkeeping for one destroyed brick.
///
/// The combo increments only when the previous brick broke within the
/// window, is capped, and scores base * combo.
fn register_break(state: &mut GameState, brick: &Brick) {
    let now = state.time_ms();
    state.combo = match state.last_break_ms {
        Some(last) if now - last <= COMBO_WINDOW_MS => (state.combo + 1).min(COMBO_CAP),
        _ => 1,
    };
    state.last_break_ms = Some(now);
    state.score += BRICK_BASE_POINTS * state.combo as u64;

    let (pos, kind, score) = (brick.center(), brick.kind, state.score);
    state.push_event(GameEvent::BrickDestroyed { pos, kind });
    state.push_event(GameEvent::ScoreChanged { score });
}

/// Advance falling coins and pickups; collect on paddle overlap, drop
/// once past the bottom boundary.
fn update_falling(state: &mut GameState, config: &RoundConfig) {
    let paddle_min = state.paddle.min();
    let paddle_size = state.paddle.size();

    let mut collected_coins = Vec::new();
    state.coins.retain_mut(|coin| {
        coin.pos.y += FALL_SPEED;
        if circle_rect_overlap(coin.pos, COIN_RADIUS, paddle_min, paddle_size) {
            collected_coins.push(*coin);
            return false;
        }
        coin.pos.y - COIN_RADIUS <= PLAYFIELD_H
    });
    for coin in collected_coins {
        state.coins_collected += coin.value;
        let total = state.coins_collected;
        state.push_event(GameEvent::CoinCollected {
            value: coin.value,
            total,
        });
        state.fx.spawn_coin_burst(coin.pos);
    }

    let mut collected_pickups = Vec::new();
    state.pickups.retain_mut(|pickup| {
        pickup.pos.y += FALL_SPEED;
        if circle_rect_overlap(pickup.pos, PICKUP_RADIUS, paddle_min, paddle_size) {
            collected_pickups.push(*pickup);
            return false;
        }
        pickup.pos.y - PICKUP_RADIUS <= PLAYFIELD_H
    });
    for pickup in collected_pickups {
        powerups::activate(state, pickup.kind);
        state.push_event(GameEvent::PowerUpCollected { kind: pickup.kind });
        state
            .fx
            .spawn_powerup_burst(pickup.pos, 8 + config.sparkle_bonus);
    }
}

/// Terminal transition; emits RoundOver exactly once
fn finish_round(state: &mut GameState, win: bool, config: &RoundConfig) {
    if state.phase == RoundPhase::Over {
        return;
    }
    state.phase = RoundPhase::Over;

    let time_bonus = if win {
        config
            .time_limit_ticks
            .map(|limit| {
                let remaining_secs = (limit.saturating_sub(state.tick)) as f64 * TICK_MS / 1000.0;
                remaining_secs as u64 * TIME_BONUS_PER_SEC
            })
            .unwrap_or(0)
    } else {
        0
    };
    state.score += time_bonus;

    log::info!(
        "round over: win={} score={} coins={} time_bonus={}",
        win,
        state.score,
        state.coins_collected,
        time_bonus
    );

    if win {
        state.fx.trigger_flash(0.5);
    }
    let (score, coins) = (state.score, state.coins_collected);
    state.push_event(GameEvent::RoundOver {
        win,
        score,
        coins,
        time_bonus,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::{BrickPattern, Difficulty, LayoutParams, generate_layout};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn standard_state(seed: u64) -> GameState {
        let params = LayoutParams::new(BrickPattern::Standard, 5, 8);
        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = generate_layout(&params, 0.3, &mut rng);
        let mut state = GameState::new(seed, Difficulty::Easy, bricks);
        state.phase = RoundPhase::Playing;
        state
    }

    /// One brick, placed away from walls and paddle
    fn one_brick_state(kind: BrickKind) -> GameState {
        let brick = Brick {
            col: 0,
            row: 0,
            pos: Vec2::new(300.0, 200.0),
            size: Vec2::new(80.0, 24.0),
            kind,
            hits_left: if kind == BrickKind::Strong {
                STRONG_BRICK_HITS
            } else {
                1
            },
            active: true,
            has_coin: false,
        };
        let mut state = GameState::new(5, Difficulty::Easy, vec![brick]);
        state.phase = RoundPhase::Playing;
        state
    }

    /// Park the ball falling straight down onto the brick's top face
    fn aim_at_brick(state: &mut GameState) {
        state.ball.pos = Vec2::new(340.0, 185.0);
        state.ball.vel = Vec2::new(0.0, 3.0);
        state.paddle.x = 100.0;
        state.paddle.target_x = 100.0;
    }

    fn drain_all(state: &mut GameState) -> Vec<GameEvent> {
        state.drain_events()
    }

    #[test]
    fn test_wall_reflection_sign_flip() {
        let mut state = standard_state(1);
        state.bricks.clear();
        state.bricks.push(Brick {
            col: 0,
            row: 0,
            pos: Vec2::new(700.0, 500.0),
            size: Vec2::new(10.0, 10.0),
            kind: BrickKind::Normal,
            hits_left: 1,
            active: true,
            has_coin: false,
        });
        state.ball.pos = Vec2::new(10.0, 300.0);
        state.ball.vel = Vec2::new(-3.0, -1.0);
        let speed = state.ball.speed();

        tick(&mut state, &TickInput::default(), &RoundConfig::standard());
        assert!(state.ball.vel.x > 0.0);
        assert!((state.ball.speed() - speed).abs() < 1e-4);
        let events = drain_all(&mut state);
        assert!(events.iter().any(|e| matches!(e, GameEvent::WallBounce)));
    }

    #[test]
    fn test_paddle_bounce_emits_event() {
        let mut state = standard_state(2);
        state.bricks.clear();
        state.bricks.push(Brick {
            col: 0,
            row: 0,
            pos: Vec2::new(700.0, 100.0),
            size: Vec2::new(10.0, 10.0),
            kind: BrickKind::Normal,
            hits_left: 1,
            active: true,
            has_coin: false,
        });
        // Drop the ball straight onto the paddle center
        state.ball.pos = Vec2::new(state.paddle.x, 544.0);
        state.ball.vel = Vec2::new(0.0, 4.0);
        tick(&mut state, &TickInput::default(), &RoundConfig::standard());
        let events = drain_all(&mut state);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PaddleBounce)));
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_normal_brick_one_contact() {
        let mut state = one_brick_state(BrickKind::Normal);
        aim_at_brick(&mut state);
        let cfg = RoundConfig::standard();

        let mut contacts = 0;
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &cfg);
            if state.bricks_remaining() == 0 {
                contacts += 1;
                break;
            }
        }
        assert_eq!(contacts, 1);
        // Ball reflected upward off the top face
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_strong_brick_two_contacts() {
        let mut state = one_brick_state(BrickKind::Strong);
        aim_at_brick(&mut state);
        let cfg = RoundConfig::standard();

        // First approach decrements but leaves the brick active
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &cfg);
            if state.bricks[0].hits_left == 1 {
                break;
            }
        }
        assert!(state.bricks[0].active);
        assert_eq!(state.bricks[0].hits_left, 1);
        assert_eq!(state.score, 0);
        let events = drain_all(&mut state);
        assert!(events.iter().any(|e| matches!(e, GameEvent::BrickCracked { .. })));

        // Second approach destroys it
        aim_at_brick(&mut state);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), &cfg);
            if state.bricks_remaining() == 0 {
                break;
            }
        }
        assert_eq!(state.bricks_remaining(), 0);
        assert!(state.score > 0);
    }

    #[test]
    fn test_win_emits_round_over_once() {
        let mut state = one_brick_state(BrickKind::Normal);
        aim_at_brick(&mut state);
        let cfg = RoundConfig::standard();

        let mut round_overs = 0;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), &cfg);
            for ev in drain_all(&mut state) {
                if let GameEvent::RoundOver { win, .. } = ev {
                    assert!(win);
                    round_overs += 1;
                }
            }
        }
        assert_eq!(round_overs, 1);
        assert_eq!(state.phase, RoundPhase::Over);
    }

    #[test]
    fn test_life_loss_boundary() {
        let mut state = standard_state(3);
        state.paddle.x = 100.0;
        state.paddle.target_x = 100.0;
        state.ball.pos = Vec2::new(700.0, 590.0);
        state.ball.vel = Vec2::new(0.0, 4.0);
        let cfg = RoundConfig::standard();

        let mut life_lost = false;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &cfg);
            if drain_all(&mut state)
                .iter()
                .any(|e| matches!(e, GameEvent::LifeLost { .. }))
            {
                life_lost = true;
                break;
            }
        }
        assert!(life_lost);
        assert_eq!(state.lives, START_LIVES - 1);
        assert_eq!(state.combo, 0);
        // Relaunched inside the playfield, moving upward
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.pos.y < PLAYFIELD_H);
        assert!(state.ball.pos.x > 0.0 && state.ball.pos.x < PLAYFIELD_W);
    }

    #[test]
    fn test_shield_consumption_saves_life() {
        let mut state = standard_state(4);
        state.effects.shield = true;
        state.paddle.x = 100.0;
        state.paddle.target_x = 100.0;
        state.ball.pos = Vec2::new(700.0, 590.0);
        state.ball.vel = Vec2::new(0.0, 4.0);
        let cfg = RoundConfig::standard();

        let mut consumed = false;
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &cfg);
            if drain_all(&mut state)
                .iter()
                .any(|e| matches!(e, GameEvent::ShieldConsumed))
            {
                consumed = true;
                break;
            }
        }
        assert!(consumed);
        assert_eq!(state.lives, START_LIVES);
        assert!(!state.effects.shield);
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.pos.y < state.paddle.top());
    }

    #[test]
    fn test_multiball_cleanup_costs_one_life() {
        let mut state = standard_state(6);
        powerups::activate(&mut state, PowerUpKind::MultiBall);
        assert_eq!(state.extra_balls.len(), 2);

        // Drive every ball straight down, away from the paddle
        state.paddle.x = 100.0;
        state.paddle.target_x = 100.0;
        state.ball.pos = Vec2::new(700.0, 580.0);
        state.ball.vel = Vec2::new(0.0, 5.0);
        for (i, ball) in state.extra_balls.iter_mut().enumerate() {
            ball.pos = Vec2::new(600.0 + i as f32 * 30.0, 580.0);
            ball.vel = Vec2::new(0.0, 5.0);
        }
        let cfg = RoundConfig::standard();

        let mut lives_lost = 0;
        for _ in 0..40 {
            tick(&mut state, &TickInput::default(), &cfg);
            lives_lost += drain_all(&mut state)
                .iter()
                .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
                .count();
        }
        assert_eq!(lives_lost, 1);
        assert!(state.extra_balls.is_empty());
        assert_eq!(state.lives, START_LIVES - 1);
    }

    #[test]
    fn test_combo_monotone_then_capped() {
        let mut state = standard_state(7);
        let brick = state.bricks[0].clone();

        // 40 breaks in immediate succession (one tick apart)
        let mut expected = 0u64;
        for i in 1..=40u64 {
            state.tick += 1;
            register_break(&mut state, &brick);
            expected += BRICK_BASE_POINTS * i.min(COMBO_CAP as u64);
        }
        assert_eq!(state.combo, COMBO_CAP);
        assert_eq!(state.score, expected);
        // The worked example from the combo rule: 10*(1+..+10) + 10*10*30
        assert_eq!(expected, 3550);
    }

    #[test]
    fn test_combo_resets_after_gap() {
        let mut state = standard_state(8);
        let brick = state.bricks[0].clone();

        state.tick += 1;
        register_break(&mut state, &brick);
        state.tick += 1;
        register_break(&mut state, &brick);
        assert_eq!(state.combo, 2);

        // Gap longer than the window resets to 1
        state.tick += (COMBO_WINDOW_MS / TICK_MS) as u64 + 2;
        register_break(&mut state, &brick);
        assert_eq!(state.combo, 1);
    }

    /// The 40-break scoring scenario, but through real collisions: the
    /// ball ping-pongs horizontally between the left wall and a stack of
    /// bricks, breaking one roughly every 800 ms so every break lands
    /// inside the combo window.
    #[test]
    fn test_combo_scoring_through_collisions() {
        let bricks: Vec<Brick> = (0..40u32)
            .map(|i| Brick {
                col: 0,
                row: i,
                pos: Vec2::new(160.0, 290.0),
                size: Vec2::new(20.0, 20.0),
                kind: BrickKind::Normal,
                hits_left: 1,
                active: true,
                has_coin: false,
            })
            .collect();
        let mut state = GameState::new(13, Difficulty::Easy, bricks);
        state.phase = RoundPhase::Playing;
        state.ball.pos = Vec2::new(100.0, 300.0);
        state.ball.vel = Vec2::new(6.0, 0.0);
        // No pickups, so the run is pure combo arithmetic
        let cfg = RoundConfig::level_test();

        let mut expected = 0u64;
        for i in 1..=40u64 {
            expected += BRICK_BASE_POINTS * i.min(COMBO_CAP as u64);
        }

        for _ in 0..4000 {
            tick(&mut state, &TickInput::default(), &cfg);
            if state.phase == RoundPhase::Over {
                break;
            }
        }
        assert_eq!(state.phase, RoundPhase::Over);
        assert_eq!(state.bricks_remaining(), 0);
        assert_eq!(state.score, expected);
        let events = drain_all(&mut state);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::RoundOver { win: true, score, .. } if *score == expected
        )));
    }

    #[test]
    fn test_explosive_chains_neighbors() {
        let mut state = standard_state(9);
        // Rebuild a tight 3x3 grid around an explosive center
        state.bricks.clear();
        for row in 0..3u32 {
            for col in 0..3u32 {
                state.bricks.push(Brick {
                    col,
                    row,
                    pos: Vec2::new(300.0 + col as f32 * 84.0, 200.0 + row as f32 * 28.0),
                    size: Vec2::new(80.0, 24.0),
                    kind: if col == 1 && row == 1 {
                        BrickKind::Explosive
                    } else {
                        BrickKind::Normal
                    },
                    hits_left: 1,
                    active: true,
                    has_coin: false,
                });
            }
        }
        let cfg = RoundConfig::standard();
        destroy_bricks(&mut state, 4, &cfg);
        assert_eq!(state.bricks_remaining(), 0);
        // All nine scored through the combo rule
        assert!(state.score >= 9 * BRICK_BASE_POINTS);
    }

    #[test]
    fn test_timed_round_expiry_is_loss() {
        let mut state = standard_state(10);
        let cfg = RoundConfig {
            time_limit_ticks: Some(5),
            ..RoundConfig::standard()
        };
        let mut outcome = None;
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &cfg);
            for ev in drain_all(&mut state) {
                if let GameEvent::RoundOver { win, time_bonus, .. } = ev {
                    outcome = Some((win, time_bonus));
                }
            }
        }
        assert_eq!(outcome, Some((false, 0)));
    }

    #[test]
    fn test_timed_win_grants_time_bonus() {
        let mut state = one_brick_state(BrickKind::Normal);
        aim_at_brick(&mut state);
        let cfg = RoundConfig {
            time_limit_ticks: Some(6000),
            ..RoundConfig::standard()
        };

        let mut bonus = None;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), &cfg);
            for ev in drain_all(&mut state) {
                if let GameEvent::RoundOver { win, time_bonus, score, .. } = ev {
                    assert!(win);
                    assert_eq!(score, state.score);
                    bonus = Some(time_bonus);
                }
            }
        }
        let bonus = bonus.expect("round should end");
        assert!(bonus > 0);
        assert_eq!(bonus % TIME_BONUS_PER_SEC, 0);
    }

    #[test]
    fn test_mirror_motion_emits_positions() {
        let mut state = standard_state(11);
        let cfg = RoundConfig::split_screen();
        tick(
            &mut state,
            &TickInput {
                target_x: Some(600.0),
                ..Default::default()
            },
            &cfg,
        );
        let events = drain_all(&mut state);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PaddleMoved { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::BallMoved { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut a = standard_state(99999);
        let mut b = standard_state(99999);
        let cfg = RoundConfig::standard();

        let inputs = [
            TickInput {
                target_x: Some(500.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                target_x: Some(200.0),
                ..Default::default()
            },
        ];
        for _ in 0..300 {
            for input in &inputs {
                tick(&mut a, input, &cfg);
                tick(&mut b, input, &cfg);
            }
        }
        assert_eq!(a.tick, b.tick);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.bricks_remaining(), b.bricks_remaining());
    }

    #[test]
    fn test_idle_moves_paddle_only() {
        let mut state = standard_state(12);
        state.phase = RoundPhase::Idle;
        let ball_pos = state.ball.pos;
        tick(
            &mut state,
            &TickInput {
                target_x: Some(650.0),
                ..Default::default()
            },
            &RoundConfig::standard(),
        );
        assert_ne!(state.paddle.x, PLAYFIELD_W / 2.0);
        assert_eq!(state.ball.pos, ball_pos);
        assert_eq!(state.tick, 0);
    }
}
