//! End-to-end runs through the public API

use glam::Vec2;
use road_rush::audio::AudioMixer;
use road_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use road_rush::{GameConfig, HighScoreStore, MemoryStore};

const DT: f32 = 1.0 / 60.0;

fn autopilot() -> TickInput {
    TickInput {
        autopilot: true,
        ..Default::default()
    }
}

fn run(seed: u64, seconds: f32) -> (GameState, Vec<GameEvent>) {
    let mut state = GameState::new(GameConfig::default(), seed).unwrap();
    let mut events = state.drain_events();
    let ticks = (seconds / DT).round() as usize;
    for _ in 0..ticks {
        tick(&mut state, &autopilot(), DT);
        events.extend(state.drain_events());
    }
    (state, events)
}

#[test]
fn autopilot_run_holds_invariants() {
    let config = GameConfig::default();
    let ceiling = config.player.speed_ceiling();
    let mut state = GameState::new(config, 2024).unwrap();
    let mut last_score = 0.0;

    for _ in 0..(90.0 / DT) as usize {
        tick(&mut state, &autopilot(), DT);

        assert!(state.player.speed >= 0.0 && state.player.speed <= ceiling + 1e-3);
        assert!(state.score.raw_score() >= last_score);
        last_score = state.score.raw_score();
        assert_eq!(state.score.combo() > 0, state.score.combo_timer_ms() > 0.0);
        assert!(state.active_pursuers() <= 5);
        assert!(state.pursuers.iter().all(|p| p.position.is_finite()));
        state.drain_events();
    }

    assert!(state.survival_ms > 89_000.0);
    // Survival alone is worth 900 points over 90 s
    assert!(state.score.score() >= 899);
    assert_eq!(state.spawner.tier_index(), 2);
}

#[test]
fn same_seed_same_run() {
    let (a, events_a) = run(77, 20.0);
    let (b, events_b) = run(77, 20.0);
    assert_eq!(events_a, events_b);
    assert_eq!(a.score.score(), b.score.score());
    assert_eq!(a.kills, b.kills);
}

#[test]
fn kills_match_events() {
    let (state, events) = run(5, 45.0);
    let destroyed = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PursuerDestroyed { .. }))
        .count();
    assert_eq!(destroyed as u32, state.kills);

    let spawned = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PursuerSpawned { .. }))
        .count();
    assert!(spawned >= 2);
}

#[test]
fn tier_events_follow_survival_time() {
    let (_, events) = run(9, 61.0);
    let tiers: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::TierChanged { tier } => Some(*tier),
            _ => None,
        })
        .collect();
    assert_eq!(tiers, vec![1, 2]);
}

#[test]
fn game_over_and_restart() {
    let (mut state, _) = run(11, 10.0);
    let mut store = MemoryStore::new();

    let score = state.score.score();
    assert!(state.end_run(&mut store));
    assert_eq!(store.load().unwrap(), score);

    let over = state.drain_events();
    assert!(matches!(
        over.as_slice(),
        [GameEvent::GameOver { new_high_score: true, .. }]
    ));

    // Frozen until restart
    let before = state.survival_ms;
    tick(&mut state, &autopilot(), DT);
    assert_eq!(state.survival_ms, before);

    state.restart();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score.score(), 0);
    tick(&mut state, &TickInput::default(), DT);
    assert!(state.survival_ms > 0.0);
}

#[test]
fn events_map_to_audio_cues() {
    let (_, events) = run(13, 30.0);
    let mixer = AudioMixer::default();
    let cues = mixer.cues_for(&events);
    let boosts = events
        .iter()
        .filter(|e| matches!(e, GameEvent::BoostActivated))
        .count();
    assert_eq!(cues.iter().filter(|c| c.name() == "boost").count(), boosts);
}

#[test]
fn snapshot_serializes_for_renderers() {
    let (mut state, _) = run(17, 5.0);
    tick(
        &mut state,
        &TickInput {
            direction: Vec2::new(0.6, 0.8),
            ..Default::default()
        },
        DT,
    );
    let json = serde_json::to_string(&state.snapshot()).unwrap();
    assert!(json.contains("\"hud\""));
    assert!(json.contains("\"time_text\":\"0:05\""));
}
