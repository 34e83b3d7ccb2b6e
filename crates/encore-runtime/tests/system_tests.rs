//! AudioSystem Integration Tests
//!
//! Tests for:
//! - Construction from a JSON catalog and config
//! - Ready notification
//! - Handle commands (applied on the next tick, from any thread)
//! - Sound de-duplication across frames
//! - Mixer-group routing from the catalog
//! - Pause gating through the shared context
//! - Mixer volumes and snapshots

use encore_core::{
    AudioCatalog, AudioConfig, AudioEvent, MixerBackend, PlaybackDevice, VirtualBackend, VirtualDevice,
    VirtualMixer,
};
use encore_runtime::{AudioSystem, PlayOutcome, TransitionRequest};

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

const DT: f32 = 1.0 / 64.0;

const CATALOG_JSON: &str = r#"{
    "version": "1.0",
    "tracks": [
        { "name": "title", "clip": { "id": "music/title.ogg", "length_secs": 40.0 } },
        { "name": "battle", "clip": { "id": "music/battle.ogg", "length_secs": 80.0 }, "volume": 0.5 }
    ],
    "sounds": [
        { "name": "coin", "clip": { "id": "sfx/coin.wav", "length_secs": 0.25 }, "one_shot": true, "output": "Pickups" },
        { "name": "door", "clip": { "id": "sfx/door.wav", "length_secs": 1.0 }, "output": "World" },
        { "name": "pause_menu", "clip": { "id": "sfx/menu.wav", "length_secs": 0.1 }, "play_while_paused": true }
    ]
}"#;

fn create_test_system() -> AudioSystem<VirtualDevice, VirtualMixer> {
    let _ = env_logger::builder().is_test(true).try_init();
    let catalog = AudioCatalog::from_json(CATALOG_JSON).expect("catalog parses");
    let config = AudioConfig::default().with_seed(11).with_snapshot("Underwater");
    let mut backend = VirtualBackend::new();
    AudioSystem::new(&catalog, &mut backend, VirtualMixer::new(), config)
}

fn coin_triggers(audio: &AudioSystem<VirtualDevice, VirtualMixer>) -> usize {
    audio.dispatcher().one_shot_device().one_shots().len()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_construction_and_ready() {
    let mut audio = create_test_system();

    assert_eq!(audio.scheduler().tracks().len(), 2);
    assert_eq!(audio.dispatcher().len(), 3);
    assert!(audio.scheduler().current_track_name().is_none());

    let events = audio.take_events();
    assert_eq!(events, vec![AudioEvent::Ready], "Ready fires exactly once");

    audio.tick(DT);
    audio.end_frame();
    assert!(!audio.take_events().contains(&AudioEvent::Ready));
}

#[test]
fn test_initial_volumes_from_config() {
    let _ = env_logger::builder().is_test(true).try_init();
    let catalog = AudioCatalog::from_json(CATALOG_JSON).unwrap();
    let config = AudioConfig {
        music_volume: 0.1,
        ..AudioConfig::default()
    };
    let mut backend = VirtualBackend::new();
    let audio = AudioSystem::new(&catalog, &mut backend, VirtualMixer::new(), config);

    assert_eq!(audio.mixer().music_volume(), 0.1);
    let db = audio.mixer().backend().parameter("MusicAttenuation").unwrap();
    assert!((db + 20.0).abs() < 1e-3, "0.1 linear should be -20 dB, got {}", db);
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_handle_commands_apply_on_next_tick() {
    let mut audio = create_test_system();
    let handle = audio.handle();
    audio.take_events();

    handle.play_music("title", false);
    assert!(audio.scheduler().current_track_name().is_none(), "not applied before tick");

    audio.tick(DT);
    assert_eq!(audio.scheduler().current_track_name(), Some("title"));
    assert_eq!(audio.take_events().len(), 1);

    handle.transition(TransitionRequest::new("battle", 1.0));
    for _ in 0..64 {
        audio.tick(DT);
    }
    assert_eq!(audio.scheduler().current_track_name(), Some("battle"));
    // Per-track volume scales the device, not the bus value
    assert_eq!(audio.scheduler().volume(), 1.0);
    assert_eq!(audio.scheduler().device().volume(), 0.5);
}

#[test]
fn test_handle_from_other_thread() {
    let mut audio = create_test_system();
    let handle = audio.handle();

    let worker = std::thread::spawn(move || {
        handle.play_sound("coin");
        handle.set_sound_volume(0.5);
    });
    worker.join().expect("worker thread");

    audio.tick(DT);
    assert_eq!(coin_triggers(&audio), 1);
    assert_eq!(audio.mixer().sound_volume(), 0.5);
}

#[test]
fn test_handle_music_controls() {
    let mut audio = create_test_system();
    let handle = audio.handle();

    handle.play_music("title", false);
    handle.change_music_volume(0.0, 0.5);
    handle.change_music_pitch(1.5, 0.0);
    audio.tick(DT);
    assert_eq!(audio.scheduler().pitch(), 1.5);

    for _ in 0..32 {
        audio.tick(DT);
    }
    assert_eq!(audio.scheduler().volume(), 0.0);

    handle.reset_music_volume();
    handle.pause_music(true);
    audio.tick(DT);
    assert_eq!(audio.scheduler().volume(), 1.0);
    assert!(!audio.scheduler().is_playing());
}

// ═══════════════════════════════════════════════════════════════════════════════
// SOUND DISPATCH
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_dedup_within_frame() {
    let mut audio = create_test_system();
    let handle = audio.handle();

    // Frame 1: two triggers, one audible
    handle.play_sound("coin");
    handle.play_sound("coin");
    audio.tick(DT);
    assert_eq!(coin_triggers(&audio), 1);
    audio.end_frame();

    // Frame 2: triggers again
    handle.play_sound("coin");
    audio.tick(DT);
    assert_eq!(coin_triggers(&audio), 2);
    audio.end_frame();

    // Bypass in frame 3
    assert_eq!(audio.play_sound("coin", None, false), PlayOutcome::OneShot);
    assert_eq!(audio.play_sound("coin", None, true), PlayOutcome::OneShot);
    assert_eq!(coin_triggers(&audio), 4);
}

#[test]
fn test_pause_gates_sounds() {
    let mut audio = create_test_system();
    let handle = audio.handle();

    handle.set_time_scale(0.0);
    assert!(audio.context().is_paused());

    assert_eq!(audio.play_sound("door", None, false), PlayOutcome::Paused);
    assert_eq!(audio.play_sound("pause_menu", None, false), PlayOutcome::Started);

    audio.set_time_scale(1.0);
    assert_eq!(audio.play_sound("door", None, false), PlayOutcome::Started);
}

#[test]
fn test_catalog_output_routing() {
    let mut audio = create_test_system();
    let door = audio.dispatcher().voice("door").unwrap().device().unwrap();
    assert_eq!(door.output(), Some("World"));

    audio.play_sound("coin", None, false);
    let shots = audio.dispatcher().one_shot_device().one_shots();
    assert_eq!(shots[0].clip_id, "sfx/coin.wav");
    assert_eq!(shots[0].output.as_deref(), Some("Pickups"));
}

#[test]
fn test_unknown_sound_is_total() {
    let mut audio = create_test_system();
    assert_eq!(audio.play_sound("nope", None, false), PlayOutcome::UnknownSound);
    assert_eq!(audio.play_sound("", None, false), PlayOutcome::Ignored);

    audio.handle().stop_sound("nope");
    audio.tick(DT);
}

// ═══════════════════════════════════════════════════════════════════════════════
// MIXER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_volume_events() {
    let mut audio = create_test_system();
    audio.take_events();

    audio.set_music_volume(0.25);
    audio.set_sound_volume(0.0);
    assert_eq!(
        audio.take_events(),
        vec![
            AudioEvent::MusicVolumeChanged(0.25),
            AudioEvent::SoundVolumeChanged(0.0),
        ]
    );
    assert_eq!(audio.mixer().sound_volume(), 0.001);
}

#[test]
fn test_snapshots() {
    let mut audio = create_test_system();
    audio.transition_to_snapshot("Cave", 1.0);
    audio.handle().transition_to_snapshot("Underwater", 2.0);
    audio.tick(DT);

    assert_eq!(
        audio.mixer().backend().transitions(),
        &[("Underwater".to_string(), 2.0)],
        "unregistered snapshot must be ignored"
    );
}

#[test]
fn test_pitch_table_available() {
    let mut audio = create_test_system();
    audio.pitch_table_mut().set_note_count(4);
    assert_eq!(audio.pitch_table().pitch(), 1.259);
}
