//=========================================================================
// Scene Flow Integration Tests
//=========================================================================
//
// Drives the real game scenes through the frame driver with an
// in-memory store, silent audio and keyboard taps.
//
//=========================================================================

use std::time::Duration;

use mushitroom::game::model::{Mushroom, MushroomKind, MAX_ALIVE_MUSHROOMS, STARTING_MONEY};
use mushitroom::game::{register_scenes, SceneId, Services, USER_ID};
use mushitroom::prelude::*;
use mushitroom::services::{GameStore, MemoryStore, ResourceLoader, SilentAudio, Track};

const FRAME: Duration = Duration::from_millis(42);

//=== Harness =============================================================

struct Harness {
    driver: FrameDriver<SceneId, Services>,
    now: Duration,
}

impl Harness {
    fn new(store: MemoryStore) -> Self {
        let services = Services::new(
            Box::new(SilentAudio::new()),
            Box::new(store),
            ResourceLoader::new("no-such-asset-dir"),
            Size::new(320, 240),
        );
        let driver = EngineBuilder::new().build(services).init(register_scenes);
        Self { driver, now: Duration::ZERO }
    }

    fn start(mut self, scene: SceneId, args: SceneArgs) -> Self {
        assert_eq!(self.driver.start(scene, args), TickControl::Continue);
        self.frame();
        self
    }

    fn frame(&mut self) -> TickControl {
        let control = self.driver.tick(self.now);
        self.now += FRAME;
        control
    }

    /// Press and release inside one frame.
    fn tap(&mut self, key: KeyCode) -> TickControl {
        let source = self.driver.input_source();
        source.press(key);
        source.release(key);
        self.frame()
    }

    fn shutdown(&mut self) {
        self.driver.shutdown();
    }

    fn current(&self) -> Option<SceneId> {
        self.driver.current_scene()
    }

    fn store(&self) -> &dyn GameStore {
        self.driver.services().store.as_ref()
    }

    fn bgm(&self) -> Option<Track> {
        self.driver.services().audio.current_bgm()
    }
}

fn user_args(user_id: &str) -> SceneArgs {
    SceneArgs::new().with(USER_ID, user_id)
}

/// Store with one user owning `mushrooms` living mushrooms.
fn seeded(mushrooms: usize) -> (MemoryStore, String) {
    let mut store = MemoryStore::new();
    let user_id = store.create_user("Lazy Enoki").unwrap();
    for index in 0..mushrooms {
        let mushroom = Mushroom::adopt(&user_id, MushroomKind::Gombo, format!("Morel {}", index));
        store.save_mushroom(&mushroom).unwrap();
    }
    (store, user_id)
}

//=========================================================================
// Title
//=========================================================================

#[test]
fn start_button_opens_user_select() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::Title, SceneArgs::new());
    assert_eq!(game.current(), Some(SceneId::Title));
    assert_eq!(game.bgm(), Some(Track::Bgm00));

    game.tap(KeyCode::Enter);

    assert_eq!(game.current(), Some(SceneId::UserSelect));
    assert_eq!(game.bgm(), Some(Track::Bgm02));
}

#[test]
fn exit_button_quits_and_exits_last_scene() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::Title, SceneArgs::new());

    assert_eq!(game.tap(KeyCode::ArrowDown), TickControl::Continue);
    assert_eq!(game.tap(KeyCode::Enter), TickControl::Exit);
    assert_eq!(game.current(), None);
    assert_eq!(game.bgm(), None);
}

#[test]
fn title_runs_for_many_frames_without_input() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::Title, SceneArgs::new());
    for _ in 0..60 {
        assert_eq!(game.frame(), TickControl::Continue);
    }
    assert_eq!(game.current(), Some(SceneId::Title));
}

//=========================================================================
// User Select
//=========================================================================

#[test]
fn new_user_then_select_enters_lobby_with_starting_state() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::UserSelect, SceneArgs::new());

    game.tap(KeyCode::Enter);
    let users = game.store().get_all_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(game.current(), Some(SceneId::UserSelect));

    game.tap(KeyCode::ArrowDown);
    game.tap(KeyCode::Enter);

    assert_eq!(game.current(), Some(SceneId::Lobby));
    let state = game.store().get_full_game_state(&users[0].id).unwrap().unwrap();
    assert_eq!(state.money, STARTING_MONEY);
    assert_eq!(state.days, 0);
}

#[test]
fn new_user_keeps_focus_on_new_user_button() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::UserSelect, SceneArgs::new());

    game.tap(KeyCode::Enter);
    game.tap(KeyCode::Enter);

    assert_eq!(game.store().get_all_users().unwrap().len(), 2);
    assert_eq!(game.current(), Some(SceneId::UserSelect));
}

#[test]
fn escape_from_user_select_returns_to_title() {
    let mut game = Harness::new(MemoryStore::new()).start(SceneId::UserSelect, SceneArgs::new());
    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::Title));
}

//=========================================================================
// Lobby
//=========================================================================

#[test]
fn lobby_without_user_returns_to_user_select() {
    let game = Harness::new(MemoryStore::new()).start(SceneId::Lobby, SceneArgs::new());
    assert_eq!(game.current(), Some(SceneId::UserSelect));
}

#[test]
fn adopting_stops_at_limit_and_focus_moves_on() {
    let (store, user_id) = seeded(0);
    let mut game = Harness::new(store).start(SceneId::Lobby, user_args(&user_id));

    for _ in 0..MAX_ALIVE_MUSHROOMS {
        game.tap(KeyCode::Enter);
        assert_eq!(game.current(), Some(SceneId::Lobby));
    }
    assert_eq!(game.store().count_alive_mushrooms(&user_id).unwrap(), MAX_ALIVE_MUSHROOMS);

    // ADOPT is no longer selectable; focus fell to DANCE.
    game.tap(KeyCode::Enter);
    assert_eq!(game.store().count_alive_mushrooms(&user_id).unwrap(), MAX_ALIVE_MUSHROOMS);
    assert_eq!(game.current(), Some(SceneId::MushroomSelect));
}

#[test]
fn escape_from_lobby_returns_to_user_select() {
    let (store, user_id) = seeded(0);
    let mut game = Harness::new(store).start(SceneId::Lobby, user_args(&user_id));

    assert_eq!(game.bgm(), Some(Track::Bgm01));
    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::UserSelect));
}

//=========================================================================
// Feed
//=========================================================================

#[test]
fn feeding_from_lobby_updates_mushroom_and_returns() {
    let (store, user_id) = seeded(1);
    let mut game = Harness::new(store).start(SceneId::Lobby, user_args(&user_id));

    game.tap(KeyCode::ArrowRight);
    game.tap(KeyCode::ArrowRight);
    game.tap(KeyCode::Enter);
    assert_eq!(game.current(), Some(SceneId::Feed));

    game.tap(KeyCode::Enter);
    let fed = &game.store().get_user_mushrooms(&user_id).unwrap()[0];
    assert_eq!(fed.exp, 5);
    assert_eq!(fed.health, 100);

    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::Lobby));
}

#[test]
fn feed_without_user_returns_to_user_select() {
    let game = Harness::new(MemoryStore::new()).start(SceneId::Feed, SceneArgs::new());
    assert_eq!(game.current(), Some(SceneId::UserSelect));
}

//=========================================================================
// Mushroom Select
//=========================================================================

#[test]
fn mushroom_select_without_user_returns_to_title() {
    let game = Harness::new(MemoryStore::new()).start(SceneId::MushroomSelect, SceneArgs::new());
    assert_eq!(game.current(), Some(SceneId::Title));
}

#[test]
fn adopt_button_adds_a_dancer() {
    let (store, user_id) = seeded(1);
    let mut game = Harness::new(store).start(SceneId::MushroomSelect, user_args(&user_id));

    game.tap(KeyCode::Enter);

    assert_eq!(game.store().count_alive_mushrooms(&user_id).unwrap(), 2);
}

#[test]
fn mushroom_row_takes_input_after_up() {
    let (store, user_id) = seeded(2);
    let mut game = Harness::new(store).start(SceneId::MushroomSelect, user_args(&user_id));

    game.tap(KeyCode::ArrowUp);
    // Wake the cursor, then jump; neither touches the ADOPT button.
    game.tap(KeyCode::Enter);
    game.tap(KeyCode::Enter);
    game.tap(KeyCode::ArrowRight);
    for _ in 0..12 {
        game.frame();
    }
    assert_eq!(game.store().count_alive_mushrooms(&user_id).unwrap(), 2);

    game.tap(KeyCode::ArrowDown);
    game.tap(KeyCode::Enter);
    assert_eq!(game.store().count_alive_mushrooms(&user_id).unwrap(), 3);

    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::Title));
}

//=========================================================================
// Scene Teardown
//=========================================================================

/// Shuts the driver down on `scene` and checks its music went with it.
fn assert_shutdown_silences(scene: SceneId, needs_user: bool, track: Track) {
    let (store, user_id) = seeded(1);
    let args = if needs_user { user_args(&user_id) } else { SceneArgs::new() };
    let mut game = Harness::new(store).start(scene, args);
    assert_eq!(game.current(), Some(scene));
    assert_eq!(game.bgm(), Some(track));

    game.shutdown();

    assert_eq!(game.current(), None);
    assert_eq!(game.bgm(), None, "{:?} left music playing", scene);
}

#[test]
fn shutdown_stops_music_in_every_scene() {
    assert_shutdown_silences(SceneId::Title, false, Track::Bgm00);
    assert_shutdown_silences(SceneId::UserSelect, false, Track::Bgm02);
    assert_shutdown_silences(SceneId::Lobby, true, Track::Bgm01);
    assert_shutdown_silences(SceneId::Feed, true, Track::Bgm00);
    assert_shutdown_silences(SceneId::MushroomSelect, true, Track::Bgm01);
}

#[test]
fn leaving_a_scene_hands_over_to_the_next_track() {
    let (store, user_id) = seeded(1);
    let mut game = Harness::new(store).start(SceneId::Feed, user_args(&user_id));
    assert_eq!(game.bgm(), Some(Track::Bgm00));

    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::Lobby));
    assert_eq!(game.bgm(), Some(Track::Bgm01));

    game.tap(KeyCode::ArrowRight);
    game.tap(KeyCode::Enter);
    assert_eq!(game.current(), Some(SceneId::MushroomSelect));
    assert_eq!(game.bgm(), Some(Track::Bgm01));

    game.tap(KeyCode::Escape);
    assert_eq!(game.current(), Some(SceneId::Title));
    assert_eq!(game.bgm(), Some(Track::Bgm00));
}
