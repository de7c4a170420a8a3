//=========================================================================
// Game Scenes
//=========================================================================
//
// The five screens of the game and the helpers they share.
//
// Component callbacks cannot reach the scene context, so each scene
// hands its callbacks the sending half of an `Intents` channel and
// drains it right after `activate_current()`, when the context is in
// hand again.
//
//=========================================================================

//=== Submodules ==========================================================

mod feed;
mod lobby;
mod mushroom_select;
mod title;
mod user_select;

pub use feed::FeedScene;
pub use lobby::LobbyScene;
pub use mushroom_select::MushroomSelectScene;
pub use title::TitleScene;
pub use user_select::UserSelectScene;

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender};
use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::model::{GameState, Mushroom, MAX_ALIVE_MUSHROOMS, STARTING_DAYS, STARTING_MONEY};
use super::names;
use super::{SceneId, Services};
use crate::core::input::{InputAction, InputState};
use crate::core::scene::{SceneArgs, SceneContext};
use crate::core::ui::UiComponentManager;
use crate::render::{Point, Size};
use crate::services::{AudioService, GameStore, Track};

/// Scene argument carrying the selected user's id.
pub const USER_ID: &str = "user_id";

type Ctx<'a> = SceneContext<'a, SceneId, Services>;

//=== Input Groups ========================================================

const PREV_ANY: &[InputAction] = &[InputAction::Up, InputAction::Left, InputAction::Prev];
const NEXT_ANY: &[InputAction] = &[InputAction::Down, InputAction::Right, InputAction::Next];
const PREV_VERTICAL: &[InputAction] = &[InputAction::Up, InputAction::Prev];
const NEXT_VERTICAL: &[InputAction] = &[InputAction::Down, InputAction::Next];
const PREV_HORIZONTAL: &[InputAction] = &[InputAction::Left, InputAction::Prev];
const NEXT_HORIZONTAL: &[InputAction] = &[InputAction::Right, InputAction::Next];

fn any_just_pressed(input: &InputState, actions: &[InputAction]) -> bool {
    actions.iter().any(|action| input.is_just_pressed(*action))
}

/// Moves focus one step if any of `prev` / `next` was just pressed, and
/// plays the click when focus actually changed.
fn navigate(
    ui: &mut UiComponentManager,
    input: &InputState,
    audio: &mut dyn AudioService,
    prev: &[InputAction],
    next: &[InputAction],
) {
    let before = ui.focused_index();

    if any_just_pressed(input, prev) {
        ui.select_prev();
    } else if any_just_pressed(input, next) {
        ui.select_next();
    }

    if ui.focused_index() != before {
        audio.play_sfx(Track::Click);
    }
}

//=== Intents =============================================================

/// Queue from component callbacks back to their scene.
#[derive(Debug)]
struct Intents<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
}

impl<T: Clone + 'static> Intents<T> {
    fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Callback that posts `intent` each time it runs.
    fn post(&self, intent: T) -> impl FnMut() + 'static {
        let tx = self.tx.clone();
        move || {
            let _ = tx.send(intent.clone());
        }
    }

    fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

//=== Layout ==============================================================

fn screen_center(screen: Size) -> Point {
    Point::new(screen.width as i32 / 2, screen.height as i32 / 2)
}

//=== Shared Game Logic ===================================================

/// Returns the `user_id` argument, or queues `fallback` and returns `None`.
fn require_user(ctx: &mut Ctx<'_>, args: &SceneArgs, scene: &str, fallback: SceneId) -> Option<String> {
    match args.get(USER_ID) {
        Some(user_id) => Some(user_id.to_string()),
        None => {
            warn!("{} entered without a {}, returning to {:?}", scene, USER_ID, fallback);
            ctx.switch_scene(fallback, SceneArgs::new());
            None
        }
    }
}

/// Loads the user's game state, creating the starting one on first visit.
fn ensure_game_state(store: &mut dyn GameStore, user_id: &str) -> Option<GameState> {
    match store.get_full_game_state(user_id) {
        Ok(Some(state)) => return Some(state),
        Ok(None) => {}
        Err(e) => {
            error!("Failed to load game state for {}: {}", user_id, e);
            return None;
        }
    }

    match store.save_game_state(user_id, STARTING_MONEY, STARTING_DAYS) {
        Ok(state) => {
            info!("Created starting game state for {}", user_id);
            Some(state)
        }
        Err(e) => {
            error!("Failed to create game state for {}: {}", user_id, e);
            None
        }
    }
}

fn count_alive(store: &dyn GameStore, user_id: &str) -> usize {
    store.count_alive_mushrooms(user_id).unwrap_or_else(|e| {
        error!("Failed to count mushrooms of {}: {}", user_id, e);
        0
    })
}

fn can_adopt(store: &dyn GameStore, user_id: &str) -> bool {
    count_alive(store, user_id) < MAX_ALIVE_MUSHROOMS
}

/// Adopts a mushroom of a random species. Returns it if it was stored.
fn adopt_mushroom(store: &mut dyn GameStore, user_id: &str) -> Option<Mushroom> {
    if !can_adopt(store, user_id) {
        warn!("{} already keeps {} mushrooms", user_id, MAX_ALIVE_MUSHROOMS);
        return None;
    }

    let kind = names::random_kind();
    let mushroom = Mushroom::adopt(user_id, kind, names::random_mushroom_name(kind));

    match store.save_mushroom(&mushroom) {
        Ok(()) => {
            info!("{} adopted {} ({:?})", user_id, mushroom.name, kind);
            Some(mushroom)
        }
        Err(e) => {
            error!("Adoption failed: {}", e);
            None
        }
    }
}

fn user_mushrooms(store: &dyn GameStore, user_id: &str) -> Vec<Mushroom> {
    store.get_user_mushrooms(user_id).unwrap_or_else(|e| {
        error!("Failed to load mushrooms of {}: {}", user_id, e);
        Vec::new()
    })
}

//=== Scene Bench =========================================================

#[cfg(test)]
mod bench {
    use super::*;
    use crate::core::scene::{Scene, TransitionQueue};
    use crate::core::time::FrameTime;
    use crate::services::{MemoryStore, ResourceLoader, SilentAudio};

    /// Runs single lifecycle calls of one scene outside the frame driver.
    pub(super) struct SceneBench {
        pub(super) services: Services,
        pub(super) transitions: TransitionQueue<SceneId>,
        input: InputState,
    }

    impl SceneBench {
        pub(super) fn new(store: MemoryStore) -> Self {
            Self {
                services: Services::new(
                    Box::new(SilentAudio::new()),
                    Box::new(store),
                    ResourceLoader::new("no-such-asset-dir"),
                    Size::new(320, 240),
                ),
                transitions: TransitionQueue::new(),
                input: InputState::new(),
            }
        }

        pub(super) fn enter(&mut self, scene: &mut dyn Scene<SceneId, Services>, args: &SceneArgs) {
            let mut ctx = SceneContext::new(&self.input, FrameTime::ZERO, &mut self.transitions, &mut self.services);
            scene.on_enter(&mut ctx, args);
        }

        pub(super) fn exit(&mut self, scene: &mut dyn Scene<SceneId, Services>) {
            let mut ctx = SceneContext::new(&self.input, FrameTime::ZERO, &mut self.transitions, &mut self.services);
            scene.on_exit(&mut ctx);
        }

        pub(super) fn bgm(&self) -> Option<Track> {
            self.services.audio.current_bgm()
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MemoryStore, SilentAudio};

    #[test]
    fn first_visit_creates_starting_state() {
        let mut store = MemoryStore::new();
        let user = store.create_user("Shy Spore").unwrap();

        let state = ensure_game_state(&mut store, &user).unwrap();
        assert_eq!(state.money, STARTING_MONEY);
        assert_eq!(state.days, STARTING_DAYS);

        store.save_game_state(&user, 55, 3).unwrap();
        assert_eq!(ensure_game_state(&mut store, &user).unwrap().money, 55);
    }

    #[test]
    fn adoption_stops_at_living_limit() {
        let mut store = MemoryStore::new();
        let user = store.create_user("Busy Mold").unwrap();

        for _ in 0..MAX_ALIVE_MUSHROOMS {
            assert!(adopt_mushroom(&mut store, &user).is_some());
        }
        assert!(!can_adopt(&store, &user));
        assert!(adopt_mushroom(&mut store, &user).is_none());
        assert_eq!(user_mushrooms(&store, &user).len(), MAX_ALIVE_MUSHROOMS);
    }

    #[test]
    fn intents_reach_scene_in_order() {
        let intents = Intents::new();
        let mut first = intents.post(1);
        let mut second = intents.post(2);

        second();
        first();
        assert_eq!(intents.drain(), vec![2, 1]);
        assert!(intents.drain().is_empty());
    }

    #[test]
    fn navigation_clicks_only_on_focus_change() {
        use crate::core::ui::FocusableComponent;
        use crate::game::widgets::TextLabel;
        use crate::render::Font;

        let mut ui = UiComponentManager::new();
        ui.add_component(FocusableComponent::selectable(TextLabel::new("A", Point::new(10, 10), Font::default())));

        let mut audio = SilentAudio::new();
        let mut input = InputState::new();
        input.press(InputAction::Down, crate::core::input::PhysicalInput::Pin(1));

        // A single selectable wraps onto itself.
        navigate(&mut ui, &input, &mut audio, PREV_ANY, NEXT_ANY);
        assert_eq!(audio.sfx_played(), 0);

        ui.add_component(FocusableComponent::selectable(TextLabel::new("B", Point::new(10, 30), Font::default())));
        navigate(&mut ui, &input, &mut audio, PREV_ANY, NEXT_ANY);
        assert_eq!(audio.sfx_played(), 1);
        assert_eq!(ui.focused_index(), Some(1));
    }
}
