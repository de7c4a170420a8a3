//=========================================================================
// Lobby Scene
//=========================================================================
//
// Home screen of one user: name, money and day, the owned mushrooms, a
// spinning mascot and the ADOPT / DANCE / FEED buttons.
//
// ADOPT is selectable only while the user keeps fewer living mushrooms
// than the limit. Adopting rebuilds the screen in place, so the cursor
// stays on the same button position.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::{
    adopt_mushroom, can_adopt, ensure_game_state, navigate, require_user, screen_center, user_mushrooms, Ctx,
    Intents, NEXT_HORIZONTAL, PREV_HORIZONTAL, USER_ID,
};
use crate::core::input::InputAction;
use crate::core::scene::{Scene, SceneArgs};
use crate::core::time::{FrameTime, IntervalTimer};
use crate::core::ui::{Cursor, CursorMode, FocusableComponent, UiComponentManager};
use crate::game::model::{GameState, MushroomKind};
use crate::game::widgets::{ImageSprite, MotionTrigger, MushroomSprite, TextLabel};
use crate::game::{SceneId, Services};
use crate::render::{Canvas, FontStyle, Point, Size};
use crate::services::Track;

const SPIN_PERIOD: Duration = Duration::from_millis(200);
const BUTTON_SIZE: Size = Size::new(80, 25);
const BUTTON_Y: i32 = 212;
const BUTTON_GAP: i32 = 90;
const LIST_START_Y: i32 = 70;
const LIST_GAP: i32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Adopt,
    Dance,
    Feed,
}

//=== LobbyScene ==========================================================

pub struct LobbyScene {
    ui: UiComponentManager,
    intents: Intents<Intent>,

    user_id: Option<String>,
    game_state: Option<GameState>,

    mascot: Option<MotionTrigger>,
    spin: IntervalTimer,
}

impl LobbyScene {
    pub fn new() -> Self {
        let cursor = Cursor::new(BUTTON_SIZE.width + 4, BUTTON_SIZE.height + 4);
        Self {
            ui: UiComponentManager::with_cursor(cursor, CursorMode::AlwaysVisible),
            intents: Intents::new(),
            user_id: None,
            game_state: None,
            mascot: None,
            spin: IntervalTimer::new(SPIN_PERIOD),
        }
    }

    fn build(&mut self, services: &mut Services, reset: bool) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };
        let center_x = screen_center(services.screen).x;
        let header_font = services.resources.load_font(FontStyle::Bold, 13);
        let body_font = services.resources.load_font(FontStyle::Regular, 10);
        let button_font = services.resources.load_font(FontStyle::Bold, 13);

        self.ui.clear_components(reset);

        //--- Mascot --------------------------------------------------------
        let mascot = MushroomSprite::new(
            &mut services.resources,
            MushroomKind::Magui,
            Point::new(40, 40),
            Size::new(50, 50),
        );
        self.mascot = Some(mascot.trigger());
        self.ui.add_component(FocusableComponent::decoration(mascot));

        //--- Header --------------------------------------------------------
        let username = match services.store.get_user(&user_id) {
            Ok(Some(user)) => user.username,
            Ok(None) => user_id.clone(),
            Err(e) => {
                error!("Failed to load user {}: {}", user_id, e);
                user_id.clone()
            }
        };
        self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
            username,
            Point::new(center_x, 14),
            header_font,
        )));

        if let Some(state) = &self.game_state {
            self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
                format!("$ {}   DAY {}", state.money, state.days),
                Point::new(center_x, 34),
                body_font,
            )));
        }

        //--- Mushroom List -------------------------------------------------
        let mushrooms = user_mushrooms(services.store.as_ref(), &user_id);
        if mushrooms.is_empty() {
            self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
                "No mushrooms yet",
                Point::new(center_x, 110),
                body_font,
            )));
        }
        for (row, mushroom) in mushrooms.iter().enumerate() {
            let status = if mushroom.is_alive { "" } else { " [gone]" };
            self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
                format!("{}. {} (Lv.{}){}", row + 1, mushroom.name, mushroom.level, status),
                Point::new(center_x, LIST_START_Y + row as i32 * LIST_GAP),
                body_font,
            )));
        }

        //--- Buttons -------------------------------------------------------
        let adoptable = can_adopt(services.store.as_ref(), &user_id);
        let buttons = [
            ("ADOPT", "images/btn_adopt.png", Intent::Adopt, adoptable),
            ("DANCE", "images/btn_dance.png", Intent::Dance, true),
            ("FEED", "images/btn_supply.png", Intent::Feed, true),
        ];
        for (column, (label, image, intent, selectable)) in buttons.into_iter().enumerate() {
            let center = Point::new(center_x + (column as i32 - 1) * BUTTON_GAP, BUTTON_Y);
            let sprite = ImageSprite::load(&mut services.resources, image, center, BUTTON_SIZE)
                .with_fallback_label(label, button_font);
            self.ui
                .add_component(FocusableComponent::new(sprite, selectable).on_activate(self.intents.post(intent)));
        }
    }
}

impl Default for LobbyScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId, Services> for LobbyScene {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, args: &SceneArgs) {
        ctx.services.audio.play_bgm(Track::Bgm01);

        self.user_id = require_user(ctx, args, "Lobby", SceneId::UserSelect);
        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        self.game_state = ensure_game_state(ctx.services.store.as_mut(), &user_id);
        self.build(ctx.services, true);
        self.spin.start(&ctx.time);
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>) {
        self.ui.clear_components(true);
        self.mascot = None;
        self.spin.stop();
        ctx.services.audio.stop_bgm();
    }

    fn handle_input(&mut self, ctx: &mut Ctx<'_>) {
        if ctx.input.is_just_pressed(InputAction::Escape) {
            ctx.switch_scene(SceneId::UserSelect, SceneArgs::new());
            return;
        }

        navigate(&mut self.ui, ctx.input, ctx.services.audio.as_mut(), PREV_HORIZONTAL, NEXT_HORIZONTAL);

        if ctx.input.is_just_pressed(InputAction::Enter) {
            self.ui.activate_current();
        }

        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        for intent in self.intents.drain() {
            match intent {
                Intent::Adopt => {
                    if adopt_mushroom(ctx.services.store.as_mut(), &user_id).is_some() {
                        self.build(ctx.services, false);
                    }
                }
                Intent::Dance => {
                    debug!("Dance requested by {}", user_id);
                    ctx.switch_scene(SceneId::MushroomSelect, SceneArgs::new().with(USER_ID, user_id.as_str()));
                }
                Intent::Feed => {
                    ctx.switch_scene(SceneId::Feed, SceneArgs::new().with(USER_ID, user_id.as_str()));
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) {
        if self.spin.tick(&ctx.time) {
            if let Some(mascot) = &self.mascot {
                mascot.rotate();
            }
        }
        self.ui.update(&ctx.time);
    }

    fn draw(&self, canvas: &mut Canvas, time: &FrameTime) {
        self.ui.draw(canvas, time);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::scenes::bench::SceneBench;
    use crate::services::{GameStore, MemoryStore};

    #[test]
    fn exit_stops_music_and_mascot() {
        let mut store = MemoryStore::new();
        let user_id = store.create_user("Lazy Enoki").unwrap();
        let mut bench = SceneBench::new(store);
        let mut scene = LobbyScene::new();

        bench.enter(&mut scene, &SceneArgs::new().with(USER_ID, user_id.as_str()));
        assert_eq!(bench.bgm(), Some(Track::Bgm01));
        assert!(scene.spin.is_running());
        assert!(scene.mascot.is_some());

        bench.exit(&mut scene);
        assert_eq!(bench.bgm(), None);
        assert!(!scene.spin.is_running());
        assert!(scene.mascot.is_none());
        assert!(scene.ui.is_empty());
    }

    #[test]
    fn missing_user_requests_user_select() {
        let mut bench = SceneBench::new(MemoryStore::new());
        let mut scene = LobbyScene::new();

        bench.enter(&mut scene, &SceneArgs::new());

        assert!(!scene.spin.is_running());
        assert_eq!(bench.transitions.len(), 1);
        bench.exit(&mut scene);
        assert_eq!(bench.bgm(), None);
    }
}
