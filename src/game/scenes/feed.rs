//=========================================================================
// Feed Scene
//=========================================================================
//
// Lists the user's living mushrooms; activating one feeds it and saves
// the result.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    navigate, require_user, screen_center, user_mushrooms, Ctx, Intents, NEXT_VERTICAL, PREV_VERTICAL, USER_ID,
};
use crate::core::input::InputAction;
use crate::core::scene::{Scene, SceneArgs};
use crate::core::time::FrameTime;
use crate::core::ui::{Cursor, CursorMode, FocusableComponent, UiComponentManager};
use crate::game::widgets::{Button, TextLabel};
use crate::game::{SceneId, Services};
use crate::render::{Canvas, FontStyle, Point, Size};
use crate::services::{GameStore, Track};

const ENTRY_SIZE: Size = Size::new(240, 30);
const LIST_START_Y: i32 = 60;
const LIST_GAP: i32 = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    Feed(String),
}

//=== FeedScene ===========================================================

pub struct FeedScene {
    ui: UiComponentManager,
    intents: Intents<Intent>,
    user_id: Option<String>,
}

impl FeedScene {
    pub fn new() -> Self {
        let cursor = Cursor::new(ENTRY_SIZE.width + 4, ENTRY_SIZE.height + 4);
        Self {
            ui: UiComponentManager::with_cursor(cursor, CursorMode::AlwaysVisible),
            intents: Intents::new(),
            user_id: None,
        }
    }

    fn build(&mut self, services: &mut Services, reset: bool) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        let center_x = screen_center(services.screen).x;
        let title_font = services.resources.load_font(FontStyle::Bold, 15);
        let entry_font = services.resources.load_font(FontStyle::Regular, 8);

        self.ui.clear_components(reset);
        self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
            "FEED",
            Point::new(center_x, 22),
            title_font,
        )));

        let alive: Vec<_> = user_mushrooms(services.store.as_ref(), user_id)
            .into_iter()
            .filter(|mushroom| mushroom.is_alive)
            .collect();

        if alive.is_empty() {
            self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
                "No mushrooms to feed",
                Point::new(center_x, LIST_START_Y + LIST_GAP),
                entry_font,
            )));
            return;
        }

        for (row, mushroom) in alive.into_iter().enumerate() {
            let caption = format!("{}  HP {}  Lv.{}", mushroom.name, mushroom.health, mushroom.level);
            let center = Point::new(center_x, LIST_START_Y + row as i32 * LIST_GAP);
            self.ui.add_component(
                FocusableComponent::selectable(Button::new(caption, center, ENTRY_SIZE, entry_font))
                    .on_activate(self.intents.post(Intent::Feed(mushroom.id))),
            );
        }
    }
}

impl Default for FeedScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds one mushroom and saves it. Returns `true` if it was saved.
fn feed(store: &mut dyn GameStore, mushroom_id: &str) -> bool {
    let mut mushroom = match store.get_mushroom(mushroom_id) {
        Ok(Some(mushroom)) if mushroom.is_alive => mushroom,
        Ok(_) => {
            warn!("Mushroom {} cannot be fed", mushroom_id);
            return false;
        }
        Err(e) => {
            error!("Failed to load mushroom {}: {}", mushroom_id, e);
            return false;
        }
    };

    if mushroom.feed() {
        info!("{} reached level {}", mushroom.name, mushroom.level);
    }

    match store.save_mushroom(&mushroom) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save {}: {}", mushroom.name, e);
            false
        }
    }
}

impl Scene<SceneId, Services> for FeedScene {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, args: &SceneArgs) {
        ctx.services.audio.play_bgm(Track::Bgm00);

        self.user_id = require_user(ctx, args, "Feed", SceneId::UserSelect);
        self.build(ctx.services, true);
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>) {
        self.ui.clear_components(true);
        ctx.services.audio.stop_bgm();
    }

    fn handle_input(&mut self, ctx: &mut Ctx<'_>) {
        if ctx.input.is_just_pressed(InputAction::Escape) {
            let mut args = SceneArgs::new();
            if let Some(user_id) = &self.user_id {
                args.insert(USER_ID, user_id.as_str());
            }
            ctx.switch_scene(SceneId::Lobby, args);
            return;
        }

        navigate(&mut self.ui, ctx.input, ctx.services.audio.as_mut(), PREV_VERTICAL, NEXT_VERTICAL);

        if ctx.input.is_just_pressed(InputAction::Enter) {
            self.ui.activate_current();
        }

        for intent in self.intents.drain() {
            match intent {
                Intent::Feed(mushroom_id) => {
                    if feed(ctx.services.store.as_mut(), &mushroom_id) {
                        self.build(ctx.services, false);
                    }
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) {
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
    use crate::game::model::{Mushroom, MushroomKind};
    use crate::game::scenes::bench::SceneBench;
    use crate::services::MemoryStore;

    #[test]
    fn exit_stops_music_and_clears_entries() {
        let mut store = MemoryStore::new();
        let user_id = store.create_user("Shy Spore").unwrap();
        store.save_mushroom(&Mushroom::adopt(&user_id, MushroomKind::Magui, "Puffy Magui")).unwrap();
        let mut bench = SceneBench::new(store);
        let mut scene = FeedScene::new();

        bench.enter(&mut scene, &SceneArgs::new().with(USER_ID, user_id.as_str()));
        assert_eq!(bench.bgm(), Some(Track::Bgm00));
        assert_eq!(scene.ui.selectable_len(), 1);

        bench.exit(&mut scene);
        assert_eq!(bench.bgm(), None);
        assert!(scene.ui.is_empty());
    }
}
