//=========================================================================
// User Select Scene
//=========================================================================
//
// A NEW USER button followed by one button per stored user, newest
// first. The list scrolls so the focused button stays on screen.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use super::{navigate, screen_center, Ctx, Intents, NEXT_VERTICAL, PREV_VERTICAL, USER_ID};
use crate::core::input::InputAction;
use crate::core::scene::{Scene, SceneArgs};
use crate::core::time::FrameTime;
use crate::core::ui::{Cursor, CursorMode, FocusableComponent, UiComponentManager};
use crate::game::names;
use crate::game::widgets::Button;
use crate::game::{SceneId, Services};
use crate::render::{Canvas, FontStyle, Point, Size};
use crate::services::Track;

const BUTTON_SIZE: Size = Size::new(100, 30);
const NEW_USER_Y: i32 = 35;
const LIST_START_Y: i32 = 75;
const LIST_GAP: i32 = 10;

/// Distance kept between the focused button and the screen edges.
const SCROLL_MARGIN: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    NewUser,
    Select(String),
}

//=== UserSelectScene =====================================================

pub struct UserSelectScene {
    ui: UiComponentManager,
    intents: Intents<Intent>,
    screen_height: i32,
}

impl UserSelectScene {
    pub fn new() -> Self {
        let cursor = Cursor::new(BUTTON_SIZE.width + 4, BUTTON_SIZE.height + 4);
        Self {
            ui: UiComponentManager::with_cursor(cursor, CursorMode::AlwaysVisible),
            intents: Intents::new(),
            screen_height: 0,
        }
    }

    //--- rebuild() --------------------------------------------------------
    //
    // Re-reads the users and rebuilds the list. With `reset == false` the
    // focused position survives, so creating a user leaves the cursor on
    // NEW USER.
    //
    fn rebuild(&mut self, services: &mut Services, reset: bool) {
        let center_x = screen_center(services.screen).x;
        let font = services.resources.load_font(FontStyle::Bold, 10);
        self.screen_height = services.screen.height as i32;

        let users = services.store.get_all_users().unwrap_or_else(|e| {
            error!("Failed to list users: {}", e);
            Vec::new()
        });

        self.ui.clear_components(reset);

        self.ui.add_component(
            FocusableComponent::selectable(Button::new(
                "[ NEW USER ]",
                Point::new(center_x, NEW_USER_Y),
                BUTTON_SIZE,
                font,
            ))
            .on_activate(self.intents.post(Intent::NewUser)),
        );

        let step = BUTTON_SIZE.height as i32 + LIST_GAP;
        for (row, user) in users.into_iter().enumerate() {
            let y = LIST_START_Y + row as i32 * step;
            self.ui.add_component(
                FocusableComponent::selectable(Button::new(&user.username, Point::new(center_x, y), BUTTON_SIZE, font))
                    .on_activate(self.intents.post(Intent::Select(user.id))),
            );
        }

        self.keep_focus_visible();
    }

    fn create_user(&mut self, services: &mut Services) {
        let name = names::random_user_name();
        match services.store.create_user(&name) {
            Ok(id) => info!("Created user {} ({})", name, id),
            Err(e) => error!("Failed to create user {}: {}", name, e),
        }
        self.rebuild(services, false);
    }

    /// Shifts every component vertically so the focused one is on screen.
    fn keep_focus_visible(&mut self) {
        let Some(focused) = self.ui.focused_component().map(|c| c.bounds()) else {
            return;
        };

        let top = focused.top_left.y;
        let bottom = top + focused.size.height as i32;
        let shift = if bottom > self.screen_height - SCROLL_MARGIN {
            self.screen_height - SCROLL_MARGIN - bottom
        } else if top < SCROLL_MARGIN {
            SCROLL_MARGIN - top
        } else {
            return;
        };

        for id in 0..self.ui.len() {
            if let Some(component) = self.ui.component_mut(id) {
                let center = component.center();
                component.render_object_mut().set_center(center + Point::new(0, shift));
            }
        }
    }
}

impl Default for UserSelectScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId, Services> for UserSelectScene {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _args: &SceneArgs) {
        ctx.services.audio.play_bgm(Track::Bgm02);
        self.rebuild(ctx.services, true);
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>) {
        self.ui.clear_components(true);
        ctx.services.audio.stop_bgm();
    }

    fn handle_input(&mut self, ctx: &mut Ctx<'_>) {
        if ctx.input.is_just_pressed(InputAction::Escape) {
            ctx.switch_scene(SceneId::Title, SceneArgs::new());
            return;
        }

        let before = self.ui.focused_index();
        navigate(&mut self.ui, ctx.input, ctx.services.audio.as_mut(), PREV_VERTICAL, NEXT_VERTICAL);
        if self.ui.focused_index() != before {
            self.keep_focus_visible();
        }

        if ctx.input.is_just_pressed(InputAction::Enter) {
            self.ui.activate_current();
        }

        for intent in self.intents.drain() {
            match intent {
                Intent::NewUser => self.create_user(ctx.services),
                Intent::Select(user_id) => {
                    info!("User {} selected", user_id);
                    ctx.switch_scene(SceneId::Lobby, SceneArgs::new().with(USER_ID, user_id));
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
    use crate::game::scenes::bench::SceneBench;
    use crate::services::MemoryStore;

    #[test]
    fn exit_stops_music_and_clears_list() {
        let mut bench = SceneBench::new(MemoryStore::new());
        let mut scene = UserSelectScene::new();

        bench.enter(&mut scene, &SceneArgs::new());
        assert_eq!(bench.bgm(), Some(Track::Bgm02));
        assert_eq!(scene.ui.selectable_len(), 1);

        bench.exit(&mut scene);
        assert_eq!(bench.bgm(), None);
        assert!(scene.ui.is_empty());
    }
}
