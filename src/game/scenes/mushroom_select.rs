//=========================================================================
// Mushroom Select Scene
//=========================================================================
//
// The dance floor: the user's living mushrooms side by side above an
// ADOPT button.
//
// Two managers share the screen. UP hands input to the mushroom row,
// DOWN back to the buttons; only the enabled manager sees navigation and
// activation. The mushroom row uses the wake-on-activate cursor: the
// first ENTER shows the cursor, the next one makes the focused mushroom
// jump. Focusing a mushroom turns it.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{
    adopt_mushroom, ensure_game_state, navigate, require_user, screen_center, user_mushrooms, Ctx, Intents,
    NEXT_HORIZONTAL, PREV_HORIZONTAL,
};
use crate::core::input::InputAction;
use crate::core::scene::{Scene, SceneArgs};
use crate::core::time::FrameTime;
use crate::core::ui::{Cursor, CursorMode, FocusableComponent, UiComponentManager};
use crate::game::widgets::{Button, MushroomSprite, TextLabel};
use crate::game::{SceneId, Services};
use crate::render::{Canvas, FontStyle, Point, Size};
use crate::services::Track;

const BUTTON_SIZE: Size = Size::new(106, 33);
const MUSHROOM_SIZE: Size = Size::new(50, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Adopt,
}

/// Which manager currently receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Buttons,
    Mushrooms,
}

//=== MushroomSelectScene =================================================

pub struct MushroomSelectScene {
    buttons: UiComponentManager,
    mushrooms: UiComponentManager,
    intents: Intents<Intent>,
    focus: Focus,
    user_id: Option<String>,
}

impl MushroomSelectScene {
    pub fn new() -> Self {
        let button_cursor = Cursor::new(BUTTON_SIZE.width + 4, BUTTON_SIZE.height + 4);
        let mushroom_cursor = Cursor::hat_only(MUSHROOM_SIZE.width, MUSHROOM_SIZE.height);
        Self {
            buttons: UiComponentManager::with_cursor(button_cursor, CursorMode::AlwaysVisible),
            mushrooms: UiComponentManager::with_cursor(mushroom_cursor, CursorMode::WakeOnActivate),
            intents: Intents::new(),
            focus: Focus::Buttons,
            user_id: None,
        }
    }

    fn build_buttons(&mut self, services: &mut Services) {
        let center = screen_center(services.screen);
        let font = services.resources.load_font(FontStyle::Bold, 14);

        self.buttons.clear_components(true);
        self.buttons.add_component(
            FocusableComponent::selectable(Button::new(
                "ADOPT",
                Point::new(center.x, center.y + center.y / 2),
                BUTTON_SIZE,
                font,
            ))
            .on_activate(self.intents.post(Intent::Adopt)),
        );
    }

    fn build_mushrooms(&mut self, services: &mut Services, reset: bool) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        let center = screen_center(services.screen);
        let name_font = services.resources.load_font(FontStyle::Bold, 10);

        self.mushrooms.clear_components(reset);

        let alive = user_mushrooms(services.store.as_ref(), user_id)
            .into_iter()
            .filter(|mushroom| mushroom.is_alive);

        // First mushroom in the middle, then left, then right.
        let slots = [center.x, center.x - center.x / 2, center.x + center.x / 2];
        let y = center.y - center.y / 3;

        for (mushroom, x) in alive.zip(slots) {
            let position = Point::new(x, y);
            self.mushrooms.add_component(FocusableComponent::decoration(TextLabel::new(
                mushroom.name.as_str(),
                Point::new(x, y + MUSHROOM_SIZE.height as i32 / 2 + 12),
                name_font,
            )));

            let sprite = MushroomSprite::new(&mut services.resources, mushroom.kind, position, MUSHROOM_SIZE);
            let turn = sprite.trigger();
            let jump = sprite.trigger();
            self.mushrooms.add_component(
                FocusableComponent::selectable(sprite)
                    .on_focus(move || turn.rotate())
                    .on_activate(move || jump.jump()),
            );
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.buttons.set_enabled(focus == Focus::Buttons);
        self.mushrooms.set_enabled(focus == Focus::Mushrooms);
    }

    fn active(&mut self) -> &mut UiComponentManager {
        match self.focus {
            Focus::Buttons => &mut self.buttons,
            Focus::Mushrooms => &mut self.mushrooms,
        }
    }
}

impl Default for MushroomSelectScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId, Services> for MushroomSelectScene {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, args: &SceneArgs) {
        self.user_id = require_user(ctx, args, "Mushroom select", SceneId::Title);
        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        ctx.services.audio.play_bgm(Track::Bgm01);
        ensure_game_state(ctx.services.store.as_mut(), &user_id);
        self.build_buttons(ctx.services);
        self.build_mushrooms(ctx.services, true);
        self.set_focus(Focus::Buttons);
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>) {
        self.buttons.clear_components(true);
        self.mushrooms.clear_components(true);
        ctx.services.audio.stop_bgm();
    }

    fn handle_input(&mut self, ctx: &mut Ctx<'_>) {
        let input = ctx.input;

        if input.is_just_pressed(InputAction::Escape) {
            ctx.switch_scene(SceneId::Title, SceneArgs::new());
            return;
        }

        if input.is_just_pressed(InputAction::Up) && self.mushrooms.selectable_len() > 0 {
            self.set_focus(Focus::Mushrooms);
        } else if input.is_just_pressed(InputAction::Down) {
            self.set_focus(Focus::Buttons);
        }

        let audio = ctx.services.audio.as_mut();
        navigate(self.active(), input, audio, PREV_HORIZONTAL, NEXT_HORIZONTAL);

        if input.is_just_pressed(InputAction::Enter) {
            self.active().activate_current();
        }

        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        for intent in self.intents.drain() {
            match intent {
                Intent::Adopt => {
                    if adopt_mushroom(ctx.services.store.as_mut(), &user_id).is_some() {
                        self.build_mushrooms(ctx.services, false);
                    }
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) {
        self.mushrooms.update(&ctx.time);
        self.buttons.update(&ctx.time);
    }

    fn draw(&self, canvas: &mut Canvas, time: &FrameTime) {
        self.mushrooms.draw(canvas, time);
        self.buttons.draw(canvas, time);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
