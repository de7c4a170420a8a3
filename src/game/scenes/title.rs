//=========================================================================
// Title Scene
//=========================================================================
//
// Game title, START / EXIT, and three mushrooms turning in place.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use super::{navigate, screen_center, Ctx, Intents, NEXT_ANY, PREV_ANY};
use crate::core::input::InputAction;
use crate::core::scene::{Scene, SceneArgs};
use crate::core::time::{FrameTime, IntervalTimer};
use crate::core::ui::{Cursor, CursorMode, FocusableComponent, UiComponentManager};
use crate::game::model::MushroomKind;
use crate::game::widgets::{Button, MotionTrigger, MushroomSprite, TextLabel};
use crate::game::{SceneId, Services};
use crate::render::{Canvas, FontStyle, Point, Size};
use crate::services::Track;

const TITLE: &str = "MUSHITROOM";
const SPIN_PERIOD: Duration = Duration::from_millis(400);
const BUTTON_SIZE: Size = Size::new(100, 30);
const MUSHROOM_SIZE: Size = Size::new(50, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Start,
    Exit,
}

//=== TitleScene ==========================================================

pub struct TitleScene {
    ui: UiComponentManager,
    intents: Intents<Intent>,
    mascots: Vec<MotionTrigger>,
    spin: IntervalTimer,
}

impl TitleScene {
    pub fn new() -> Self {
        let cursor = Cursor::new(BUTTON_SIZE.width + 4, BUTTON_SIZE.height + 4);
        Self {
            ui: UiComponentManager::with_cursor(cursor, CursorMode::AlwaysVisible),
            intents: Intents::new(),
            mascots: Vec::new(),
            spin: IntervalTimer::new(SPIN_PERIOD),
        }
    }

    fn build(&mut self, services: &mut Services) {
        let center = screen_center(services.screen);
        let title_font = services.resources.load_font(FontStyle::Heavy, 20);
        let button_font = services.resources.load_font(FontStyle::Bold, 14);

        self.ui.clear_components(true);
        self.mascots.clear();

        self.ui.add_component(FocusableComponent::decoration(TextLabel::new(
            TITLE,
            Point::new(center.x, center.y / 2),
            title_font,
        )));

        self.ui.add_component(
            FocusableComponent::selectable(Button::new(
                "START",
                Point::new(center.x, center.y + 50),
                BUTTON_SIZE,
                button_font,
            ))
            .on_activate(self.intents.post(Intent::Start)),
        );
        self.ui.add_component(
            FocusableComponent::selectable(Button::new(
                "EXIT",
                Point::new(center.x, center.y + 95),
                BUTTON_SIZE,
                button_font,
            ))
            .on_activate(self.intents.post(Intent::Exit)),
        );

        let lineup = [
            (MushroomKind::Magui, center.x - center.x / 2),
            (MushroomKind::Gombo, center.x),
            (MushroomKind::Magui, center.x + center.x / 2),
        ];
        for (kind, x) in lineup {
            let sprite = MushroomSprite::new(&mut services.resources, kind, Point::new(x, center.y - 5), MUSHROOM_SIZE);
            self.mascots.push(sprite.trigger());
            self.ui.add_component(FocusableComponent::decoration(sprite));
        }
    }
}

impl Default for TitleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<SceneId, Services> for TitleScene {
    fn on_enter(&mut self, ctx: &mut Ctx<'_>, _args: &SceneArgs) {
        ctx.services.audio.play_bgm(Track::Bgm00);
        self.build(ctx.services);
        self.spin.start(&ctx.time);
    }

    fn on_exit(&mut self, ctx: &mut Ctx<'_>) {
        self.spin.stop();
        self.ui.clear_components(true);
        self.mascots.clear();
        ctx.services.audio.stop_bgm();
    }

    fn handle_input(&mut self, ctx: &mut Ctx<'_>) {
        navigate(&mut self.ui, ctx.input, ctx.services.audio.as_mut(), PREV_ANY, NEXT_ANY);

        if ctx.input.is_just_pressed(InputAction::Enter) {
            self.ui.activate_current();
        }

        for intent in self.intents.drain() {
            match intent {
                Intent::Start => ctx.switch_scene(SceneId::UserSelect, SceneArgs::new()),
                Intent::Exit => {
                    info!("Exit selected on title screen");
                    ctx.quit();
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) {
        if self.spin.tick(&ctx.time) {
            for mascot in &self.mascots {
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
