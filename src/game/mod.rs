//=========================================================================
// Mushitroom Game
//
// Composition root of the pet-raising game: the scene ids, the service
// bundle every scene runs against, and scene registration.
//
// Scene graph:
// ```text
//   Title ──START──> UserSelect ──user──> Lobby ──FEED──> Feed
//     ↑                  ↑   │              │  ↑            │
//     │                  └─ESC┘            ESC └────ESC─────┘
//     │                                     │
//     └────────ESC──── MushroomSelect <─DANCE
// ```
//
//=========================================================================

//=== Submodules ==========================================================

pub mod model;
pub mod names;
mod scenes;
pub mod widgets;

//=== Public API ==========================================================

pub use scenes::{FeedScene, LobbyScene, MushroomSelectScene, TitleScene, UserSelectScene, USER_ID};

//=== Internal Dependencies ===============================================

use crate::core::scene::{Scene, SceneKey, SceneManager};
use crate::render::Size;
use crate::services::{AudioService, GameStore, ResourceLoader};

//=== SceneId =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Title,
    UserSelect,
    Lobby,
    Feed,
    MushroomSelect,
}

impl SceneKey for SceneId {}

//=== Services ============================================================

/// Collaborators shared by every scene.
pub struct Services {
    pub audio: Box<dyn AudioService>,
    pub store: Box<dyn GameStore>,
    pub resources: ResourceLoader,

    /// Canvas size scenes lay themselves out against.
    pub screen: Size,
}

impl Services {
    pub fn new(
        audio: Box<dyn AudioService>,
        store: Box<dyn GameStore>,
        resources: ResourceLoader,
        screen: Size,
    ) -> Self {
        Self { audio, store, resources, screen }
    }
}

//=== Registration ========================================================

type GameScene = Box<dyn Scene<SceneId, Services>>;

/// Registers every game scene. Instances are built on first entry.
pub fn register_scenes(scenes: &mut SceneManager<SceneId, Services>) {
    scenes.register_scene(SceneId::Title, |_: &mut Services| -> GameScene { Box::new(TitleScene::new()) });
    scenes.register_scene(SceneId::UserSelect, |_: &mut Services| -> GameScene {
        Box::new(UserSelectScene::new())
    });
    scenes.register_scene(SceneId::Lobby, |_: &mut Services| -> GameScene { Box::new(LobbyScene::new()) });
    scenes.register_scene(SceneId::Feed, |_: &mut Services| -> GameScene { Box::new(FeedScene::new()) });
    scenes.register_scene(SceneId::MushroomSelect, |_: &mut Services| -> GameScene {
        Box::new(MushroomSelectScene::new())
    });
}
