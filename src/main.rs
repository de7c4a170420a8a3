//=========================================================================
// Mushitroom — Appliance Entry Point
//
// Wires configuration, services and the platform runner together and
// starts the game on the title screen.
//
//=========================================================================

use anyhow::{ensure, Context};
use env_logger::Env;
use log::{error, info, warn};

use mushitroom::config::AppConfig;
use mushitroom::core::input::ActionMapper;
use mushitroom::game::{register_scenes, SceneId, Services};
use mushitroom::platform::{self, GpioPoller, HeadlessRunner, NullPresenter, PlatformKind};
use mushitroom::prelude::*;
use mushitroom::services::{GameStore, JsonStore, MemoryStore, ResourceLoader, ShellAudio};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Mushitroom v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    let display = &config.display;
    ensure!(display.fps > 0, "display.fps must be positive");
    ensure!(display.width > 0 && display.height > 0, "display size must be positive");

    //--- Services ---------------------------------------------------------

    let store: Box<dyn GameStore> = match JsonStore::open(&config.storage.path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            error!("{}; progress will not be saved this session", e);
            Box::new(MemoryStore::new())
        }
    };
    let audio = ShellAudio::new(&config.audio, config.assets.root.join("audio"));
    let services = Services::new(
        Box::new(audio),
        store,
        ResourceLoader::new(&config.assets.root),
        Size::new(display.width, display.height),
    );

    //--- Input ------------------------------------------------------------

    let kind = platform::detect(config.input.platform);
    let mut mapper = ActionMapper::keyboard_defaults();
    if kind == PlatformKind::Embedded {
        platform::bind_buttons(&mut mapper, &config.input.gpio);
    }

    //--- Driver -----------------------------------------------------------

    let [r, g, b] = display.background;
    let mut driver = EngineBuilder::new()
        .with_fps(f64::from(display.fps))
        .with_canvas_size(display.width, display.height)
        .with_background(Rgb888::new(r, g, b))
        .with_mapper(mapper)
        .build(services)
        .init(register_scenes);

    if driver.start(SceneId::Title, SceneArgs::new()) == TickControl::Exit {
        warn!("Quit requested before the first frame");
        return Ok(());
    }

    //--- Run --------------------------------------------------------------

    match kind {
        PlatformKind::Desktop => {
            platform::run_desktop(&mut driver, display).context("desktop runner failed")?;
        }
        PlatformKind::Embedded => {
            let gpio = &config.input.gpio;
            let pins = driver.input().mapper().bound_pins();
            let poller = GpioPoller::open(gpio, &pins, driver.input_source());
            let frames = HeadlessRunner::new()
                .with_gpio(poller)
                .run(&mut driver, &mut NullPresenter)
                .context("headless runner failed")?;
            info!("Ran {} frames", frames);
        }
    }

    info!("Mushitroom stopped");
    Ok(())
}
