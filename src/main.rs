use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tree3d::assets::{load_photos, photo_paths};
use tree3d::audio::AudioPlayer;
use tree3d::config::Config;
use tree3d::driver::{Command, FixedStep, World};
use tree3d::input::{InputEvent, InputMapper};
use tree3d::render::Renderer;
use tree3d::scene::{Scene, PHOTO_COUNT};
use tree3d::surface::{FpsCounter, Hud, TerminalSurface};

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn debug_lines(world: &World, fps: f64) -> Vec<String> {
    let eye = world.camera.position();
    vec![
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        format!("Mode: {:?}", world.motion_mode()),
        format!(
            "Frames: explode {} reveal {}",
            world.state.explode_frames, world.state.photo_reveal_frames
        ),
        format!("Selected: {:?}", world.state.selected_photo()),
        format!("Camera: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z),
        format!("FPS: {:.2}", fps),
    ]
}

fn run(config: &Config) -> anyhow::Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let textures = load_photos(&photo_paths(&config.photos, PHOTO_COUNT));
    let scene = Scene::build(&mut rng, textures, config.snow);

    let mut surface = TerminalSurface::enter().context("failed to set up the terminal")?;
    let mut world = World::new(scene, surface.viewport(), rng);
    let mut renderer = Renderer::new(surface.viewport(), !config.no_bloom);
    let mut audio = AudioPlayer::new(&config.player, config.sound.clone());
    let mut mapper = InputMapper::new(config.double_click_window());
    let mut step = FixedStep::new(config.fps);
    let mut debug = config.debug;

    let start = Instant::now();
    let mut fps = FpsCounter::new(start);
    let mut last = start;

    loop {
        if let Some(event) = surface.poll(step.until_next())? {
            let events = mapper.map(&event, start.elapsed(), surface.buttons());
            for input in events {
                if let InputEvent::Resize(viewport) = input {
                    surface.resize(viewport);
                }
                match world.handle(input) {
                    Some(Command::Quit) => {
                        log::info!("quit requested");
                        return Ok(());
                    }
                    Some(Command::PlaySound) => {
                        if let Err(err) = audio.play() {
                            log::warn!("{:#}", anyhow::Error::from(err));
                        }
                    }
                    Some(Command::ToggleDebug) => debug = !debug,
                    None => {}
                }
            }
        }

        let now = Instant::now();
        let ticks = step.advance(now - last);
        last = now;
        if ticks == 0 {
            continue;
        }
        if !world.paused {
            for _ in 0..ticks {
                world.tick(start.elapsed());
            }
        }
        audio.reap();

        let framebuffer = renderer.render(&world);
        fps.frame(Instant::now());
        let hud = Hud {
            show_reset: world.state.exploded,
            paused: world.paused,
            debug: debug.then(|| debug_lines(&world, fps.fps())),
        };
        surface.present(framebuffer, &hud)?;
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config.log_file)?;
    log::info!("starting with {:?}", config);

    // The surface restores the terminal before the error is printed.
    let result = run(&config);
    if let Err(err) = &result {
        log::error!("{err:#}");
    }
    result
}
