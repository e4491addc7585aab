use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use cube_core::gpu::GpuScene;
use cube_core::{unsupported_message, CubeError, GridConfig, TickClock, Visualizer, LOGIC_TICKS_PER_SECOND};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

type SharedVisualizer = Arc<Mutex<Visualizer<GpuScene<'static>>>>;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let (config, seed) = config_from_env()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Sine Cube (native)")
            .with_inner_size(winit::dpi::PhysicalSize::new(1024, 768))
            .build(&event_loop)?,
    );
    let size = window.inner_size();

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone())?;
    let backend = match pollster::block_on(GpuScene::new(
        &instance,
        surface,
        size.width,
        size.height,
        config.background_clear,
    )) {
        Ok(b) => b,
        Err(CubeError::RenderingUnsupported) => {
            anyhow::bail!(unsupported_message(true));
        }
        Err(e) => return Err(e.into()),
    };

    let vis = match seed {
        Some(seed) => Visualizer::with_seed(backend, size.width, size.height, config, seed)?,
        None => Visualizer::new(backend, size.width, size.height, config)?,
    };
    let vis: SharedVisualizer = Arc::new(Mutex::new(vis));

    let running = Arc::new(AtomicBool::new(true));
    let logic = spawn_logic_thread(Arc::clone(&vis), Arc::clone(&running))?;
    let mut logic = Some(logic);

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => lock(&vis).set_size(size.width, size.height),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            running.store(false, Ordering::Relaxed);
            if let Some(handle) = logic.take() {
                _ = handle.join();
            }
            elwt.exit();
        }
        Event::AboutToWait => {
            if let Err(e) = lock(&vis).paint() {
                log::error!("[paint] {e}");
            }
            window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}

/// Fixed-rate simulation on its own thread; paints only ever see whole ticks
/// because both sides take the same lock.
fn spawn_logic_thread(
    vis: SharedVisualizer,
    running: Arc<AtomicBool>,
) -> anyhow::Result<thread::JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("cube-logic".into())
        .spawn(move || {
            let mut clock = TickClock::new(LOGIC_TICKS_PER_SECOND);
            let mut last = Instant::now();
            log::info!("[logic] started period={:?}", clock.period());
            while running.load(Ordering::Relaxed) {
                let now = Instant::now();
                let due = clock.advance(now - last);
                last = now;
                if due > 0 {
                    let mut vis = lock(&vis);
                    for _ in 0..due {
                        if let Err(e) = vis.tick() {
                            log::error!("[tick] {e}");
                            break;
                        }
                    }
                }
                thread::sleep(clock.until_next_tick());
            }
            log::info!("[logic] stopped");
        })
        .context("spawning logic thread")?;
    Ok(handle)
}

// A panic mid-tick leaves at worst a half-updated frame; keep going with it.
fn lock(vis: &SharedVisualizer) -> MutexGuard<'_, Visualizer<GpuScene<'static>>> {
    vis.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn config_from_env() -> anyhow::Result<(GridConfig, Option<u64>)> {
    let mut config = GridConfig::default();
    read_env("CUBE_SIZE", &mut config.cube_size)?;
    read_env("CUBE_LINES", &mut config.number_of_lines)?;
    read_env("CUBE_RADIUS", &mut config.sphere_radius)?;
    read_env("CUBE_GAP", &mut config.sphere_gap)?;
    read_env("CUBE_DECAY", &mut config.radius_decay_rate)?;
    read_env("CUBE_CLOSE_SCALE", &mut config.close_sphere_scale)?;
    read_env("CUBE_TIME_FACTOR", &mut config.time_factor)?;
    if let Ok(raw) = std::env::var("CUBE_BACKGROUND") {
        config.background_clear = match raw.trim() {
            "none" | "transparent" => None,
            hex => Some(
                u32::from_str_radix(hex.trim_start_matches("0x").trim_start_matches('#'), 16)
                    .with_context(|| format!("CUBE_BACKGROUND={raw:?}"))?,
            ),
        };
    }
    let mut seed = None;
    if let Ok(raw) = std::env::var("CUBE_SEED") {
        seed = Some(raw.trim().parse().with_context(|| format!("CUBE_SEED={raw:?}"))?);
    }
    config.validate()?;
    log::info!("[config] {:?} seed={:?}", config, seed);
    Ok((config, seed))
}

fn read_env<T>(key: &str, slot: &mut T) -> anyhow::Result<()>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Ok(raw) = std::env::var(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("{key}={raw:?}"))?;
    }
    Ok(())
}
