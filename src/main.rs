use arena3d::game::{ArenaScene, FrameScheduler, World};
use arena3d::input_system::{GameAction, InputSystem};
use arena3d::raster::RasterBackend;
use arena3d::{logging, render_frame, GameConfig};
use clap::Parser;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::Canvas;
use sdl2::video::{FullscreenType, Window};
use std::path::PathBuf;
use std::time::Instant;

/// A small real-time 3D arena: run around, shoot, throw grenades
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Switches between windowed and desktop fullscreen
fn toggle_fullscreen(canvas: &mut Canvas<Window>) -> Result<(), String> {
    let window = canvas.window_mut();
    let next = match window.fullscreen_state() {
        FullscreenType::Off => FullscreenType::Desktop,
        _ => FullscreenType::Off,
    };
    log::info!("Fullscreen: {:?}", next);
    window.set_fullscreen(next)
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = GameConfig::locate(args.config.as_deref()).map_err(|e| e.to_string())?;

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(&config.window.title, config.window.width, config.window.height)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    if config.window.fullscreen {
        toggle_fullscreen(&mut canvas)?;
    }

    // The software framebuffer is uploaded into this texture every frame and
    // stretched over the whole window
    let (render_width, render_height) = (config.render.width, config.render.height);
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_streaming(PixelFormatEnum::RGB24, render_width, render_height)
        .map_err(|e| e.to_string())?;
    let mut backend = RasterBackend::new(render_width as usize, render_height as usize);
    let pitch = render_width as usize * 3;

    let mut event_pump = sdl_context.event_pump()?;
    let input_system = InputSystem::new();

    let world = World::from_config(&config);
    let scene = ArenaScene::new(&config);
    let mut scheduler = FrameScheduler::new(world, Box::new(scene), config.tick_interval());

    log::info!(
        "Window {}x{}, rendering at {}x{}, {} ticks per second",
        config.window.width,
        config.window.height,
        render_width,
        render_height,
        config.tick_rate_hz
    );

    'running: loop {
        let actions = input_system.poll_events(&mut event_pump, &mut scheduler.world_mut().input);
        for action in actions {
            match action {
                GameAction::Quit => break 'running,
                GameAction::ToggleFullscreen => toggle_fullscreen(&mut canvas)?,
                GameAction::Resized(width, height) => {
                    if height > 0 {
                        scheduler
                            .world_mut()
                            .camera
                            .set_aspect_ratio(width as f32 / height as f32);
                    }
                }
            }
        }

        if let Some(report) = scheduler.poll(Instant::now()) {
            if report.redraw_requested {
                render_frame(scheduler.world(), &mut backend);
                texture
                    .update(None, &backend.framebuffer().to_rgb24(), pitch)
                    .map_err(|e| e.to_string())?;

                canvas.set_draw_color(Color::RGB(0, 0, 0));
                canvas.clear();
                canvas.copy(&texture, None, None)?;
                canvas.present();
            }
        }

        std::thread::sleep(scheduler.time_until_next(Instant::now()));
    }

    log::info!("Shutting down after {} ticks", scheduler.world().frame_count);
    Ok(())
}
