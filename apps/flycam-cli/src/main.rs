use anyhow::anyhow;
use clap::{Parser, Subcommand};
use flycam_camera::{Camera, FIELD_OF_VIEW, PITCH, SENSITIVITY, SPEED, YAW};
use flycam_input::{InputState, Key};
use flycam_render::{DebugTextRenderer, FrameSnapshot, Renderer};
use flycam_scene::{FrameConfig, FrameContext, INITIAL_CAMERA_POSITION};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flycam-cli", about = "Headless runs of the flycam camera and scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and camera defaults
    Info,
    /// Fly the camera with scripted input and print frames as text
    Fly {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: u64,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f64,
        /// Movement keys held for the whole run, e.g. "wd"
        #[arg(short, long, default_value = "")]
        keys: String,
        /// Horizontal mouse motion per frame, in pixels
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        look_x: f32,
        /// Vertical mouse motion per frame, in pixels (positive moves the mouse down)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        look_y: f32,
        /// Wheel notches per frame
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        zoom: f32,
        /// Print every Nth frame (the last frame is always printed)
        #[arg(long, default_value = "10")]
        every: u64,
    },
}

fn parse_keys(keys: &str) -> anyhow::Result<Vec<Key>> {
    keys.chars()
        .map(|c| match c.to_ascii_lowercase() {
            'w' => Ok(Key::W),
            'a' => Ok(Key::A),
            's' => Ok(Key::S),
            'd' => Ok(Key::D),
            other => Err(anyhow!("unsupported key '{other}', expected one of w, a, s, d")),
        })
        .collect()
}

struct FlyScript {
    frames: u64,
    dt: f64,
    keys: Vec<Key>,
    look: (f32, f32),
    zoom: f32,
    every: u64,
}

/// Run the scripted flight, returning the text of each printed frame.
fn fly(script: &FlyScript) -> Vec<String> {
    let mut frame = FrameContext::new(
        FrameConfig {
            max_delta: script.dt.max(0.0) as f32,
            ..FrameConfig::default()
        },
        Camera::at(INITIAL_CAMERA_POSITION),
    );
    let mut input = InputState::new();
    for &key in &script.keys {
        input.handle_key(key, true);
    }

    let renderer = DebugTextRenderer::new();
    let every = script.every.max(1);
    let mut printed = Vec::new();

    for i in 0..script.frames {
        let dt = frame.begin_frame(i as f64 * script.dt);
        input.mouse_motion(script.look.0, script.look.1);
        input.scroll(script.zoom);
        frame.apply_all(input.drain_actions(dt));

        if i % every == 0 || i + 1 == script.frames {
            printed.push(renderer.render(&FrameSnapshot::capture(&frame)));
        }
    }

    tracing::debug!(
        frames = script.frames,
        position = ?frame.camera().position(),
        "flight finished"
    );
    printed
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("flycam-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", flycam_render::crate_info());
            println!(
                "camera: yaw={YAW} pitch={PITCH} speed={SPEED} sensitivity={SENSITIVITY} fov={FIELD_OF_VIEW}"
            );
            let camera = Camera::at(INITIAL_CAMERA_POSITION);
            let f = camera.front();
            println!(
                "start: position={:?} front=({:.2}, {:.2}, {:.2})",
                camera.position(),
                f.x,
                f.y,
                f.z
            );
        }
        Commands::Fly {
            frames,
            dt,
            keys,
            look_x,
            look_y,
            zoom,
            every,
        } => {
            let script = FlyScript {
                frames,
                dt,
                keys: parse_keys(&keys)?,
                look: (look_x, look_y),
                zoom,
                every,
            };
            for text in fly(&script) {
                print!("{text}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(frames: u64) -> FlyScript {
        FlyScript {
            frames,
            dt: 0.5,
            keys: Vec::new(),
            look: (0.0, 0.0),
            zoom: 0.0,
            every: 1,
        }
    }

    #[test]
    fn parse_movement_keys() {
        assert_eq!(parse_keys("wD").unwrap(), vec![Key::W, Key::D]);
        assert!(parse_keys("").unwrap().is_empty());
        assert!(parse_keys("x").is_err());
    }

    #[test]
    fn prints_every_nth_and_last_frame() {
        let mut s = script(25);
        s.every = 10;
        // Frames 0, 10, 20 and the last one, 24.
        assert_eq!(fly(&s).len(), 4);
    }

    #[test]
    fn held_forward_key_flies_ahead() {
        let mut s = script(3);
        s.keys = vec![Key::W];
        let out = fly(&s);
        // Two frames of 0.5 s at 4.5 u/s from z = 3: 3 - 4.5 = -1.5.
        assert!(out.last().unwrap().contains(", -1.50) fov="));
    }

    #[test]
    fn scripted_zoom_bottoms_out() {
        let mut s = script(10);
        s.zoom = 50.0;
        assert!(fly(&s).last().unwrap().contains("fov=1.0"));
    }

    #[test]
    fn idle_flight_stays_put() {
        let out = fly(&script(5));
        assert!(out.iter().all(|text| text.contains("eye=(0.00, 0.00, 3.00)")));
    }
}
