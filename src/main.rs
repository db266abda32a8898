//! Gesture mouse application: track a hand, steer the cursor.

use anyhow::Result;
use clap::Parser;
use gesture_mouse::config::Config;
use gesture_mouse::pipeline::Pipeline;
use gesture_mouse::Error;
use log::{info, warn};
use opencv::highgui;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use (overrides the config file)
    #[arg(long)]
    cam: Option<i32>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Start with cursor control active
    #[arg(short, long)]
    activate: bool,

    /// Mirror the camera image horizontally
    #[arg(long)]
    flip: bool,

    /// Pixel margin of the active control region
    #[arg(long)]
    frame_reduction: Option<i32>,

    /// Run without the preview window
    #[arg(long)]
    headless: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Gesture Mouse");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    if let Some(cam) = args.cam {
        config.camera.index = cam;
    }
    if args.flip {
        config.camera.flip = true;
    }
    if args.activate {
        config.control.activated = true;
    }
    if let Some(reduction) = args.frame_reduction {
        config.control.frame_reduction = reduction;
    }

    let pipeline = Pipeline::from_config(&config)?;
    let interval = Duration::from_millis(config.camera.tick_interval_ms);

    if !args.headless {
        highgui::named_window("Gesture Mouse", highgui::WINDOW_NORMAL)?;
    }

    info!("Entering tick loop at {} ms", config.camera.tick_interval_ms);
    loop {
        let tick_start = Instant::now();

        match pipeline.tick_frame() {
            Ok(frame) => {
                if !args.headless {
                    highgui::imshow("Gesture Mouse", &frame)?;
                }
            }
            Err(Error::CaptureTimeout) => {
                warn!("No frame this tick, skipping display update");
            }
            Err(Error::EndOfStream) => {
                info!("Video source exhausted");
                break;
            }
            Err(e) => return Err(e.into()),
        }

        if args.headless {
            std::thread::sleep(interval.saturating_sub(tick_start.elapsed()));
        } else {
            let remaining = interval.saturating_sub(tick_start.elapsed());
            #[allow(clippy::cast_possible_truncation)]
            let wait_ms = (remaining.as_millis() as i32).max(1);
            let key = highgui::wait_key(wait_ms)?;
            if key == 27 || key == i32::from(b'q') {
                info!("Exit requested by user");
                break;
            }
            if key == i32::from(b'a') {
                let activated = !pipeline.control_settings()?.activated;
                info!("Toggling cursor control: {activated}");
                pipeline.set_activated(activated)?;
            }
        }
    }

    info!("Shutting down");
    Ok(())
}
