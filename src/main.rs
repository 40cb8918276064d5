//! Blink-to-Morse communicator: translate eye blinks into text in real time.

use anyhow::Result;
use blink_morse::config::Config;
use blink_morse::session::{MorseSession, VideoSource};
use blink_morse::sink::{HeadlessSink, MjpegSink, PresentationSink, WindowSink};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long, default_value = "0")]
    cam: i32,

    /// Video file to process instead of a camera
    #[arg(short, long)]
    video: Option<String>,

    /// Serve an MJPEG stream instead of opening a window
    #[arg(short, long)]
    serve: bool,

    /// Bind address for the MJPEG stream (overrides config)
    #[arg(short, long)]
    address: Option<String>,

    /// GUI display mode (window, none)
    #[arg(short, long, default_value = "window")]
    gui: String,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Blink to Speak - Morse code communicator");

    // Load configuration if provided
    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {config_path}");
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    // Model resources are required up front; abort with a diagnostic if absent
    config.validate()?;

    let source = if let Some(video_path) = args.video {
        VideoSource::File(video_path)
    } else {
        VideoSource::Camera(args.cam)
    };

    let mut sink: Box<dyn PresentationSink> = if args.serve {
        let address = args.address.unwrap_or_else(|| config.stream.address.clone());
        Box::new(MjpegSink::bind(&address, config.stream.jpeg_quality)?)
    } else if args.gui == "none" {
        Box::new(HeadlessSink)
    } else {
        Box::new(WindowSink::new("Blink to Speak")?)
    };

    let mut session = MorseSession::start(&config, source)?;
    session.run(sink.as_mut())?;

    println!("{}", session.text());
    Ok(())
}
