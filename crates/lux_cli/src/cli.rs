use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "lux")]
#[command(about = "Ray cast a JSON scene description to an image")]
pub struct Args {
    /// Scene description (JSON)
    pub scene: PathBuf,

    /// Output image; overrides the scene's render.output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Image width in pixels; overrides the scene camera
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels; overrides the scene camera
    #[arg(long)]
    pub height: Option<u32>,

    /// Cast shadow rays regardless of the scene setting
    #[arg(long)]
    pub shadows: bool,

    /// Logging level; RUST_LOG is used when not given
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "lux",
            "scene.json",
            "-o",
            "out.png",
            "--width",
            "320",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.scene, PathBuf::from("scene.json"));
        assert_eq!(args.output, Some(PathBuf::from("out.png")));
        assert_eq!(args.width, Some(320));
        assert_eq!(args.height, None);
        assert!(!args.shadows);
        assert_eq!(LevelFilter::from(args.log_level.unwrap()), LevelFilter::Debug);
    }

    #[test]
    fn test_scene_is_required() {
        assert!(Args::try_parse_from(["lux"]).is_err());
    }
}
