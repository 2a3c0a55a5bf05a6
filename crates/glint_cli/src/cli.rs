use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glint_renderer::{DiffuseSampling, FrameSeed, RenderSettings, DEFAULT_BUCKET_SIZE};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

/// Command line arguments.
///
/// Render flags left unset keep the value from `--config` (or the default).
#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render the Glint reference scene to a PNG")]
pub struct Args {
    /// Image width in pixels
    #[arg(long, default_value = "640")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "480")]
    pub height: u32,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub spp: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Index of refraction of glass
    #[arg(long)]
    pub ior: Option<f32>,

    /// Minimum hit distance
    #[arg(long)]
    pub epsilon: Option<f32>,

    /// Sky radiance multiplier
    #[arg(long)]
    pub sky: Option<f32>,

    /// Emission of the sun sphere
    #[arg(long)]
    pub sun: Option<f32>,

    /// Frame seed as two integers (random when omitted)
    #[arg(long, num_args = 2, value_names = ["A", "B"])]
    pub seed: Option<Vec<u32>>,

    /// Sample pixel centers only
    #[arg(long)]
    pub no_antialias: bool,

    /// Cosine-weighted hemisphere sampling for diffuse bounces
    #[arg(long)]
    pub cosine_diffuse: bool,

    /// JSON render settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "glint.png")]
    pub output: PathBuf,

    /// Gamma-encode the PNG (gamma 2)
    #[arg(long)]
    pub gamma: bool,

    /// Bucket edge length in pixels
    #[arg(long, default_value_t = DEFAULT_BUCKET_SIZE)]
    pub bucket_size: u32,

    /// Logging level (RUST_LOG still applies per module)
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Overlay the flags that were given onto `settings`.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(spp) = self.spp {
            settings.samples_per_pixel = spp;
        }
        if let Some(depth) = self.max_depth {
            settings.max_depth = depth;
        }
        if let Some(ior) = self.ior {
            settings.index_of_refraction = ior;
        }
        if let Some(epsilon) = self.epsilon {
            settings.min_epsilon = epsilon;
        }
        if let Some(sky) = self.sky {
            settings.sky_intensity = sky;
        }
        if let Some(sun) = self.sun {
            settings.sun_intensity = sun;
        }
        if self.no_antialias {
            settings.antialias = false;
        }
        if self.cosine_diffuse {
            settings.diffuse_sampling = DiffuseSampling::CosineWeighted;
        }
    }

    /// The requested seed, or a fresh random one.
    pub fn frame_seed(&self) -> FrameSeed {
        match self.seed.as_deref() {
            Some([a, b]) => FrameSeed::new(*a, *b),
            _ => FrameSeed::random(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_settings_alone() {
        let args = Args::try_parse_from(["glint"]).unwrap();
        assert_eq!(args.width, 640);
        assert_eq!(args.bucket_size, DEFAULT_BUCKET_SIZE);
        assert_eq!(args.log_level, LogLevel::Info);

        let mut settings = RenderSettings::default();
        args.apply(&mut settings);
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "glint",
            "--spp",
            "8",
            "--max-depth",
            "3",
            "--sun",
            "2.5",
            "--no-antialias",
            "--cosine-diffuse",
            "--seed",
            "4",
            "9",
        ])
        .unwrap();

        let mut settings = RenderSettings::default();
        args.apply(&mut settings);
        assert_eq!(settings.samples_per_pixel, 8);
        assert_eq!(settings.max_depth, 3);
        assert_eq!(settings.sun_intensity, 2.5);
        assert!(!settings.antialias);
        assert_eq!(settings.diffuse_sampling, DiffuseSampling::CosineWeighted);
        assert_eq!(settings.index_of_refraction, 1.3);
        assert_eq!(args.frame_seed(), FrameSeed::new(4, 9));
    }

    #[test]
    fn test_seed_needs_two_values() {
        assert!(Args::try_parse_from(["glint", "--seed", "4"]).is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LevelFilter::from(LogLevel::Warn), LevelFilter::Warn);
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::Trace);
    }
}
