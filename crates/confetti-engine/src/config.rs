//! Engine configuration.
//!
//! Describes the virtual surface, frame pacing and the effects to play.
//! Configuration can be loaded from and saved to a TOML file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use confetti_kernel::{
    Color, EmissionConfig, LocationModule, ScalarRange, Shape, Size, Trigger, Vec2,
};

/// Configuration file name.
const CONFIG_FILE: &str = "confetti.toml";

/// One effect in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectConfig {
    /// Name used in logs
    pub name: String,
    /// Delay before the effect is triggered
    #[serde(default)]
    pub start_delay_ms: u64,
    /// Burst or stream
    pub trigger: Trigger,
    /// Spawn parameters
    #[serde(default)]
    pub emission: EmissionConfig,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Surface Settings ===
    /// Surface width in units
    pub surface_width: u32,
    /// Surface height in units
    pub surface_height: u32,
    /// Retire particles that leave the surface
    pub clip_to_surface: bool,

    // === Timing Settings ===
    /// Simulated frames per second
    pub target_fps: u32,
    /// Random frame-time variation as a fraction of the frame budget (0.0 - 0.5)
    pub frame_jitter: f32,
    /// Stop after this many seconds even if effects are still running
    pub max_run_seconds: f32,
    /// Random seed (None = random)
    pub seed: Option<u64>,

    // === Debug Settings ===
    /// Log a status line every N frames (0 = never)
    pub log_interval_frames: u32,

    // === Scene ===
    /// Effects to play
    pub effects: Vec<EffectConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Surface
            surface_width: 1080,
            surface_height: 1920,
            clip_to_surface: true,

            // Timing
            target_fps: 60,
            frame_jitter: 0.1,
            max_run_seconds: 10.0,
            seed: None,

            // Debug
            log_interval_frames: 60,

            // Scene
            effects: default_effects(1080.0),
        }
    }
}

/// A rain of confetti from above the top edge plus a burst in the middle.
fn default_effects(width: f32) -> Vec<EffectConfig> {
    let palette = vec![
        Color::from_rgb(0xfc, 0xe1, 0x8a),
        Color::from_rgb(0xff, 0x72, 0x6d),
        Color::from_rgb(0xf4, 0x30, 0x6d),
        Color::from_rgb(0xb4, 0x8d, 0xef),
    ];

    let rain = EmissionConfig {
        location: LocationModule {
            x: ScalarRange::between(-50.0, width + 50.0),
            y: ScalarRange::fixed(-50.0),
        },
        direction: ScalarRange::between(0.0, 359.0),
        speed: ScalarRange::between(60.0, 300.0),
        colors: palette.clone(),
        sizes: vec![Size::SMALL, Size::MEDIUM, Size::LARGE],
        shapes: vec![Shape::Rect, Shape::Circle],
        ..EmissionConfig::default()
    };

    let mut pop = EmissionConfig {
        direction: ScalarRange::between(0.0, 359.0),
        speed: ScalarRange::between(120.0, 480.0),
        colors: palette,
        shapes: vec![Shape::Circle],
        ..EmissionConfig::default()
    };
    pop.location = LocationModule {
        x: ScalarRange::fixed(width / 2.0),
        y: ScalarRange::fixed(600.0),
    };
    pop.style.gravity = Vec2::new(0.0, 120.0);

    vec![
        EffectConfig {
            name: "rain".to_string(),
            start_delay_ms: 0,
            trigger: Trigger::Stream {
                rate: 300.0,
                duration_ms: Some(5000),
                max_particles: None,
            },
            emission: rain,
        },
        EffectConfig {
            name: "pop".to_string(),
            start_delay_ms: 1500,
            trigger: Trigger::Burst { amount: 150 },
            emission: pop,
        },
    ]
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Writes and returns the defaults if the file doesn't exist.
    pub fn load() -> Self {
        Self::load_or_create(Self::config_path())
    }

    /// Load configuration from `path`, writing the defaults there first if
    /// nothing exists yet so the scene can be edited for the next run.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from(path);
        }

        let config = Self::default();
        if let Err(e) = config.save_to(path) {
            warn!("Failed to write default config: {e}");
        }
        config
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    fn config_path() -> PathBuf {
        std::env::var_os("CONFETTI_CONFIG")
            .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Surface
        self.surface_width = self.surface_width.clamp(16, 7680);
        self.surface_height = self.surface_height.clamp(16, 7680);

        // Timing
        self.target_fps = self.target_fps.clamp(1, 240);
        self.frame_jitter = if self.frame_jitter.is_finite() {
            self.frame_jitter.clamp(0.0, 0.5)
        } else {
            0.0
        };
        self.max_run_seconds = if self.max_run_seconds.is_finite() {
            self.max_run_seconds.clamp(0.1, 3600.0)
        } else {
            10.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.surface_width, 1080);
        assert_eq!(config.target_fps, 60);
        assert!(config.clip_to_surface);
        assert_eq!(config.effects.len(), 2);
        for effect in &config.effects {
            assert!(effect.emission.build().is_ok(), "{} is invalid", effect.name);
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        // Set invalid values
        config.surface_width = 1;
        config.target_fps = 0;
        config.frame_jitter = 3.0;
        config.max_run_seconds = f32::NAN;

        config.validate();

        // Should be clamped
        assert_eq!(config.surface_width, 16);
        assert_eq!(config.target_fps, 1);
        assert!((config.frame_jitter - 0.5).abs() < f32::EPSILON);
        assert!((config.max_run_seconds - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("scene").join("test_config.toml");

        // Create and save config
        let mut config = EngineConfig::default();
        config.surface_width = 640;
        config.seed = Some(12345);

        config.save_to(&config_path).expect("Failed to save config");

        // Load and verify
        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/confetti.toml");
        // Should return defaults
        assert_eq!(config.surface_width, 1080);
    }

    #[test]
    fn test_config_load_or_create_writes_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("fresh.toml");

        let config = EngineConfig::load_or_create(&config_path);
        assert_eq!(config, EngineConfig::default());
        assert!(config_path.exists());

        // An existing file is read, not overwritten
        let mut edited = config;
        edited.target_fps = 30;
        edited.save_to(&config_path).expect("Failed to save config");
        assert_eq!(EngineConfig::load_or_create(&config_path).target_fps, 30);
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "surface_width = \"wide\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_handwritten_scene() {
        let text = r##"
            surface_width = 400
            surface_height = 300
            seed = 7

            [[effects]]
            name = "fountain"
            trigger = { mode = "stream", rate = 20.0, duration_ms = 1000, max_particles = 15 }

            [effects.emission]
            colors = ["#00FF00"]
            direction = { min = 250.0, max = 290.0 }
            speed = { min = 150.0 }
        "##;
        let config: EngineConfig = toml::from_str(text).expect("parse scene");
        assert_eq!(config.surface_width, 400);
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.effects.len(), 1);

        let effect = &config.effects[0];
        assert_eq!(effect.start_delay_ms, 0);
        assert_eq!(
            effect.trigger,
            Trigger::Stream {
                rate: 20.0,
                duration_ms: Some(1000),
                max_particles: Some(15)
            }
        );
        assert_eq!(effect.emission.colors, vec![Color::GREEN]);
        assert!(effect.emission.build().is_ok());
    }
}
