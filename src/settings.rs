use anyhow::Context;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use gridrover_kinematics::{GridBounds, GridPosition, Heading, MotionPrimitive};
use gridrover_navigation::{CollisionPolicy, GridTransform, Obstacle, Side, WorldPoint};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const LOCAL_CONFIG_PATH: &str = "config/local.toml";
const ENV_PREFIX: &str = "GRIDROVER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub arena: ArenaSettings,
    pub robot: RobotSettings,
    pub run: RunSettings,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArenaSettings {
    pub rows: i32,
    pub cols: i32,
    /// Centimetres per cell.
    pub cell_size: i32,
    /// Defaults to `rows * cell_size`.
    pub arena_length: Option<i32>,
    /// Defaults to one cell, which puts world `y = 0` on the last row.
    pub origin_offset: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RobotSettings {
    pub row: i32,
    pub col: i32,
    #[serde(default)]
    pub heading: Heading,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    /// Side hint per obstacle, `"L"` or `"R"`.
    pub hints: [String; 2],
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    /// Delay the renderer waits after drawing each step.
    #[serde(default)]
    pub step_delay_ms: u64,
    /// Command codes driven one by one before the run starts.
    #[serde(default)]
    pub manual: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleSettings {
    pub id: u32,
    /// World x in centimetres.
    pub x: i32,
    /// World y in centimetres.
    pub y: i32,
    #[serde(default)]
    pub facing: Heading,
}

/// Loads `config/default.toml`, then `config/local.toml` if present, then
/// `GRIDROVER__SECTION__KEY` environment overrides.
pub fn load() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .add_source(File::new(LOCAL_CONFIG_PATH, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("__").separator("__"))
        .build()
        .and_then(|config| config.try_deserialize());

    match settings {
        Ok(settings) => {
            info!(?settings, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

impl Settings {
    pub fn bounds(&self) -> anyhow::Result<GridBounds> {
        GridBounds::new(self.arena.rows, self.arena.cols).context("arena size")
    }

    pub fn transform(&self) -> anyhow::Result<GridTransform> {
        let arena = &self.arena;
        let length = arena.arena_length.unwrap_or(arena.rows * arena.cell_size);
        let offset = arena.origin_offset.unwrap_or(arena.cell_size);
        GridTransform::new(arena.cell_size, length, offset).context("arena transform")
    }

    pub fn start(&self) -> GridPosition {
        GridPosition::new(self.robot.row, self.robot.col, self.robot.heading)
    }

    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .map(|o| Obstacle::new(o.id, WorldPoint::new(o.x, o.y), o.facing))
            .collect()
    }

    pub fn hints(&self) -> anyhow::Result<[Side; 2]> {
        let [first, second] = &self.run.hints;
        Ok([
            first.parse().with_context(|| format!("first side hint {first:?}"))?,
            second.parse().with_context(|| format!("second side hint {second:?}"))?,
        ])
    }

    pub fn manual_commands(&self) -> anyhow::Result<Vec<MotionPrimitive>> {
        self.run
            .manual
            .iter()
            .map(|code| code.parse().with_context(|| format!("manual command {code:?}")))
            .collect()
    }
}
