use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    #[serde(default)]
    pub fullscreen: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "PhysicsConfig::default_gravity")]
    pub gravity: [f32; 3],
    /// Workers used when multithreaded stepping is on.
    #[serde(default = "PhysicsConfig::default_worker_threads")]
    pub worker_threads: usize,
    #[serde(default = "PhysicsConfig::default_multithreaded")]
    pub multithreaded: bool,
    #[serde(default = "PhysicsConfig::default_allow_sleep")]
    pub allow_sleep: bool,
    #[serde(default = "PhysicsConfig::default_max_step")]
    pub max_step: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrabConfig {
    #[serde(default = "GrabConfig::default_ray_length")]
    pub ray_length: f32,
    #[serde(default = "GrabConfig::default_damping")]
    pub damping: f32,
    /// Depth change per wheel unit; one notch is 120 units.
    #[serde(default = "GrabConfig::default_scroll_sensitivity")]
    pub scroll_sensitivity: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HudConfig {
    #[serde(default = "HudConfig::default_stats_interval")]
    pub stats_interval: f32,
    #[serde(default = "HudConfig::default_palette_seed")]
    pub palette_seed: u64,
    #[serde(default = "HudConfig::default_show_bodies")]
    pub show_bodies: bool,
    #[serde(default = "HudConfig::default_show_islands")]
    pub show_islands: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_position")]
    pub position: [f32; 3],
    #[serde(default = "CameraConfig::default_target")]
    pub target: [f32; 3],
    #[serde(default = "CameraConfig::default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub grab: GrabConfig,
    #[serde(default)]
    pub hud: HudConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    /// Scene shown at startup, by name.
    #[serde(default)]
    pub scene: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub scene: Option<String>,
    pub threads: Option<usize>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Jenga Lab".to_string(), width: 1280, height: 720, vsync: true, fullscreen: false }
    }
}

impl PhysicsConfig {
    const fn default_gravity() -> [f32; 3] {
        [0.0, -9.81, 0.0]
    }

    fn default_worker_threads() -> usize {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
    }

    const fn default_multithreaded() -> bool {
        true
    }

    const fn default_allow_sleep() -> bool {
        true
    }

    const fn default_max_step() -> f32 {
        1.0 / 60.0
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            worker_threads: Self::default_worker_threads(),
            multithreaded: Self::default_multithreaded(),
            allow_sleep: Self::default_allow_sleep(),
            max_step: Self::default_max_step(),
        }
    }
}

impl GrabConfig {
    const fn default_ray_length() -> f32 {
        100.0
    }

    const fn default_damping() -> f32 {
        0.98
    }

    const fn default_scroll_sensitivity() -> f32 {
        0.01
    }
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            ray_length: Self::default_ray_length(),
            damping: Self::default_damping(),
            scroll_sensitivity: Self::default_scroll_sensitivity(),
        }
    }
}

impl HudConfig {
    const fn default_stats_interval() -> f32 {
        0.1
    }

    const fn default_palette_seed() -> u64 {
        0x4a45_4e47_41
    }

    const fn default_show_bodies() -> bool {
        true
    }

    const fn default_show_islands() -> bool {
        true
    }
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            stats_interval: Self::default_stats_interval(),
            palette_seed: Self::default_palette_seed(),
            show_bodies: Self::default_show_bodies(),
            show_islands: Self::default_show_islands(),
        }
    }
}

impl CameraConfig {
    const fn default_position() -> [f32; 3] {
        [20.0, 10.0, 20.0]
    }

    /// Middle of the Jenga tower.
    const fn default_target() -> [f32; 3] {
        [1.0, 5.0, 1.0]
    }

    const fn default_fov_y_degrees() -> f32 {
        60.0
    }

    const fn default_near() -> f32 {
        0.1
    }

    const fn default_far() -> f32 {
        500.0
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Self::default_position(),
            target: Self::default_target(),
            fov_y_degrees: Self::default_fov_y_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!(target: "jenga_lab::config", "Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(scene) = &overrides.scene {
            self.scene = Some(scene.clone());
        }
        if let Some(threads) = overrides.threads {
            self.physics.worker_threads = threads;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.applied_fields().is_empty()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.vsync.is_some() {
            fields.push("vsync");
        }
        if self.scene.is_some() {
            fields.push("scene");
        }
        if self.threads.is_some() {
            fields.push("threads");
        }
        fields
    }
}
