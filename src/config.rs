use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{
    DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_YAW, DEFAULT_ZOOM, ZOOM_MAX,
    ZOOM_MIN,
};
use crate::cli::Cli;
use crate::core::texture::ChannelLayout;

/// Fragment texture image units every GL 3.3 implementation provides
pub const MAX_TEXTURE_UNITS: u32 = 16;

/// Top-level application configuration, loaded from JSON. An explicit empty
/// `textures` list draws the cubes untextured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shaders: ShaderConfig,
    pub textures: Vec<TextureConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            shaders: ShaderConfig::default(),
            textures: Self::default_textures(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub capture_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "gl-sandbox".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            capture_cursor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/default.vert"),
            fragment: PathBuf::from("shaders/default.frag"),
        }
    }
}

impl ShaderConfig {
    /// Re-root the file names under `dir`
    pub fn in_dir(&self, dir: &Path) -> Self {
        let rebase = |path: &Path| match path.file_name() {
            Some(name) => dir.join(name),
            None => path.to_path_buf(),
        };
        Self {
            vertex: rebase(&self.vertex),
            fragment: rebase(&self.fragment),
        }
    }
}

/// A texture bound to sampler `unit` and exposed to the shader as `uniform`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureConfig {
    pub path: PathBuf,
    pub uniform: String,
    #[serde(default)]
    pub layout: ChannelLayout,
    pub unit: u32,
}

impl AppConfig {
    pub fn default_textures() -> Vec<TextureConfig> {
        vec![
            TextureConfig {
                path: PathBuf::from("assets/container.png"),
                uniform: "texture1".to_string(),
                layout: ChannelLayout::Rgb,
                unit: 0,
            },
            TextureConfig {
                path: PathBuf::from("assets/awesome.png"),
                uniform: "texture2".to_string(),
                layout: ChannelLayout::Rgba,
                unit: 1,
            },
        ]
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load the optional config file, then apply command-line overrides
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                log::info!("Loading config from {:?}", path);
                Self::from_json_file(path)?
            }
            None => Self::default(),
        };

        if let Some(width) = cli.width {
            config.window.width = width;
        }
        if let Some(height) = cli.height {
            config.window.height = height;
        }
        if cli.no_vsync {
            config.window.vsync = false;
        }
        if cli.no_capture {
            config.window.capture_cursor = false;
        }
        if let Some(dir) = &cli.shader_dir {
            config.shaders = config.shaders.in_dir(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would overflow or misbehave once handed to GL
    pub fn validate(&self) -> anyhow::Result<()> {
        for texture in &self.textures {
            anyhow::ensure!(
                texture.unit < MAX_TEXTURE_UNITS,
                "Texture {:?} ({}) uses unit {}, expected 0..{}",
                texture.path,
                texture.uniform,
                texture.unit,
                MAX_TEXTURE_UNITS
            );
        }
        Ok(())
    }
}
