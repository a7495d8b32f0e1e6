use anyhow::Context as _;
use callmap_graph::ForceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub ui_scale: f32,
    pub font_size: f32,
    pub sidebar_width: f32,
    pub layout: LayoutSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    #[serde(alias = "Light")]
    #[default]
    Latte,
    Frappe,
    Macchiato,
    #[serde(alias = "Dark")]
    Mocha,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub forces: ForceConfig,
    /// Wall-clock budget before the layout freezes.
    pub auto_stop_secs: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            forces: ForceConfig::default(),
            auto_stop_secs: 3.0,
        }
    }
}

impl LayoutSettings {
    pub fn auto_stop(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f32(self.auto_stop_secs.max(0.0))
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Latte,
            ui_scale: 1.0,
            font_size: 14.0,
            sidebar_width: 280.0,
            layout: LayoutSettings::default(),
        }
    }
}

impl AppSettings {
    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("callmap").join("settings.json"))
    }

    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        tracing::info!("Loading settings from {:?}", path);
        if !path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("{:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    pub fn save(&self) {
        if let Some(path) = Self::default_path()
            && let Err(e) = self.save_to(&path)
        {
            tracing::warn!("{:#}", e);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {}", path.display()))
    }
}
