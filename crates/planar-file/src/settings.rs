//! 引擎设置文件（JSON）

use crate::error::FileError;
use planar_core::document::{Document, DEFAULT_GRID_SIZE};
use planar_core::history::{History, DEFAULT_HISTORY_CAPACITY};
use planar_core::snap::{SnapEngine, SnapSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 引擎设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// 对象捕捉
    pub snap: SnapSettings,
    /// 网格间距
    pub grid_size: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    /// 撤销历史容量
    pub history_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            snap: SnapSettings::default(),
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: true,
            snap_to_grid: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineSettings {
    /// 从文件加载；文件不存在时返回默认设置
    pub fn load(path: &Path) -> Result<Self, FileError> {
        if !path.exists() {
            tracing::info!("Settings file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), FileError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn snap_engine(&self) -> SnapEngine {
        SnapEngine::new(self.snap.clone())
    }

    pub fn history(&self) -> History {
        History::with_capacity(self.history_capacity)
    }

    /// 把网格设置应用到文档
    pub fn apply_grid(&self, document: &Document) -> Document {
        document.with_grid(self.grid_size, self.show_grid, self.snap_to_grid)
    }
}
