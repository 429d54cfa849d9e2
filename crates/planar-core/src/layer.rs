//! 图层

use crate::properties::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图层标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// 默认图层 "0"
    pub const DEFAULT: &'static str = "0";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn default_layer() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 图层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub color: Color,
    pub visible: bool,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: Color::default(),
            visible: true,
        }
    }

    /// 默认图层 "0"
    pub fn default_layer() -> Self {
        Self::new(LayerId::default_layer(), "0")
    }

    pub fn with_color(&self, color: Color) -> Self {
        Self {
            color,
            ..self.clone()
        }
    }

    pub fn with_visible(&self, visible: bool) -> Self {
        Self {
            visible,
            ..self.clone()
        }
    }
}
