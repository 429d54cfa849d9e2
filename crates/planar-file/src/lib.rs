//! Planar 文件格式处理
//!
//! 支持：
//! - JSON 实体记录（与其他工具交换数据）
//! - `.plnr` 原生格式（MessagePack + Zstd）
//! - 引擎设置文件

pub mod error;
pub mod native;
pub mod record;
pub mod settings;

pub use error::FileError;
pub use native::{DocumentMetadata, NativeDocument};
pub use record::{
    document_from_json, document_to_json, entities_from_json, entities_to_json, entity_from_json,
    entity_to_json,
};
pub use settings::EngineSettings;
