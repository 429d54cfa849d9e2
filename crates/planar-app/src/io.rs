//! 文档读写：按扩展名选择 JSON 记录或原生格式

use anyhow::{Context, Result};
use planar_file::native::{self, DocumentMetadata, NativeDocument};
use planar_file::{document_from_json, document_to_json};
use std::path::Path;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// 读取文档；JSON 记录没有元数据，以文件名作标题
pub fn load_document(path: &Path) -> Result<NativeDocument> {
    if is_json(path) {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(NativeDocument {
            metadata: DocumentMetadata::new(title_of(path)),
            document: document_from_json(&text)?,
        })
    } else {
        native::load(path).with_context(|| format!("Failed to load {}", path.display()))
    }
}

/// 写回文档，保留标题与创建时间，只更新修改时间
pub fn save_document(file: &NativeDocument, path: &Path) -> Result<()> {
    if is_json(path) {
        std::fs::write(path, document_to_json(&file.document)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(
            "Saved {} entities to {}",
            file.document.entity_count(),
            path.display()
        );
    } else {
        let file = NativeDocument {
            metadata: file.metadata.touched(),
            document: file.document.clone(),
        };
        native::save(&file, path).with_context(|| format!("Failed to save {}", path.display()))?;
    }
    Ok(())
}

fn title_of(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
}
