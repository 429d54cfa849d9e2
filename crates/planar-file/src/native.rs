//! Planar原生文件格式（.plnr）
//!
//! 基于 MessagePack + Zstd 的紧凑二进制格式：
//! - 体积小：MessagePack 比 JSON 小，Zstd 再压缩
//! - 速度快：直接序列化/反序列化整个文档值

use crate::error::FileError;
use chrono::{DateTime, Utc};
use planar_core::document::{Document, GridSettings};
use planar_core::entity::Entity;
use planar_core::layer::{Layer, LayerId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 文件魔数 "PLNR"
const MAGIC: &[u8; 4] = b"PLNR";

/// 当前文件格式版本
const FORMAT_VERSION: u32 = 1;

/// Zstd 压缩级别（1-22，3 是默认值，平衡速度和压缩比）
const COMPRESSION_LEVEL: i32 = 3;

/// 文件头（16 字节）
#[derive(Debug)]
struct FileHeader {
    /// 魔数 "PLNR"
    magic: [u8; 4],
    /// 格式版本
    version: u32,
    /// 标志位（预留）
    flags: u32,
    /// 压缩后数据长度
    compressed_size: u32,
}

impl FileHeader {
    fn new(compressed_size: u32) -> Self {
        Self {
            magic: *MAGIC,
            version: FORMAT_VERSION,
            flags: 0,
            compressed_size,
        }
    }

    fn write(&self, writer: &mut impl Write) -> Result<(), std::io::Error> {
        writer.write_all(&self.magic)?;
        writer.write_all(&self.version.to_le_bytes())?;
        writer.write_all(&self.flags.to_le_bytes())?;
        writer.write_all(&self.compressed_size.to_le_bytes())?;
        Ok(())
    }

    fn read(reader: &mut impl Read) -> Result<Self, FileError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if &magic != MAGIC {
            return Err(FileError::InvalidFormat(
                "Invalid magic number, not a Planar file".to_string(),
            ));
        }

        let mut buf = [0u8; 4];

        reader.read_exact(&mut buf)?;
        let version = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let flags = u32::from_le_bytes(buf);

        reader.read_exact(&mut buf)?;
        let compressed_size = u32::from_le_bytes(buf);

        Ok(Self {
            magic,
            version,
            flags,
            compressed_size,
        })
    }
}

/// 文档元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            created: now,
            modified: now,
        }
    }

    /// 更新修改时间
    pub fn touched(&self) -> Self {
        Self {
            modified: Utc::now(),
            ..self.clone()
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// 带元数据的文档
#[derive(Debug, Clone, PartialEq)]
pub struct NativeDocument {
    pub metadata: DocumentMetadata,
    pub document: Document,
}

/// 可序列化的文件内容
#[derive(Debug, Serialize, Deserialize)]
struct FileContent {
    /// 文档元数据
    metadata: DocumentMetadata,
    /// 所有图层
    layers: Vec<Layer>,
    /// 活动图层
    active_layer: LayerId,
    /// 网格设置
    grid: GridSettings,
    /// 所有实体，按绘制顺序
    entities: Vec<Entity>,
}

/// 保存文档到文件，同时更新修改时间
pub fn save(file: &NativeDocument, path: &Path) -> Result<(), FileError> {
    let document = &file.document;

    // 收集文件内容
    let content = FileContent {
        metadata: file.metadata.touched(),
        layers: document.layers().to_vec(),
        active_layer: document.active_layer_id().clone(),
        grid: document.grid(),
        entities: document.entities().to_vec(),
    };

    // 序列化为 MessagePack（带字段名，实体的 type 标签依赖它）
    let msgpack_data = rmp_serde::to_vec_named(&content)?;

    // 使用 Zstd 压缩
    let compressed_data = zstd::encode_all(msgpack_data.as_slice(), COMPRESSION_LEVEL)?;
    let compressed_size = u32::try_from(compressed_data.len()).map_err(|_| {
        FileError::InvalidFormat(format!(
            "Compressed document too large ({} bytes)",
            compressed_data.len()
        ))
    })?;

    // 写入文件
    let out = File::create(path)?;
    let mut writer = BufWriter::new(out);

    // 写入文件头
    FileHeader::new(compressed_size).write(&mut writer)?;

    // 写入压缩数据
    writer.write_all(&compressed_data)?;
    writer.flush()?;

    tracing::info!(
        "Saved {} entities, {} layers to {} ({} bytes compressed)",
        content.entities.len(),
        content.layers.len(),
        path.display(),
        compressed_data.len()
    );

    Ok(())
}

/// 从文件加载文档
pub fn load(path: &Path) -> Result<NativeDocument, FileError> {
    let input = File::open(path)?;
    let mut reader = BufReader::new(input);

    // 读取文件头
    let header = FileHeader::read(&mut reader)?;

    // 版本检查
    if header.version > FORMAT_VERSION {
        return Err(FileError::UnsupportedVersion(format!(
            "File version {} is newer than supported version {}",
            header.version, FORMAT_VERSION
        )));
    }

    // 读取压缩数据，长度以实际读到的字节为准
    let expected = u64::from(header.compressed_size);
    let mut compressed_data = Vec::new();
    reader.by_ref().take(expected).read_to_end(&mut compressed_data)?;
    if compressed_data.len() as u64 != expected {
        return Err(FileError::InvalidFormat(format!(
            "Header declares {} compressed bytes but only {} are present",
            expected,
            compressed_data.len()
        )));
    }

    // 解压缩
    let msgpack_data = zstd::decode_all(compressed_data.as_slice())?;

    // 反序列化
    let content: FileContent = rmp_serde::from_slice(&msgpack_data)?;

    for entity in &content.entities {
        entity
            .validate()
            .map_err(|source| FileError::InvalidEntity {
                id: entity.id().to_string(),
                source,
            })?;
    }

    // 重建文档
    let document = Document::from_parts(
        content.layers,
        content.entities,
        content.active_layer,
        content.grid,
    );

    tracing::info!(
        "Loaded {} entities, {} layers from {}",
        document.entity_count(),
        document.layers().len(),
        path.display()
    );

    Ok(NativeDocument {
        metadata: content.metadata,
        document,
    })
}
