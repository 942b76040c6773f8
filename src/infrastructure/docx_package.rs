//! DOCX 容器读写
//!
//! 整个压缩包按原顺序读入内存，只替换主标记部件，其余部件原样写回。
//! 输入字节从不被修改，输出总是一份新的压缩包。

use std::io::{Cursor, Read, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{AppError, AppResult, DocumentError};

/// 主标记部件
pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// 内存中的 DOCX 压缩包
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// 从字节解析压缩包
    pub fn from_bytes(bytes: &[u8]) -> AppResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| AppError::file_read_failed(entry.name().to_string(), e))?;
            entries.push(PackageEntry {
                name: entry.name().to_string(),
                is_dir: entry.is_dir(),
                data,
            });
        }

        debug!("读取压缩包: {} 个部件", entries.len());
        Ok(Self { entries })
    }

    /// 主标记部件文本；缺失即为损坏的输入
    pub fn document_xml(&self) -> AppResult<String> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == DOCUMENT_PART)
            .ok_or_else(|| AppError::missing_primary_part(DOCUMENT_PART))?;

        String::from_utf8(entry.data.clone()).map_err(|source| {
            AppError::Document(DocumentError::InvalidEncoding {
                part: DOCUMENT_PART.to_string(),
                source,
            })
        })
    }

    /// 返回替换了主标记部件的新压缩包
    pub fn with_document_xml(&self, xml: String) -> AppResult<Self> {
        let mut entries = self.entries.clone();
        let entry = entries
            .iter_mut()
            .find(|e| e.name == DOCUMENT_PART)
            .ok_or_else(|| AppError::missing_primary_part(DOCUMENT_PART))?;
        entry.data = xml.into_bytes();
        Ok(Self { entries })
    }

    /// 部件名称列表（按压缩包顺序）
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// 序列化为字节，所有部件统一使用 DEFLATE 压缩
    pub fn to_bytes(&self) -> AppResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let write_failed = |source: zip::result::ZipError| {
            AppError::Document(DocumentError::ArchiveWriteFailed { source })
        };

        for entry in &self.entries {
            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(write_failed)?;
                continue;
            }
            writer
                .start_file(entry.name.as_str(), options)
                .map_err(write_failed)?;
            writer
                .write_all(&entry.data)
                .map_err(|e| AppError::file_write_failed(entry.name.clone(), e))?;
        }

        let cursor = writer.finish().map_err(write_failed)?;
        Ok(cursor.into_inner())
    }

    /// 写入目标路径
    ///
    /// 先完整写到同目录的临时文件再重命名，失败时不会留下半成品。
    pub async fn write_to(&self, path: &Path) -> AppResult<()> {
        let bytes = self.to_bytes()?;
        write_atomically(path, &bytes).await
    }
}

/// 先写临时文件再重命名，按需创建父目录
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let display = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".part");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AppError::file_write_failed(display, e));
    }
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| AppError::file_write_failed(display, e))
}
