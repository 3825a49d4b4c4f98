//! # 输入数据模型
//!
//! 描述调用方提交的上传条目，以及收集阶段展开后的待处理图片。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs` 使用
//! - 被 `transform/` 读取

use crate::error::{PhotoflowError, Result};

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// 支持的图片扩展名（小写，不含点）
pub const SUPPORTED_EXTS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "webp", "tiff", "tif", "heic", "heif",
];

/// 从文件名中提取小写扩展名
pub fn detect_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
}

/// 是否为支持的图片类型
pub fn is_supported_image(name: &str) -> bool {
    detect_extension(name)
        .map(|ext| SUPPORTED_EXTS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// 是否为 zip 归档
pub fn is_zip(name: &str) -> bool {
    detect_extension(name).as_deref() == Some("zip")
}

/// 将上传名或归档成员名规整为安全的相对路径
///
/// 绝对路径、盘符和 `..` 一律拒绝，`.` 与空段被忽略。
pub fn sanitize_relative(name: &str) -> Option<PathBuf> {
    if name.starts_with('/') || name.starts_with('\\') {
        return None;
    }

    let mut path = PathBuf::new();
    for part in name.split(['/', '\\']) {
        match part {
            "" | "." => continue,
            ".." => return None,
            p if p.contains(':') => return None,
            p => path.push(p),
        }
    }

    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// 以 `/` 分隔显示相对路径（日志与归档条目名统一使用）
pub fn relative_display(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// 调用方提交的一个上传条目: (名称, 字节数, 内容流)
pub struct UploadedEntry {
    pub name: String,
    pub size: u64,
    content: Box<dyn Read>,
}

impl UploadedEntry {
    pub fn new(name: impl Into<String>, size: u64, content: impl Read + 'static) -> Self {
        UploadedEntry {
            name: name.into(),
            size,
            content: Box::new(content),
        }
    }

    /// 从内存字节创建
    #[cfg(test)]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self::new(name, size, std::io::Cursor::new(bytes))
    }

    /// 从磁盘文件创建，大小取自文件元数据；文件在首次读取时才打开
    pub fn from_path(name: impl Into<String>, path: &Path) -> Result<Self> {
        let size = path
            .metadata()
            .map_err(|e| PhotoflowError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?
            .len();
        let file = LazyFile {
            path: path.to_path_buf(),
            file: None,
        };
        Ok(Self::new(name, size, file))
    }

    /// 取出内容流
    pub fn content(&mut self) -> &mut dyn Read {
        self.content.as_mut()
    }
}

impl fmt::Debug for UploadedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedEntry")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// 首次读取时才打开的文件
struct LazyFile {
    path: PathBuf,
    file: Option<File>,
}

impl Read for LazyFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.file.is_none() {
            self.file = Some(File::open(&self.path)?);
        }
        match self.file.as_mut() {
            Some(file) => file.read(buf),
            None => Ok(0),
        }
    }
}

/// 收集后的单个待处理图片
#[derive(Debug, Clone)]
pub struct InputItem {
    /// 原始文件名（不含目录）
    pub name: String,

    /// 相对路径（归档内保留子目录结构）
    pub relative_path: PathBuf,

    /// 工作区中的实际文件路径
    pub path: PathBuf,

    /// 字节数
    pub size: u64,

    /// 小写扩展名
    pub extension: String,
}

impl InputItem {
    pub fn new(relative_path: PathBuf, path: PathBuf, size: u64) -> Self {
        let name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = detect_extension(&name).unwrap_or_default();
        InputItem {
            name,
            relative_path,
            path,
            size,
            extension,
        }
    }

    /// 日志中显示的相对路径
    pub fn display_path(&self) -> String {
        relative_display(&self.relative_path)
    }
}
