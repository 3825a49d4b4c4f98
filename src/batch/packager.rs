//! # 归档打包
//!
//! 将所有成功产物按相对路径写入 zip，并在根目录附上 `log.txt`。
//! 没有成功产物时归档中只有 `log.txt`。打包失败对整个批次是致命的。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `zip` crate 写入归档

use crate::error::{PhotoflowError, Result};
use crate::models::input::relative_display;
use crate::models::Output;
use crate::transform::outputs::LOG_ENTRY;

use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 打包后的 zip 字节
#[derive(Debug, Clone)]
pub struct OutputArchive {
    bytes: Vec<u8>,
}

impl OutputArchive {
    #[cfg(test)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 写入磁盘
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PhotoflowError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        fs::write(path, &self.bytes).map_err(|e| PhotoflowError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// 归档中的条目名（按写入顺序）
    #[cfg(test)]
    pub fn entry_names(&self) -> Result<Vec<String>> {
        let err = |e: zip::result::ZipError| PhotoflowError::PackagingError(e.to_string());
        let cursor = Cursor::new(self.bytes.as_slice());
        let mut archive = zip::ZipArchive::new(cursor).map_err(err)?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            names.push(archive.by_index(i).map_err(err)?.name().to_string());
        }
        Ok(names)
    }
}

/// 打包成功产物与日志
pub fn package<'a, I>(outputs: I, log: &[String]) -> Result<OutputArchive>
where
    I: IntoIterator<Item = &'a Output>,
{
    let zip_err = |e: zip::result::ZipError| PhotoflowError::PackagingError(e.to_string());
    let io_err =
        |what: &str, e: io::Error| PhotoflowError::PackagingError(format!("{}: {}", what, e));

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for output in outputs {
        let name = relative_display(&output.relative_path);
        let mut file = File::open(&output.path).map_err(|e| io_err(name.as_str(), e))?;
        writer.start_file(name.clone(), options).map_err(zip_err)?;
        io::copy(&mut file, &mut writer).map_err(|e| io_err(name.as_str(), e))?;
    }

    writer.start_file(LOG_ENTRY, options).map_err(zip_err)?;
    writer
        .write_all(log.join("\n").as_bytes())
        .map_err(|e| io_err(LOG_ENTRY, e))?;

    let bytes = writer.finish().map_err(zip_err)?.into_inner();
    Ok(OutputArchive { bytes })
}
