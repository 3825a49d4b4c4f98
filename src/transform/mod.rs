//! # 单文件变换模块
//!
//! 三种互斥策略（重命名 / 转 JPEG / 水印），整个批次只选定其一。
//!
//! ## 功能
//! - `Transform` trait: `transform(item) -> ProcessingResult`
//! - `Mode`: 封闭的策略枚举，由 `build` 分派为具体实现
//! - 所有解码/编码错误都在策略内部转换为失败结果
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `models/`, `image` crate
//! - 子模块: codec, convert, outputs, rename, watermark

pub mod codec;
pub mod convert;
pub mod outputs;
pub mod rename;
pub mod watermark;

pub use convert::Converter;
pub use outputs::OutputRegistry;
pub use rename::{NamingRule, Renamer};
pub use watermark::Watermarker;

use crate::error::{PhotoflowError, Result};
use crate::models::{InputItem, Output, ProcessingResult, WatermarkSpec};

use std::fmt;
use std::fs;
use std::path::Path;

/// 单文件变换策略
pub trait Transform {
    /// 处理一个条目，永不向外抛出错误
    fn transform(&mut self, item: &InputItem) -> ProcessingResult;
}

/// 批处理模式
#[derive(Debug, Clone)]
pub enum Mode {
    Rename(NamingRule),
    Convert,
    Watermark(WatermarkSpec),
}

impl Mode {
    /// 默认的输出归档文件名
    pub fn archive_name(&self) -> &'static str {
        match self {
            Mode::Rename(_) => "renamed_photos.zip",
            Mode::Convert => "converted_photos.zip",
            Mode::Watermark(_) => "watermarked_images.zip",
        }
    }

    /// 构造对应策略，产物写入 `output_dir`
    pub fn build(self, output_dir: &Path) -> Box<dyn Transform> {
        let outputs = OutputRegistry::new(output_dir);
        match self {
            Mode::Rename(rule) => Box::new(Renamer::new(rule, outputs)),
            Mode::Convert => Box::new(Converter::new(outputs)),
            Mode::Watermark(spec) => Box::new(Watermarker::new(&spec, outputs)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Rename(_) => write!(f, "rename"),
            Mode::Convert => write!(f, "convert"),
            Mode::Watermark(_) => write!(f, "watermark"),
        }
    }
}

/// 策略成功时的产物与可选说明
pub(crate) struct Produced {
    pub output: Output,
    pub note: Option<String>,
}

/// 将策略内部的 `Result` 收敛为 `ProcessingResult`
pub(crate) fn into_result(item: &InputItem, outcome: Result<Produced>) -> ProcessingResult {
    match outcome {
        Ok(produced) => ProcessingResult::success(
            item.display_path(),
            produced.output,
            produced.note.as_deref(),
        ),
        Err(e) => ProcessingResult::failure(item.display_path(), &e),
    }
}

/// 创建产物所在目录
pub(crate) fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PhotoflowError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}
