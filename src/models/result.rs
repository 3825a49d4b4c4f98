//! # 单文件处理结果
//!
//! 每个输入条目恰好对应一个 `ProcessingResult`，其消息即日志行。
//!
//! ## 依赖关系
//! - 被 `transform/` 和 `batch/` 使用
//! - 使用 `error.rs`

use crate::error::PhotoflowError;
use crate::models::input::relative_display;

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// 处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Success,
    Error,
    SkippedUnsupported,
    SkippedOversized,
}

impl Status {
    pub fn is_skip(&self) -> bool {
        matches!(self, Status::SkippedUnsupported | Status::SkippedOversized)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::Error => write!(f, "error"),
            Status::SkippedUnsupported => write!(f, "skipped-unsupported"),
            Status::SkippedOversized => write!(f, "skipped-oversized"),
        }
    }
}

/// 成功产物：工作区文件 + 归档内相对路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub path: PathBuf,
    pub relative_path: PathBuf,
}

/// 单个条目的处理结果
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// 来源（相对路径或上传名）
    pub source: String,
    pub status: Status,
    pub output: Option<Output>,
    /// 日志行，非成功状态时必不为空
    pub message: String,
}

impl ProcessingResult {
    /// 成功结果，`note` 为附加说明（如重名改名）
    pub fn success(source: impl Into<String>, output: Output, note: Option<&str>) -> Self {
        let source = source.into();
        let target = relative_display(&output.relative_path);
        let message = match note {
            Some(note) => format!("[OK] {} -> {} ({})", source, target, note),
            None => format!("[OK] {} -> {}", source, target),
        };
        ProcessingResult {
            source,
            status: Status::Success,
            output: Some(output),
            message,
        }
    }

    /// 失败或跳过结果
    pub fn failure(source: impl Into<String>, err: &PhotoflowError) -> Self {
        let source = source.into();
        let status = err.status();
        let tag = if status.is_skip() { "[SKIP]" } else { "[ERR]" };
        let mut message = format!("{} {}: {}", tag, source, err);
        if let Some(cause) = std::error::Error::source(err) {
            message.push_str(&format!(" ({})", cause));
        }
        ProcessingResult {
            source,
            status,
            output: None,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// 归档内相对路径（仅成功时）
    pub fn output_display(&self) -> Option<String> {
        self.output
            .as_ref()
            .map(|o| relative_display(&o.relative_path))
    }
}
