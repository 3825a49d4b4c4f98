//! # 统一错误处理模块
//!
//! 定义 PhotoFlow 的所有错误类型，使用 `thiserror` 派生。
//!
//! 单文件错误（解码、编码、解压等）在批处理边界被转换为
//! `ProcessingResult`，只有 `PackagingError` 会终止整个批次。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 使用 `models/result.rs` 的 `Status`

use crate::models::Status;
use thiserror::Error;

/// PhotoFlow 统一错误类型
#[derive(Error, Debug)]
pub enum PhotoflowError {
    // ─────────────────────────────────────────────────────────────
    // 收集阶段（单文件，可恢复）
    // ─────────────────────────────────────────────────────────────
    #[error("unsupported file type")]
    UnsupportedType,

    #[error("file is {size} bytes, exceeds the {limit_mb} MB limit")]
    OversizedInput { size: u64, limit_mb: u64 },

    #[error("failed to extract from {archive}: {reason}")]
    ExtractionError { archive: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 处理阶段（单文件，可恢复）
    // ─────────────────────────────────────────────────────────────
    #[error("decode failed: {0}")]
    DecodeError(String),

    #[error("encode failed: {0}")]
    EncodeError(String),

    #[error("could not find a free output name for {0}")]
    OutputCollision(String),

    // ─────────────────────────────────────────────────────────────
    // 批次级错误（致命）
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write archive: {0}")]
    PackagingError(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 上传
    // ─────────────────────────────────────────────────────────────
    #[error("Upload failed: {0}")]
    UploadError(String),
}

impl PhotoflowError {
    /// 单文件错误在结果中对应的状态
    pub fn status(&self) -> Status {
        match self {
            PhotoflowError::UnsupportedType => Status::SkippedUnsupported,
            PhotoflowError::OversizedInput { .. } => Status::SkippedOversized,
            _ => Status::Error,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PhotoflowError>;
