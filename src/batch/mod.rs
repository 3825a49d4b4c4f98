//! # 批量处理模块
//!
//! 一次批次的三个阶段: 收集输入、逐个变换、打包归档。
//!
//! ## 功能
//! - 展开上传文件与 zip 归档为有序的图片条目
//! - 顺序处理，单条目失败不中断批次
//! - 进度回报与统计
//! - 输出归档（产物 + `log.txt`）
//!
//! ## 依赖关系
//! - 被各命令模块使用
//! - 使用 `zip` 读写归档，`tempfile` 管理工作区

pub mod collector;
pub mod packager;
pub mod runner;

pub use collector::MAX_INPUT_MB;
pub use runner::{BatchRunContext, BatchRunner, BatchSummary, ProgressSink, Stage, Stats};
