//! # 数据模型模块
//!
//! 定义批处理流水线中的输入条目、处理结果和水印参数。
//!
//! ## 依赖关系
//! - 被 `batch/`, `transform/` 和 `commands/` 使用
//! - 子模块: input, result, watermark

pub mod input;
pub mod result;
pub mod watermark;

pub use input::{InputItem, UploadedEntry};
pub use result::{Output, ProcessingResult, Status};
pub use watermark::{Anchor, WatermarkSpec};
