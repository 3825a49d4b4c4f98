//! # convert 命令实现
//!
//! 批量转换为 JPEG（质量 100，保留 ICC 配置）。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `commands/batch.rs`

use super::batch;
use crate::cli::convert::ConvertArgs;
use crate::error::Result;
use crate::transform::Mode;

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    batch::run_batch(Mode::Convert, &args.input)
}
