//! # watermark 命令实现
//!
//! 读取水印图片并校验参数后执行批次。水印图片本身无法解码时不在这里报错，
//! 而是在批次中记为每个条目的解码失败。
//!
//! ## 依赖关系
//! - 使用 `cli/watermark.rs` 定义的参数
//! - 使用 `models::WatermarkSpec`, `commands/batch.rs`

use super::batch;
use crate::cli::watermark::WatermarkArgs;
use crate::error::{PhotoflowError, Result};
use crate::models::WatermarkSpec;
use crate::transform::Mode;
use crate::utils::output;

use std::fs;

/// 执行 watermark 命令
pub fn execute(args: WatermarkArgs) -> Result<()> {
    if !args.mark.is_file() {
        return Err(PhotoflowError::FileNotFound {
            path: args.mark.display().to_string(),
        });
    }

    let image = fs::read(&args.mark).map_err(|e| PhotoflowError::FileReadError {
        path: args.mark.display().to_string(),
        source: e,
    })?;
    let spec = WatermarkSpec::new(image, args.opacity, args.scale, args.anchor)?;

    output::print_info(&format!(
        "Watermark '{}' at {} (opacity {:.2}, scale {:.2})",
        args.mark.display(),
        spec.anchor,
        spec.opacity,
        spec.scale
    ));

    batch::run_batch(Mode::Watermark(spec), &args.input)
}
