//! # Photoflow - 图片批处理工具
//!
//! 将一批上传的图片（散文件与 zip 归档混合）按单一模式处理，
//! 产物与处理日志一起打包成一个 zip。
//!
//! ## 子命令
//! - `rename`    - 批量重命名（序号或正则替换）
//! - `convert`   - 批量转换为 JPEG
//! - `watermark` - 批量叠加水印
//! - `upload`    - 上传归档并获取下载链接
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (收集 → 执行 → 打包)
//!   │     ├── transform/ (重命名/转换/水印策略)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度、报告、上传)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
#[cfg(test)]
mod test_support;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
