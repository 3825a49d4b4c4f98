//! # upload 命令实现
//!
//! 上传已有归档并打印下载链接。
//!
//! ## 依赖关系
//! - 使用 `cli/upload.rs` 定义的参数
//! - 使用 `utils/transfer.rs`

use crate::cli::upload::UploadArgs;
use crate::error::Result;
use crate::utils::{output, progress, transfer};

/// 执行 upload 命令
pub fn execute(args: UploadArgs) -> Result<()> {
    output::print_header("Uploading archive");

    let spinner = progress::create_spinner(&format!("Uploading '{}'", args.file.display()));
    let link = transfer::upload(&args.file, &args.url);
    spinner.finish_and_clear();

    output::print_done(&format!("Download link: {}", link?));
    Ok(())
}
