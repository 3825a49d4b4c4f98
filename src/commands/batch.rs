//! # 批处理公共流程
//!
//! 三个批处理子命令共用: 收集命令行输入 → 执行批次 → 写出归档、日志与报告 → 可选上传。
//!
//! ## 依赖关系
//! - 被 `commands/rename.rs`, `commands/convert.rs`, `commands/watermark.rs` 调用
//! - 使用 `batch/`, `utils/`
//! - 使用 `walkdir` + `glob` 展开目录输入，`tabled` 打印汇总

use crate::batch::{BatchRunContext, BatchRunner, Stats};
use crate::cli::InputArgs;
use crate::error::{PhotoflowError, Result};
use crate::models::input::relative_display;
use crate::models::UploadedEntry;
use crate::transform::Mode;
use crate::utils::{output, progress, report, transfer};

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};
use walkdir::WalkDir;

/// 汇总表的一行
#[derive(Debug, Clone, Tabled)]
struct StatsRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Total")]
    total: usize,
    #[tabled(rename = "Processed")]
    processed: usize,
    #[tabled(rename = "Errors")]
    errors: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
}

impl StatsRow {
    fn new(mode: &str, stats: Stats) -> Self {
        StatsRow {
            mode: mode.to_string(),
            total: stats.total,
            processed: stats.processed,
            errors: stats.errors,
            skipped: stats.skipped,
        }
    }
}

/// 执行一次批处理并输出结果
pub fn run_batch(mode: Mode, args: &InputArgs) -> Result<()> {
    let archive_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(mode.archive_name()));

    output::print_header(&format!("Photoflow: {}", mode));

    let entries = gather_entries(args)?;
    if entries.is_empty() {
        output::print_warning("No input files found; the archive will contain only log.txt");
    } else {
        output::print_info(&format!("Collected {} upload(s)", entries.len()));
    }

    let mut bar = progress::BatchProgress::new();
    let ctx = BatchRunner::new()
        .limit_mb(args.max_size_mb)
        .run(entries, mode, &mut bar)?;

    print_summary(&ctx);

    ctx.archive.write_to(&archive_path)?;
    output::print_success(&format!(
        "Archive saved to '{}' ({} bytes)",
        archive_path.display(),
        ctx.archive.len()
    ));

    if let Some(ref log_path) = args.log_file {
        fs::write(log_path, ctx.summary.log_text()).map_err(|e| PhotoflowError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;
        output::print_success(&format!("Log saved to '{}'", log_path.display()));
    }

    if let Some(ref report_path) = args.report {
        report::write_report(&ctx.summary, report_path)?;
        output::print_success(&format!("Report saved to '{}'", report_path.display()));
    }

    if args.upload {
        let spinner = progress::create_spinner("Uploading archive");
        let link = transfer::upload(&archive_path, &args.upload_url);
        spinner.finish_and_clear();
        output::print_done(&format!("Download link: {}", link?));
    }

    Ok(())
}

/// 打印每个条目的结果与汇总表
fn print_summary(ctx: &BatchRunContext) {
    let summary = &ctx.summary;

    output::print_separator();
    for result in summary.results() {
        output::print_result(result);
    }
    output::print_separator();

    let table = Table::new([StatsRow::new(&ctx.mode, summary.stats())]);
    println!("{}", table);
    output::print_info(&format!(
        "Read {:.2} MB of images",
        summary.input_bytes() as f64 / (1024.0 * 1024.0)
    ));

    let failed = summary.failures().count();
    if failed > 0 {
        output::print_warning(&format!("{} file(s) were not processed", failed));
    }
}

/// 将命令行输入展开为有序的上传条目
///
/// 文件与 zip 原样提交，以文件名为名；目录按 `pattern` 过滤后按路径排序，
/// 以相对该目录的路径为名。
pub fn gather_entries(args: &InputArgs) -> Result<Vec<UploadedEntry>> {
    let glob_pattern = glob::Pattern::new(&args.pattern).map_err(|e| {
        PhotoflowError::InvalidArgument(format!("Invalid pattern '{}': {}", args.pattern, e))
    })?;

    let mut entries = Vec::new();
    for input in &args.inputs {
        if input.is_dir() {
            for path in walk_dir(input, &glob_pattern, args.recursive) {
                let name = path
                    .strip_prefix(input)
                    .map(relative_display)
                    .unwrap_or_else(|_| path.display().to_string());
                entries.push(UploadedEntry::from_path(name, &path)?);
            }
        } else if input.is_file() {
            let name = input
                .file_name()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| input.display().to_string());
            entries.push(UploadedEntry::from_path(name, input)?);
        } else {
            return Err(PhotoflowError::FileNotFound {
                path: input.display().to_string(),
            });
        }
    }

    Ok(entries)
}

fn walk_dir(dir: &Path, pattern: &glob::Pattern, recursive: bool) -> Vec<PathBuf> {
    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().is_some_and(|n| pattern.matches(n)))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
