//! # CSV 报告
//!
//! 每个条目一行: `index,source,status,output,message`。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `csv` + `serde`

use crate::batch::BatchSummary;
use crate::error::{PhotoflowError, Result};
use crate::models::Status;

use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    index: usize,
    source: &'a str,
    status: Status,
    output: String,
    message: &'a str,
}

/// 写出批次报告
pub fn write_report(summary: &BatchSummary, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(PhotoflowError::CsvError)?;

    for (i, r) in summary.results().iter().enumerate() {
        wtr.serialize(ReportRow {
            index: i + 1,
            source: &r.source,
            status: r.status,
            output: r.output_display().unwrap_or_default(),
            message: &r.message,
        })
        .map_err(PhotoflowError::CsvError)?;
    }

    wtr.flush().map_err(|e| PhotoflowError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
