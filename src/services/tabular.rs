//! 表格读写服务
//!
//! 输入文件在处理开始前一次性读完；输出文件只在最后打开一次，
//! 写完即刷新并关闭。

use crate::error::TabularError;
use crate::models::record::OUTPUT_COLUMNS;
use crate::models::{ExtractionRecord, PromptRow, ReportRow};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 输出文件名后缀
pub const OUTPUT_SUFFIX: &str = "_output.csv";

/// 读取提示词文件
pub fn read_prompts(path: &Path) -> Result<Vec<PromptRow>, TabularError> {
    let prompts: Vec<PromptRow> = read_rows(path)?;
    info!("已从提示词文件加载 {} 条记录", prompts.len());
    Ok(prompts)
}

/// 读取报告文件
pub fn read_reports(path: &Path) -> Result<Vec<ReportRow>, TabularError> {
    let reports: Vec<ReportRow> = read_rows(path)?;
    info!("已从报告文件加载 {} 条记录", reports.len());
    Ok(reports)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TabularError> {
    let path_str = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|source| TabularError::Open {
            path: path_str.clone(),
            source,
        })?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        // 表头占第 1 行
        let row = result.map_err(|source| TabularError::Row {
            path: path_str.clone(),
            row: idx + 2,
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// 输出文件路径：`<output_dir>/<timestamp>_output.csv`
pub fn output_file_path(output_dir: &Path, timestamp: &str) -> PathBuf {
    output_dir.join(format!("{}{}", timestamp, OUTPUT_SUFFIX))
}

/// 写出提取记录（始终包含表头）
pub fn write_records(path: &Path, records: &[ExtractionRecord]) -> Result<(), TabularError> {
    let path_str = path.display().to_string();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TabularError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| TabularError::Open {
            path: path_str.clone(),
            source,
        })?;

    let write_err = |source| TabularError::Write {
        path: path_str.clone(),
        source,
    };

    writer.write_record(OUTPUT_COLUMNS).map_err(write_err)?;
    for record in records {
        writer.serialize(record).map_err(write_err)?;
    }
    writer.flush().map_err(|source| TabularError::Io {
        path: path_str.clone(),
        source,
    })?;

    info!("已写出 {} 条记录到 {}", records.len(), path_str);
    Ok(())
}
