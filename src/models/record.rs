use crate::models::rows::{PromptRow, ReportRow};
use serde::Serialize;

/// 输出列（顺序即写出顺序）
pub const OUTPUT_COLUMNS: [&str; 6] = [
    "ID",
    "MRN",
    "ReportDate",
    "Prompt Number",
    "Expected Data Name",
    "Extracted Data Value",
];

/// 提取记录
///
/// 每个成功提取的单元格产生一条，创建后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "MRN")]
    pub mrn: String,
    #[serde(rename = "ReportDate")]
    pub report_date: String,
    /// 提示词在输入中的序号（从1开始）
    #[serde(rename = "Prompt Number")]
    pub prompt_number: usize,
    #[serde(rename = "Expected Data Name")]
    pub expected_data_name: String,
    #[serde(rename = "Extracted Data Value")]
    pub extracted_value: String,
}

impl ExtractionRecord {
    /// 由来源行构建记录，字段全部取自报告行和提示词行
    pub fn new(
        report: &ReportRow,
        prompt_number: usize,
        prompt: &PromptRow,
        extracted_value: String,
    ) -> Self {
        Self {
            id: report.id.clone(),
            mrn: report.mrn.clone(),
            report_date: report.date.clone(),
            prompt_number,
            expected_data_name: prompt.field_name.clone(),
            extracted_value,
        }
    }
}
