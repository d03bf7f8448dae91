//! 输入行
//!
//! 两类输入都只加载一次，之后在每一轮中被反复遍历，从不修改。

use serde::Deserialize;

/// 提示词行
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptRow {
    #[serde(rename = "Prompt")]
    pub prompt: String,
    /// 期望提取的字段名
    #[serde(rename = "Field Name")]
    pub field_name: String,
}

/// 报告行
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "MRN")]
    pub mrn: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "ReportText")]
    pub report_text: String,
}
