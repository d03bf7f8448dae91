//! 请求与响应载荷

use crate::models::rows::{PromptRow, ReportRow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 单条对话消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// 请求载荷，每个单元格新建一份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// 提示词与报告正文之间以换行分隔
    pub fn for_cell(model: &str, prompt: &PromptRow, report: &ReportRow) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: format!("{}\n{}", prompt.prompt, report.report_text),
            }],
        }
    }

    /// 用于日志的 JSON 文本
    pub fn to_log_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// 端点返回的 JSON 响应
///
/// 保持动态结构：形状不符合预期属于提取失败，而不是解码失败。
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse(pub Value);

impl ChatResponse {
    /// `choices[0].message.content`
    pub fn first_content(&self) -> Option<&str> {
        self.0
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
    }
}

impl std::fmt::Display for ChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
