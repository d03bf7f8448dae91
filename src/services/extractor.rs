//! 响应提取服务 - 业务能力层
//!
//! 只负责从模型的自由文本中隔离出 ```json 代码块里的内容，
//! 不解析 JSON，也不校验其是否合法；解析交给输出文件的使用者。

use crate::error::ExtractionFailure;
use crate::models::ChatResponse;

/// 起始标记
pub const OPENING_FENCE: &str = "```json";

/// 结束标记
const CLOSING_FENCE: &str = "```";

/// 从原始响应文本中提取结构化数据
///
/// 1. 去掉换行，将单引号替换为双引号
/// 2. 以第一个 ```json 为界取其后的文本
/// 3. 截断到下一个 ``` 并去除两端空白和残留的反引号
pub fn extract(raw_content: &str) -> Result<String, ExtractionFailure> {
    let normalized = normalize(raw_content);

    let after_fence = normalized
        .split(OPENING_FENCE)
        .nth(1)
        .ok_or(ExtractionFailure::MissingFence)?;

    Ok(isolate_payload(after_fence))
}

/// 提取响应中 `choices[0].message.content` 的结构化数据
pub fn extract_from_response(response: &ChatResponse) -> Result<String, ExtractionFailure> {
    let content = response
        .first_content()
        .ok_or(ExtractionFailure::MissingContent)?;
    extract(content)
}

/// 规范化：合并换行并统一引号
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '\n' | '\r'))
        .map(|c| if c == '\'' { '"' } else { c })
        .collect()
}

/// 隔离起始标记之后的代码块内容
///
/// 对不含任何标记的文本而言只是去除两端空白，因此重复调用结果不变。
pub fn isolate_payload(segment: &str) -> String {
    let block = match segment.find(CLOSING_FENCE) {
        Some(end) => &segment[..end],
        None => segment,
    };
    block.trim().trim_matches('`').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_inline_block() {
        let raw = "Here is data ```json {\"a\":1} ``` thanks";
        assert_eq!(extract(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_multiline_block() {
        let raw = "Sure! Here is the result:\n```json\n{\n  'Diagnosis': 'Pneumonia'\n}\n```\nLet me know.";
        assert_eq!(extract(raw).unwrap(), "{  \"Diagnosis\": \"Pneumonia\"}");
    }

    #[test]
    fn test_extract_missing_fence() {
        assert_eq!(
            extract("{\"a\": 1} with no fence"),
            Err(ExtractionFailure::MissingFence)
        );
        // 没有 json 标签的代码块同样视为缺失
        assert_eq!(
            extract("```\n{\"a\": 1}\n```"),
            Err(ExtractionFailure::MissingFence)
        );
    }

    #[test]
    fn test_extract_uses_first_block() {
        let raw = "```json {\"first\":1} ``` and ```json {\"second\":2} ```";
        assert_eq!(extract(raw).unwrap(), "{\"first\":1}");
    }

    #[test]
    fn test_extract_unterminated_block() {
        let raw = "```json {\"a\":1}   ";
        assert_eq!(extract(raw).unwrap(), "{\"a\":1}");
    }

    #[test]
    fn test_extract_empty_block() {
        assert_eq!(extract("```json```").unwrap(), "");
    }

    #[test]
    fn test_isolate_is_idempotent() {
        let once = isolate_payload("   {\"a\": [1, 2]}  ");
        assert_eq!(once, "{\"a\": [1, 2]}");
        assert_eq!(isolate_payload(&once), once);

        let extracted = extract("x ```json  {\"k\":\"v\"}  ``` y").unwrap();
        assert_eq!(isolate_payload(&extracted), extracted);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("{'a':\r\n'b'}"), "{\"a\":\"b\"}");
    }

    #[test]
    fn test_extract_from_response() {
        let response = ChatResponse(json!({
            "choices": [{"message": {"content": "```json\n{'Stage': 'II'}\n```"}}]
        }));
        assert_eq!(extract_from_response(&response).unwrap(), "{\"Stage\": \"II\"}");

        let malformed = ChatResponse(json!({"error": "nope"}));
        assert_eq!(
            extract_from_response(&malformed),
            Err(ExtractionFailure::MissingContent)
        );
    }
}
