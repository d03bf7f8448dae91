//! 批处理驱动器 - 编排层
//!
//! ## 职责
//!
//! 按 (轮次, 报告, 提示词) 的字典序遍历整个交叉积，逐个单元格调用端点并提取结果。
//!
//! ## 设计特点
//!
//! - **严格顺序**：单元格一个接一个执行，输出顺序与遍历顺序一致
//! - **单元格隔离**：端点失败或提取失败只跳过当前单元格，不会中止整批
//! - **显式结果**：每个单元格返回 `Result<ExtractionRecord, CellError>`，由驱动器分支处理
//! - **唯一所有者**：输出序列和计数器只归驱动器所有，无需加锁

use crate::clients::CompletionService;
use crate::error::CellError;
use crate::models::{ChatRequest, ExtractionRecord, PromptRow, ReportRow};
use crate::services::extractor;
use crate::utils::logging::truncate_text;
use tracing::{debug, error, info};

/// 每处理多少份报告输出一次进度
pub const PROGRESS_INTERVAL: usize = 10;

/// 单次运行的状态
#[derive(Debug, Default)]
pub struct RunState {
    /// 已处理的 (轮次, 报告) 数量
    pub total_processed: usize,
    /// 按遍历顺序追加的提取记录
    pub output_rows: Vec<ExtractionRecord>,
    /// 被跳过的单元格数量
    pub failed_cells: usize,
}

/// 单元格坐标（仅用于日志）
#[derive(Debug, Clone, Copy)]
struct CellCoord {
    iteration: usize,
    report_number: usize,
    prompt_number: usize,
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[轮次 {} 报告 #{} 提示词 #{}]",
            self.iteration + 1,
            self.report_number,
            self.prompt_number
        )
    }
}

/// 运行整个批次
///
/// # 参数
/// - `service`: 补全服务（已携带端点配置）
/// - `model`: 模型名称
/// - `iterations`: 轮数
/// - `reports`: 报告行
/// - `prompts`: 提示词行
///
/// # 返回
/// 返回运行状态（输出记录与计数）
pub async fn run<S>(
    service: &S,
    model: &str,
    iterations: usize,
    reports: &[ReportRow],
    prompts: &[PromptRow],
) -> RunState
where
    S: CompletionService + ?Sized,
{
    let mut state = RunState::default();

    for iteration in 0..iterations {
        for (report_number, report) in (1..).zip(reports) {
            for (prompt_number, prompt) in (1..).zip(prompts) {
                let coord = CellCoord {
                    iteration,
                    report_number,
                    prompt_number,
                };

                match process_cell(service, model, report, prompt_number, prompt).await {
                    Ok(record) => {
                        debug!(
                            "{} 提取结果: {}",
                            coord,
                            truncate_text(&record.extracted_value, 200)
                        );
                        state.output_rows.push(record);
                    }
                    Err(e) => {
                        error!("{} 单元格已跳过: {}", coord, e);
                        state.failed_cells += 1;
                    }
                }
            }

            state.total_processed += 1;
            if state.total_processed % PROGRESS_INTERVAL == 0 {
                println!(
                    "Cumulative reports processed so far: {}",
                    state.total_processed
                );
                info!("累计已处理报告: {}", state.total_processed);
            }
        }
    }

    state
}

/// 处理单个单元格
async fn process_cell<S>(
    service: &S,
    model: &str,
    report: &ReportRow,
    prompt_number: usize,
    prompt: &PromptRow,
) -> Result<ExtractionRecord, CellError>
where
    S: CompletionService + ?Sized,
{
    let payload = ChatRequest::for_cell(model, prompt, report);

    let response = service.complete(&payload).await?;

    let extracted =
        extractor::extract_from_response(&response).map_err(|source| CellError::Extraction {
            source,
            payload: payload.to_log_string(),
            response: response.to_string(),
        })?;

    Ok(ExtractionRecord::new(
        report,
        prompt_number,
        prompt,
        extracted,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EndpointError;
    use crate::models::ChatResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 按请求内容决定响应的测试服务
    struct ScriptedService {
        calls: Mutex<Vec<String>>,
        respond: fn(&str) -> Result<ChatResponse, EndpointError>,
    }

    impl ScriptedService {
        fn new(respond: fn(&str) -> Result<ChatResponse, EndpointError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedService {
        async fn complete(&self, payload: &ChatRequest) -> Result<ChatResponse, EndpointError> {
            let content = payload.messages[0].content.clone();
            self.calls.lock().unwrap().push(content.clone());
            (self.respond)(&content)
        }
    }

    fn fenced(content: &str) -> Result<ChatResponse, EndpointError> {
        let first_line = content.lines().next().unwrap_or_default();
        Ok(ChatResponse(json!({
            "choices": [{"message": {"content": format!("```json {{\"echo\": \"{}\"}} ```", first_line)}}]
        })))
    }

    fn prompts(n: usize) -> Vec<PromptRow> {
        (1..=n)
            .map(|i| PromptRow {
                prompt: format!("prompt-{}", i),
                field_name: format!("field-{}", i),
            })
            .collect()
    }

    fn reports(n: usize) -> Vec<ReportRow> {
        (1..=n)
            .map(|i| ReportRow {
                id: format!("id-{}", i),
                mrn: format!("mrn-{}", i),
                date: format!("2024-01-{:02}", i),
                report_text: format!("report-{}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_full_cross_product_in_order() {
        let service = ScriptedService::new(fenced);
        let state = run(&service, "m", 2, &reports(3), &prompts(2)).await;

        assert_eq!(state.output_rows.len(), 2 * 3 * 2);
        assert_eq!(state.total_processed, 2 * 3);
        assert_eq!(state.failed_cells, 0);

        let order: Vec<(String, usize)> = state
            .output_rows
            .iter()
            .map(|r| (r.id.clone(), r.prompt_number))
            .collect();
        let mut expected = Vec::new();
        for _ in 0..2 {
            for r in 1..=3 {
                for p in 1..=2 {
                    expected.push((format!("id-{}", r), p));
                }
            }
        }
        assert_eq!(order, expected);

        let calls = service.calls();
        assert_eq!(calls[0], "prompt-1\nreport-1");
        assert_eq!(calls[1], "prompt-2\nreport-1");
        assert_eq!(calls[2], "prompt-1\nreport-2");
    }

    #[tokio::test]
    async fn test_records_trace_back_to_sources() {
        let service = ScriptedService::new(fenced);
        let reports = reports(2);
        let prompts = prompts(3);
        let state = run(&service, "m", 1, &reports, &prompts).await;

        for record in &state.output_rows {
            let report = reports.iter().find(|r| r.id == record.id).unwrap();
            assert_eq!(record.mrn, report.mrn);
            assert_eq!(record.report_date, report.date);
            let prompt = &prompts[record.prompt_number - 1];
            assert_eq!(record.expected_data_name, prompt.field_name);
            assert_eq!(
                record.extracted_value,
                format!("{{\"echo\": \"{}\"}}", prompt.prompt)
            );
        }
    }

    #[tokio::test]
    async fn test_cell_failures_do_not_abort() {
        fn flaky(content: &str) -> Result<ChatResponse, EndpointError> {
            if content.starts_with("prompt-1") {
                Err(EndpointError::Status {
                    endpoint: "https://example.test".to_string(),
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                })
            } else if content.starts_with("prompt-2") {
                Ok(ChatResponse(json!({
                    "choices": [{"message": {"content": "no structured data here"}}]
                })))
            } else if content.starts_with("prompt-3") {
                Ok(ChatResponse(json!({"unexpected": "shape"})))
            } else {
                fenced(content)
            }
        }

        let service = ScriptedService::new(flaky);
        let state = run(&service, "m", 2, &reports(2), &prompts(4)).await;

        // 只有 prompt-4 成功
        assert_eq!(state.output_rows.len(), 2 * 2);
        assert!(state.output_rows.iter().all(|r| r.prompt_number == 4));
        assert_eq!(state.failed_cells, 2 * 2 * 3);
        assert_eq!(state.total_processed, 2 * 2);
        assert_eq!(service.calls().len(), 2 * 2 * 4);
    }

    #[tokio::test]
    async fn test_all_failures_still_count_reports() {
        fn always_down(_: &str) -> Result<ChatResponse, EndpointError> {
            Err(EndpointError::InvalidEndpoint {
                endpoint: "x".to_string(),
                reason: "down".to_string(),
            })
        }

        let service = ScriptedService::new(always_down);
        let state = run(&service, "m", 3, &reports(4), &prompts(2)).await;

        assert!(state.output_rows.is_empty());
        assert_eq!(state.total_processed, 12);
    }

    #[tokio::test]
    async fn test_empty_prompts_still_count_reports() {
        let service = ScriptedService::new(fenced);
        let state = run(&service, "m", 2, &reports(5), &[]).await;

        assert!(state.output_rows.is_empty());
        assert_eq!(state.total_processed, 10);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_model_is_sent_in_payload() {
        struct ModelCheck;

        #[async_trait]
        impl CompletionService for ModelCheck {
            async fn complete(
                &self,
                payload: &ChatRequest,
            ) -> Result<ChatResponse, EndpointError> {
                assert_eq!(payload.model, "gpt-4o");
                assert_eq!(payload.messages.len(), 1);
                assert_eq!(payload.messages[0].role, "user");
                fenced(&payload.messages[0].content)
            }
        }

        let state = run(&ModelCheck, "gpt-4o", 1, &reports(1), &prompts(1)).await;
        assert_eq!(state.output_rows.len(), 1);
    }
}
