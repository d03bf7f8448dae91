//! 批量提取处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源准备、调用批处理驱动器和写出结果。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：记录运行时间戳、读取输入文件、创建端点客户端
//! 2. **批量处理**：委托 `batch_driver` 遍历交叉积
//! 3. **结果持久化**：遍历结束后一次性写出输出文件
//! 4. **全局统计**：输出处理总数与失败数
//!
//! 初始化阶段的任何错误都会终止运行；单元格级别的错误不会到达这里。

use crate::clients::EndpointClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{PromptRow, ReportRow};
use crate::orchestrator::batch_driver;
use crate::services::tabular;
use crate::utils::logging;
use std::path::PathBuf;
use tracing::warn;

/// 时间戳格式（14位）
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// 应用主结构
pub struct App {
    config: Config,
    client: EndpointClient,
    prompts: Vec<PromptRow>,
    reports: Vec<ReportRow>,
    timestamp: String,
}

/// 运行结果摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_processed: usize,
    pub records_written: usize,
    pub failed_cells: usize,
    pub output_path: PathBuf,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        // 运行开始时记录一次 UTC 时间戳
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();

        logging::log_startup(&config, &timestamp);

        let prompts = tabular::read_prompts(&config.prompt_file)?;
        let reports = tabular::read_reports(&config.report_file)?;
        let client = EndpointClient::new(&config.endpoint_config())?;

        Ok(Self {
            config,
            client,
            prompts,
            reports,
            timestamp,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        logging::log_inputs_loaded(
            self.config.iterations,
            self.reports.len(),
            self.prompts.len(),
        );

        if self.prompts.is_empty() || self.reports.is_empty() {
            warn!(
                "⚠️ 输入为空（提示词 {} 条，报告 {} 条），不会产生任何提取记录",
                self.prompts.len(),
                self.reports.len()
            );
        }

        let state = batch_driver::run(
            &self.client,
            &self.config.model,
            self.config.iterations as usize,
            &self.reports,
            &self.prompts,
        )
        .await;

        let output_path = tabular::output_file_path(&self.config.output_dir, &self.timestamp);
        tabular::write_records(&output_path, &state.output_rows)?;

        let summary = RunSummary {
            total_processed: state.total_processed,
            records_written: state.output_rows.len(),
            failed_cells: state.failed_cells,
            output_path,
        };

        logging::print_final_stats(&summary);

        Ok(summary)
    }

    /// 本次运行的时间戳
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
