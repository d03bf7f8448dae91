//! # Report Extract
//!
//! 一个将"提示词 × 报告"交叉积批量发送到文本生成端点、并从响应中提取结构化数据的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 与远程端点通信，只暴露"发送一次请求"的能力
//! - `EndpointClient` - 构建请求、指数退避重试、解码响应体
//! - `CompletionService` - 编排层依赖的抽象接口
//!
//! ### ② 业务能力层（Services）
//! - `services/extractor` - 从自由文本中隔离 ```json 代码块
//! - `services/tabular` - 读取输入 CSV、写出结果 CSV
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_driver` - 按 (轮次, 报告, 提示词) 顺序遍历并累积记录
//! - `orchestrator/batch_processor` - 应用生命周期：初始化、运行、写出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{CompletionService, EndpointClient, RetryPolicy};
pub use config::{Config, EndpointConfig};
pub use error::{AppError, AppResult, CellError, EndpointError, ExtractionFailure};
pub use models::{ChatRequest, ChatResponse, ExtractionRecord, PromptRow, ReportRow};
pub use orchestrator::{App, RunState, RunSummary};
