//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量提取处理器
//! - 管理应用生命周期（初始化、运行、写出）
//! - 持有输入行、端点客户端和运行时间戳
//! - 输出全局统计信息
//!
//! ### `batch_driver` - 批处理驱动器
//! - 按 (轮次, 报告, 提示词) 顺序遍历交叉积
//! - 每个单元格：构建载荷 → 调用端点 → 提取 → 追加记录
//! - 单元格失败只记录日志并跳过
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App)
//!     ↓
//! batch_driver (遍历交叉积)
//!     ↓
//! clients::CompletionService (端点调用 + 重试)
//!     ↓
//! services::extractor (文本隔离)
//! ```

pub mod batch_driver;
pub mod batch_processor;

// 重新导出主要类型
pub use batch_driver::{run, RunState};
pub use batch_processor::{App, RunSummary};
