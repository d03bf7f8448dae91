pub mod payload;
pub mod record;
pub mod rows;

pub use payload::{ChatMessage, ChatRequest, ChatResponse};
pub use record::ExtractionRecord;
pub use rows::{PromptRow, ReportRow};
