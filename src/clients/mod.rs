pub mod endpoint_client;
pub mod retry;

pub use endpoint_client::{CompletionService, EndpointClient};
pub use retry::RetryPolicy;
