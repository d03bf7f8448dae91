pub mod extractor;
pub mod tabular;

pub use extractor::{extract, extract_from_response};
