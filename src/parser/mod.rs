pub mod markdown;

pub use markdown::{normalize_content, parse_sections};
