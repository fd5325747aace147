pub mod issue;
pub mod section;

pub use issue::{Issue, IssueRef, IssueState};
pub use section::Section;
