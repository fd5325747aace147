//! Version extraction from parsed issue bodies
//!
//! The extractor scans the top-level sections of an issue body from the top.
//! Two headings announce a version:
//!
//! - `Version` / `New Version`: the next section holds the version itself
//! - ``Output of `react-native info` ``: the next section holds the pasted
//!   tool output, where the version follows `react-native:` and precedes `=>`
//!
//! The first heading whose follow-up yields a valid semantic version wins.
//! A heading followed by nothing usable does not stop the scan.

pub mod normalize;

pub use normalize::normalize_version;

use crate::models::Section;
use crate::parser::parse_sections;
use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

/// Headings whose next section states the version directly
pub const VERSION_HEADINGS: [&str; 2] = ["Version", "New Version"];

/// Heading whose next section contains `react-native info` output
pub const RN_INFO_HEADING: &str = "Output of `react-native info`";

/// Captures the installed react-native version from `react-native info` output
const RN_INFO_PATTERN: &str = r"react-native:(.+?)=>";

/// Finds the version declared in an issue body
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    rn_info_pattern: Regex,
}

impl VersionExtractor {
    pub fn new() -> Result<Self> {
        let rn_info_pattern =
            Regex::new(RN_INFO_PATTERN).context("Failed to compile react-native info pattern")?;
        Ok(Self { rn_info_pattern })
    }

    /// Return the canonical version declared in `sections`, if any
    pub fn extract(&self, sections: &[Section]) -> Option<String> {
        sections
            .iter()
            .enumerate()
            .find_map(|(index, section)| self.match_at(sections, index, section))
    }

    /// Parse `body` and extract its version
    pub fn extract_from_body(&self, body: &str) -> Option<String> {
        self.extract(&parse_sections(body))
    }

    fn match_at(&self, sections: &[Section], index: usize, section: &Section) -> Option<String> {
        let title = section.text()?;
        let is_version_heading = VERSION_HEADINGS.iter().any(|heading| *heading == title);
        if !is_version_heading && title != RN_INFO_HEADING {
            return None;
        }

        let Some(next) = sections.get(index + 1).and_then(Section::text) else {
            debug!(heading = title, "Heading is not followed by any text");
            return None;
        };

        let version = if is_version_heading {
            normalize_version(next)
        } else {
            self.version_from_rn_info(next)
        };

        match &version {
            Some(version) => debug!(heading = title, %version, "Found version"),
            None => debug!(heading = title, "No valid version after heading"),
        }
        version
    }

    fn version_from_rn_info(&self, output: &str) -> Option<String> {
        let captures = self.rn_info_pattern.captures(output)?;
        let raw = captures.get(1)?.as_str();
        normalize_version(raw.trim())
    }
}

/// Extract the version declared in an issue body
///
/// Convenience wrapper around [`VersionExtractor::extract_from_body`].
pub fn version_from_body(body: &str) -> Result<Option<String>> {
    Ok(VersionExtractor::new()?.extract_from_body(body))
}
