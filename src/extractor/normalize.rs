//! Lenient semantic version normalization
//!
//! Issue authors write versions as `0.72.1`, `v0.72.1` or ` 0.72.1 `. All of
//! these normalize to the canonical `MAJOR.MINOR.PATCH[-prerelease]` string.
//! Build metadata is accepted but not part of the canonical form.

use semver::{BuildMetadata, Version};

/// Longest input accepted as a version candidate
pub const MAX_VERSION_LENGTH: usize = 256;

/// Largest numeric component accepted (2^53 - 1)
const MAX_COMPONENT: u64 = 9_007_199_254_740_991;

/// Parse `raw` as a semantic version and return its canonical string
///
/// Returns `None` when the text is not a complete semantic version.
///
/// # Example
/// ```
/// use version_labeler::extractor::normalize_version;
/// assert_eq!(normalize_version(" v1.2.3 ").as_deref(), Some("1.2.3"));
/// assert_eq!(normalize_version("1.2"), None);
/// ```
pub fn normalize_version(raw: &str) -> Option<String> {
    if raw.len() > MAX_VERSION_LENGTH {
        return None;
    }

    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let mut version = Version::parse(unprefixed).ok()?;
    if [version.major, version.minor, version.patch]
        .iter()
        .any(|component| *component > MAX_COMPONENT)
    {
        return None;
    }

    version.build = BuildMetadata::EMPTY;
    Some(version.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_version() {
        assert_eq!(normalize_version("0.71.0").as_deref(), Some("0.71.0"));
    }

    #[test]
    fn test_v_prefix_and_whitespace() {
        assert_eq!(normalize_version("v1.2.3").as_deref(), Some("1.2.3"));
        assert_eq!(normalize_version("  1.2.3\n").as_deref(), Some("1.2.3"));
        assert_eq!(normalize_version("\tv0.74.0-rc.2 ").as_deref(), Some("0.74.0-rc.2"));
    }

    #[test]
    fn test_build_metadata_is_dropped() {
        assert_eq!(normalize_version("1.0.0+20240101").as_deref(), Some("1.0.0"));
        assert_eq!(
            normalize_version("1.0.0-beta.1+exp.sha.5114f85").as_deref(),
            Some("1.0.0-beta.1")
        );
    }

    #[test]
    fn test_incomplete_or_garbage_is_rejected() {
        assert_eq!(normalize_version(""), None);
        assert_eq!(normalize_version("1.2"), None);
        assert_eq!(normalize_version("latest"), None);
        assert_eq!(normalize_version("0.71.0 and 0.72.0"), None);
        assert_eq!(normalize_version("V1.2.3"), None);
        assert_eq!(normalize_version("vv1.2.3"), None);
    }

    #[test]
    fn test_leading_zeros_are_rejected() {
        assert_eq!(normalize_version("01.2.3"), None);
        assert_eq!(normalize_version("1.2.3-01"), None);
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let long = format!("1.2.3-{}", "a".repeat(MAX_VERSION_LENGTH));
        assert_eq!(normalize_version(&long), None);
        assert_eq!(normalize_version("9007199254740992.0.0"), None);
        assert_eq!(
            normalize_version("9007199254740991.0.0").as_deref(),
            Some("9007199254740991.0.0")
        );
    }
}
