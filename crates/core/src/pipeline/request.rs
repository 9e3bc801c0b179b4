//! Validated merge requests.

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

/// Reasons a merge request is rejected before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Provide sources: [url1, url2, ...]")]
    NoSources,

    #[error("Source {index} is not a valid http(s) URL: {value}")]
    InvalidSource { index: usize, value: String },

    #[error("Output name must be a plain file name: {0}")]
    UnsafeOutputName(String),
}

/// An ordered, non-empty list of sources plus the output name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    sources: Vec<Url>,
    output_name: String,
}

impl MergeRequest {
    /// Validates raw request fields.
    ///
    /// An absent or blank output name becomes `merged-<unix millis>.mp4`.
    pub fn new(
        sources: Vec<String>,
        output_name: Option<String>,
    ) -> Result<Self, ValidationError> {
        Self::new_at(sources, output_name, Utc::now())
    }

    /// Same as [`MergeRequest::new`] with an explicit clock for the default name.
    pub fn new_at(
        sources: Vec<String>,
        output_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if sources.is_empty() {
            return Err(ValidationError::NoSources);
        }

        let sources = sources
            .into_iter()
            .enumerate()
            .map(|(index, value)| parse_source(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        let output_name = match output_name {
            Some(name) if !name.trim().is_empty() => check_output_name(name)?,
            _ => default_output_name(now),
        };

        Ok(Self {
            sources,
            output_name,
        })
    }

    pub fn sources(&self) -> &[Url] {
        &self.sources
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }
}

fn parse_source(index: usize, value: String) -> Result<Url, ValidationError> {
    match Url::parse(value.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(ValidationError::InvalidSource { index, value }),
    }
}

/// The output name is both a local file name and an object key.
fn check_output_name(name: String) -> Result<String, ValidationError> {
    let unsafe_name = name.contains(['/', '\\', '\0']) || name == "." || name == "..";
    if unsafe_name {
        return Err(ValidationError::UnsafeOutputName(name));
    }
    Ok(name)
}

/// Timestamp-derived name used when the caller gives none.
pub fn default_output_name(now: DateTime<Utc>) -> String {
    format!("merged-{}.mp4", now.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn urls(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_new_keeps_source_order() {
        let request = MergeRequest::new(
            urls(&["http://a/2.mp4", "http://a/1.mp4", "https://b/3.mp4"]),
            None,
        )
        .unwrap();

        let sources: Vec<_> = request.sources().iter().map(Url::as_str).collect();
        assert_eq!(
            sources,
            vec!["http://a/2.mp4", "http://a/1.mp4", "https://b/3.mp4"]
        );
    }

    #[test]
    fn test_new_rejects_empty_sources() {
        let err = MergeRequest::new(Vec::new(), Some("out.mp4".to_string())).unwrap_err();
        assert_eq!(err, ValidationError::NoSources);
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = MergeRequest::new(urls(&["http://a/1.mp4", "not a url"]), None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidSource {
                index: 1,
                value: "not a url".to_string()
            }
        );
    }

    #[test]
    fn test_new_rejects_non_http_scheme() {
        let err = MergeRequest::new(urls(&["file:///etc/passwd"]), None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSource { index: 0, .. }));
    }

    #[test]
    fn test_default_output_name() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let request = MergeRequest::new_at(urls(&["http://a/1.mp4"]), None, now).unwrap();
        assert_eq!(request.output_name(), "merged-1700000000123.mp4");
    }

    #[test]
    fn test_blank_output_name_is_defaulted() {
        let now = Utc.timestamp_millis_opt(42).unwrap();
        let request =
            MergeRequest::new_at(urls(&["http://a/1.mp4"]), Some("  ".to_string()), now).unwrap();
        assert_eq!(request.output_name(), "merged-42.mp4");
    }

    #[test]
    fn test_explicit_output_name() {
        let request =
            MergeRequest::new(urls(&["http://a/1.mp4"]), Some("out.mp4".to_string())).unwrap();
        assert_eq!(request.output_name(), "out.mp4");
    }

    #[test]
    fn test_unsafe_output_names() {
        for name in ["../out.mp4", "dir/out.mp4", "a\\b.mp4", "..", "."] {
            let err = MergeRequest::new(urls(&["http://a/1.mp4"]), Some(name.to_string()))
                .unwrap_err();
            assert!(
                matches!(err, ValidationError::UnsafeOutputName(_)),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn test_no_sources_message() {
        assert_eq!(
            ValidationError::NoSources.to_string(),
            "Provide sources: [url1, url2, ...]"
        );
    }
}
