//! Library half of the `pakmount` command-line tool.

pub mod commands;

use serde::Serialize;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl OutputFormat {
    /// Render `value` as JSON, or return `None` for text output
    pub fn render_json<T: Serialize>(self, value: &T) -> serde_json::Result<Option<String>> {
        match self {
            Self::Text => Ok(None),
            Self::Json => serde_json::to_string(value).map(Some),
            Self::JsonPretty => serde_json::to_string_pretty(value).map(Some),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json() {
        let value = serde_json::json!({ "archives": 2 });
        assert_eq!(OutputFormat::Text.render_json(&value).unwrap(), None);
        assert_eq!(
            OutputFormat::Json.render_json(&value).unwrap().as_deref(),
            Some(r#"{"archives":2}"#)
        );
        assert!(
            OutputFormat::JsonPretty
                .render_json(&value)
                .unwrap()
                .unwrap()
                .contains('\n')
        );
    }
}
