//! Routes-file parser.
//!
//! # Responsibilities
//! - Produce the ordered `(prefix, target)` list the route table is seeded from
//! - Skip blank lines and `#` comments
//! - Skip lines that do not split into exactly two tokens (warned, not fatal)
//! - Reject unparseable target URLs (fatal at startup)

use std::fs;
use std::path::Path;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not open configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed URL {url} on line {line}: {source}")]
    MalformedUrl {
        url: String,
        line: usize,
        source: url::ParseError,
    },
}

/// Parse the routes file into ordered `(prefix, target)` pairs.
///
/// Lines that are blank, start with `#` (after trimming), or do not contain
/// exactly two whitespace-separated tokens are skipped; the token-count skip
/// is logged so misedited lines do not vanish silently.
pub fn load_routes(path: &Path) -> Result<Vec<(String, Url)>, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_routes(&content)
}

fn parse_routes(content: &str) -> Result<Vec<(String, Url)>, ConfigError> {
    let mut routes = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[prefix, target] = tokens.as_slice() else {
            tracing::warn!(line = index + 1, text = raw, "skipping malformed route line");
            continue;
        };

        let target = Url::parse(target).map_err(|source| ConfigError::MalformedUrl {
            url: target.to_string(),
            line: index + 1,
            source,
        })?;
        routes.push((prefix.to_string(), target));
    }

    Ok(routes)
}
