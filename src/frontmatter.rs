//! Markdown document rendering with YAML frontmatter

use crate::error::{Error, Result};
use crate::types::Post;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Metadata block written at the top of each `index.md`
///
/// Fields are declared in alphabetical order, which is the key order of the
/// emitted YAML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Frontmatter {
    /// `https://{blog_host}/{slug}`
    pub canonical_url: String,
    /// Publish date as `YYYY-MM-DD`
    pub date: String,
    /// Post slug
    pub slug: String,
    /// Tag names in API order
    pub tags: Vec<String>,
    /// Post title
    pub title: String,
}

impl Frontmatter {
    /// Derive the frontmatter of `post` for a blog served at `blog_host`
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimestamp`] if `publishedAt` is not ISO-8601.
    pub fn from_post(post: &Post, blog_host: &str) -> Result<Self> {
        let date = parse_publish_date(&post.published_at).ok_or_else(|| {
            Error::InvalidTimestamp {
                slug: post.slug.clone(),
                value: post.published_at.clone(),
            }
        })?;

        Ok(Self {
            canonical_url: format!("https://{}/{}", blog_host, post.slug),
            date: date.format("%Y-%m-%d").to_string(),
            slug: post.slug.clone(),
            tags: post.tags.iter().map(|tag| tag.name.clone()).collect(),
            title: post.title.clone(),
        })
    }

    /// Serialize to a YAML block (without delimiters)
    ///
    /// Values a YAML 1.1 reader would take for a boolean or a date are
    /// single-quoted, so every field reads back as a string.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(quote_yaml11_scalars(&yaml))
    }
}

/// Plain scalars that YAML 1.1 resolves to booleans
const YAML11_BOOLS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "true", "True", "TRUE",
    "false", "False", "FALSE", "on", "On", "ON", "off", "Off", "OFF",
];

fn is_yaml11_ambiguous(value: &str) -> bool {
    YAML11_BOOLS.contains(&value) || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Single-quote top-level `key: value` and `- item` scalars that are ambiguous under YAML 1.1
///
/// serde_yaml follows YAML 1.2, where `yes` or `2023-05-01` are plain strings.
/// Indented lines belong to block scalars and are left alone.
fn quote_yaml11_scalars(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len() + 8);
    for line in yaml.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };

        let split_at = if body.starts_with("- ") {
            Some(2)
        } else if body.starts_with(char::is_whitespace) {
            None
        } else {
            body.find(": ").map(|idx| idx + 2)
        };

        match split_at.map(|idx| body.split_at(idx)) {
            Some((prefix, value)) if is_yaml11_ambiguous(value) => {
                out.push_str(&format!("{prefix}'{value}'{newline}"));
            }
            _ => out.push_str(line),
        }
    }
    out
}

/// Render the full `index.md` content for `post`
///
/// # Errors
/// Fails on an unparsable publish timestamp or a YAML serialization error.
pub fn render_document(post: &Post, blog_host: &str) -> Result<String> {
    let yaml = Frontmatter::from_post(post, blog_host)?.to_yaml()?;
    Ok(format!("---\n{}---\n\n{}", yaml, post.markdown()))
}

/// Parse an ISO-8601 timestamp and return its calendar date in its own offset
///
/// Accepts RFC 3339 (`Z` or numeric offset, optional fraction), a naive
/// date-time, or a bare date.
pub fn parse_publish_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
