//! Image URL extraction and local filename rules
//!
//! Post bodies reference images in two forms: Markdown image syntax, optionally with
//! a trailing `align="..."` attribute, and raw `<img src="...">` tags. Only JPEG,
//! PNG and WebP images are kept.

use crate::error::ImageError;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Extensions accepted for download, lowercase
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Hex characters of the URL hash used in synthesized filenames
const HASH_PREFIX_LEN: usize = 16;

// Patterns are literals; a failure here is a programming error caught by the tests
#[allow(clippy::expect_used)]
static MARKDOWN_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[.*?\]\((.*?)(?:\s+align=".*?")?\)"#).expect("valid markdown image pattern")
});

#[allow(clippy::expect_used)]
static HTML_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]+src="([^">]+)""#).expect("valid html image pattern")
});

/// Extract downloadable image URLs from a Markdown body
///
/// Markdown matches come first, then HTML matches, each in document order.
/// Duplicates are kept. URLs with an unsupported extension are dropped and logged.
///
/// # Examples
///
/// ```
/// use hashnode_backup::images::extract_image_urls;
///
/// let body = r#"![a](https://x.com/a.png align="center") <img src="https://x.com/b.jpg">"#;
/// assert_eq!(
///     extract_image_urls(body),
///     vec!["https://x.com/a.png", "https://x.com/b.jpg"]
/// );
/// ```
pub fn extract_image_urls(body: &str) -> Vec<String> {
    let markdown = MARKDOWN_IMAGE.captures_iter(body);
    let html = HTML_IMAGE.captures_iter(body);

    let urls: Vec<String> = markdown
        .chain(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_alignment(m.as_str()))
        .filter(|url| {
            let supported = is_supported_image(url);
            if !supported {
                info!(url = %url, "skipping non-supported image format");
            }
            supported
        })
        .map(str::to_string)
        .collect();

    debug!(?urls, "found image URLs");
    urls
}

/// Whether the URL ends in an allowed image extension (case-insensitive)
///
/// Either the path (query string and fragment removed) or the whole URL must end
/// in one of [`ALLOWED_EXTENSIONS`]. The second form admits URLs such as
/// `https://host/image?id=photo.jpg`, which are saved under a synthesized name.
#[must_use]
pub fn is_supported_image(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    let end = lower.find(['?', '#']).unwrap_or(lower.len());
    let path = &lower[..end];
    ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| path.ends_with(ext) || lower.ends_with(ext))
}

/// Choose the local filename for a downloaded image
///
/// Uses the last path segment when it has an extension. Otherwise the name is
/// synthesized from a hash of the URL and the response content type, e.g.
/// `image_3f2a9c0d11b4e6f7.jpg` for `image/jpeg`.
///
/// # Errors
/// Returns [`ImageError::InvalidUrl`] if `url` is not an absolute URL.
pub fn local_filename(url: &str, content_type: Option<&str>) -> Result<String, ImageError> {
    let parsed = url::Url::parse(url).map_err(|e| ImageError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(mut segments) = parsed.path_segments()
        && let Some(last) = segments.next_back()
        && last.contains('.')
    {
        return Ok(last.to_string());
    }

    let hash = format!("{:x}", Sha256::digest(url.as_bytes()));
    Ok(format!(
        "image_{}.{}",
        &hash[..HASH_PREFIX_LEN],
        extension_for_content_type(content_type)
    ))
}

/// Map a `content-type` header to a file extension
///
/// `image/jpeg` becomes `jpg`; other subtypes are used as-is. A missing header
/// yields `bin`.
#[must_use]
pub fn extension_for_content_type(content_type: Option<&str>) -> String {
    let subtype = content_type
        .and_then(|ct| ct.split(';').next())
        .and_then(|mime| mime.trim().rsplit('/').next())
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match subtype.as_str() {
        "" => "bin".to_string(),
        "jpeg" => "jpg".to_string(),
        _ => subtype,
    }
}

fn strip_alignment(url: &str) -> &str {
    match url.find(" align=") {
        Some(idx) => url[..idx].trim(),
        None => url.trim(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_mixed_body() {
        let body = "Intro\n\n![alt](https://x.com/a.png)\n\n\
                    <img src=\"https://x.com/b.jpg\">\n\n![alt](https://x.com/c.gif)\n";
        assert_eq!(
            extract_image_urls(body),
            vec!["https://x.com/a.png", "https://x.com/b.jpg"]
        );
    }

    #[test]
    fn test_markdown_before_html_regardless_of_position() {
        let body = r#"<img src="https://x.com/first.png"> then ![x](https://x.com/second.png)"#;
        assert_eq!(
            extract_image_urls(body),
            vec!["https://x.com/second.png", "https://x.com/first.png"]
        );
    }

    #[test]
    fn test_alignment_attribute_is_stripped() {
        let body = r#"![cover](https://cdn.hashnode.com/res/cover.jpeg align="center")"#;
        assert_eq!(
            extract_image_urls(body),
            vec!["https://cdn.hashnode.com/res/cover.jpeg"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let body = "![a](https://x.com/a.png) ![a again](https://x.com/a.png)";
        assert_eq!(extract_image_urls(body).len(), 2);
    }

    #[test]
    fn test_html_with_other_attributes() {
        let body = r#"<img alt="x" class="wide" src="https://x.com/photo.WEBP" width="400">"#;
        assert_eq!(extract_image_urls(body), vec!["https://x.com/photo.WEBP"]);
    }

    #[test]
    fn test_no_images() {
        assert!(extract_image_urls("just text, [a link](https://x.com/a.png)").is_empty());
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image("https://x.com/a.PNG"));
        assert!(is_supported_image("https://x.com/a.jpeg?w=800"));
        assert!(is_supported_image("https://x.com/a.webp#top"));
        assert!(!is_supported_image("https://x.com/a.gif"));
        assert!(!is_supported_image("https://x.com/image?id=1"));
        assert!(!is_supported_image("https://x.com/a.svg"));
        assert!(!is_supported_image("https://x.com/a.svg?as=png"));
    }

    #[test]
    fn test_query_ending_in_extension_is_supported() {
        assert!(is_supported_image("https://x.com/image?fmt=.png"));
        assert!(is_supported_image("https://x.com/image?id=photo.JPG"));
        assert_eq!(extract_image_urls("![a](https://x.com/image?id=photo.jpg)").len(), 1);

        // No extension in the path, so the name comes from the URL hash
        let name = local_filename("https://x.com/image?id=photo.jpg", Some("image/jpeg")).unwrap();
        assert!(name.starts_with("image_"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn test_local_filename_from_path() {
        assert_eq!(
            local_filename("https://x.com/res/a.png", Some("image/png")).unwrap(),
            "a.png"
        );
        assert_eq!(
            local_filename("https://x.com/res/a.png?w=100", None).unwrap(),
            "a.png"
        );
    }

    #[test]
    fn test_local_filename_synthesized_jpeg_becomes_jpg() {
        let name = local_filename("https://x.com/image?id=1", Some("image/jpeg")).unwrap();
        assert!(name.starts_with("image_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "image_".len() + HASH_PREFIX_LEN + ".jpg".len());
    }

    #[test]
    fn test_local_filename_is_deterministic() {
        let a = local_filename("https://x.com/image?id=1", Some("image/png")).unwrap();
        let b = local_filename("https://x.com/image?id=1", Some("image/png")).unwrap();
        let c = local_filename("https://x.com/image?id=2", Some("image/png")).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_local_filename_invalid_url() {
        let result = local_filename("images/a.png", None);
        assert!(matches!(result, Err(ImageError::InvalidUrl { .. })));
    }

    #[test]
    fn test_extension_for_content_type() {
        assert_eq!(extension_for_content_type(Some("image/jpeg")), "jpg");
        assert_eq!(extension_for_content_type(Some("image/png; charset=binary")), "png");
        assert_eq!(extension_for_content_type(Some("image/webp")), "webp");
        assert_eq!(extension_for_content_type(None), "bin");
    }
}
