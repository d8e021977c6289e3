//! Writing posts to disk and downloading their images.
//!
//! Each post is handled by a fixed pipeline: render the document, write
//! `{backup_path}/{slug}/index.md`, extract image URLs, then download every image
//! into `{backup_path}/{slug}/images/`. The Markdown file is written before any
//! image is fetched so the text survives a failure during downloads.
//!
//! Image failures are logged and skipped, as are posts whose slug is not a safe
//! directory name. Everything else is fatal.

use crate::client::HashnodeClient;
use crate::config::Config;
use crate::error::{Error, ImageError, Result};
use crate::frontmatter::render_document;
use crate::images::{extract_image_urls, is_supported_image, local_filename};
use crate::types::Post;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Name of the Markdown file inside each post directory
pub const INDEX_FILE: &str = "index.md";

/// Name of the image subdirectory inside each post directory
pub const IMAGES_DIR: &str = "images";

/// Counters reported at the end of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackupSummary {
    /// Posts written
    pub posts: usize,
    /// Posts skipped because their slug is not a safe directory name
    pub posts_skipped: usize,
    /// Images saved to disk
    pub images_saved: usize,
    /// Images skipped because of an error
    pub images_failed: usize,
}

/// Outcome of [`backup_post`] for a single post
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PostReport {
    /// Whether `index.md` was written
    pub written: bool,
    /// Images saved to disk
    pub images_saved: usize,
    /// Images skipped because of an error
    pub images_failed: usize,
}

/// Whether `slug` names exactly one directory directly under the backup path
///
/// Rejects empty slugs, `.` and `..`, path separators and absolute paths.
#[must_use]
pub fn is_safe_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(slug).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Write the Markdown document of `post` and return the post directory
///
/// The directory is created if needed and `index.md` is overwritten.
///
/// # Errors
/// Returns [`Error::UnsafeSlug`] if the slug would escape the backup path, and
/// fails if the document cannot be rendered or written.
pub async fn write_post(post: &Post, config: &Config) -> Result<PathBuf> {
    if !is_safe_slug(&post.slug) {
        return Err(Error::UnsafeSlug {
            slug: post.slug.clone(),
        });
    }
    let document = render_document(post, &config.blog_host)?;

    let post_dir = config.backup_path.join(&post.slug);
    tokio::fs::create_dir_all(&post_dir).await?;

    let file_path = post_dir.join(INDEX_FILE);
    tokio::fs::write(&file_path, document.as_bytes()).await?;
    info!(path = %file_path.display(), "saved post");

    Ok(post_dir)
}

/// Downloads single images with a fixed timeout
pub struct ImageDownloader {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl ImageDownloader {
    /// Create a downloader whose requests time out after `timeout`
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hashnode-backup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Download `url` into `{post_dir}/images/` and return the saved path
    ///
    /// An existing file with the same name is overwritten.
    pub async fn download(
        &self,
        url: &str,
        post_dir: &Path,
    ) -> std::result::Result<PathBuf, ImageError> {
        if !is_supported_image(url) {
            return Err(ImageError::UnsupportedFormat {
                url: url.to_string(),
            });
        }

        let secs = self.timeout.as_secs();
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::from_reqwest(url, secs, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let filename = local_filename(url, content_type.as_deref())?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::from_reqwest(url, secs, e))?;

        let image_dir = post_dir.join(IMAGES_DIR);
        let image_path = image_dir.join(&filename);
        let io_err = |source| ImageError::Io {
            path: image_path.clone(),
            source,
        };
        tokio::fs::create_dir_all(&image_dir).await.map_err(io_err)?;
        tokio::fs::write(&image_path, &bytes).await.map_err(io_err)?;

        info!(filename = %filename, "downloaded image");
        Ok(image_path)
    }
}

/// Back up one post: write its document, then fetch its images one at a time
///
/// A post whose slug is not a safe directory name is logged and skipped.
///
/// # Errors
/// Only failures to render or write the Markdown file are returned.
pub async fn backup_post(
    post: &Post,
    config: &Config,
    downloader: &ImageDownloader,
) -> Result<PostReport> {
    info!(title = %post.title, "processing post");
    if !is_safe_slug(&post.slug) {
        warn!(slug = %post.slug, "post skipped: slug is not a safe directory name");
        return Ok(PostReport::default());
    }
    let post_dir = write_post(post, config).await?;

    let urls = extract_image_urls(post.markdown());
    info!(count = urls.len(), "found supported images");

    let mut report = PostReport {
        written: true,
        ..PostReport::default()
    };
    for url in &urls {
        info!(url = %url, "downloading image");
        match downloader.download(url, &post_dir).await {
            Ok(_) => report.images_saved += 1,
            Err(e) => {
                warn!(url = %url, error = %e, "image skipped");
                report.images_failed += 1;
            }
        }
    }

    Ok(report)
}

/// Run a full backup with `config`
///
/// # Errors
/// Fails on any fatal error: the post list cannot be fetched, or a post cannot be
/// rendered or written.
pub async fn run(config: &Config) -> Result<BackupSummary> {
    let client = HashnodeClient::new(config)?;
    let downloader = ImageDownloader::new(config.image_timeout)?;

    let posts = client.fetch_posts().await?;

    let mut summary = BackupSummary::default();
    for post in &posts {
        let report = backup_post(post, config, &downloader).await?;
        if report.written {
            summary.posts += 1;
        } else {
            summary.posts_skipped += 1;
        }
        summary.images_saved += report.images_saved;
        summary.images_failed += report.images_failed;
    }

    Ok(summary)
}
