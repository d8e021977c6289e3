//! # hashnode-backup
//!
//! One-shot backup of a Hashnode blog: fetch the user's published posts over the
//! GraphQL API, write each as Markdown with YAML frontmatter, and download the
//! images it references.
//!
//! ## Output layout
//!
//! ```text
//! {BACKUP_PATH}/
//! └── {slug}/
//!     ├── index.md
//!     └── images/
//!         └── {filename}
//! ```
//!
//! Every run re-fetches and overwrites everything.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hashnode_backup::{Config, run};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let summary = run(&config).await?;
//!     println!("backed up {} posts", summary.posts);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Post writing, image downloading and the run driver
pub mod backup;
/// GraphQL client
pub mod client;
/// Configuration
pub mod config;
/// Error types
pub mod error;
/// Frontmatter rendering
pub mod frontmatter;
/// Image URL extraction and filenames
pub mod images;
/// Post record and response envelope
pub mod types;

// Re-export commonly used types
pub use backup::{
    BackupSummary, ImageDownloader, PostReport, backup_post, is_safe_slug, run, write_post,
};
pub use client::HashnodeClient;
pub use config::Config;
pub use error::{Error, ImageError, Result};
pub use frontmatter::{Frontmatter, render_document};
pub use images::extract_image_urls;
pub use types::{Post, Tag};
