//! Common test utilities for hashnode-backup integration tests

#[allow(dead_code)]
pub mod fixtures;

#[allow(unused_imports)]
pub use fixtures::*;

use hashnode_backup::Config;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing the API at `server` and the output at `backup_path`
pub fn test_config(server: &MockServer, backup_path: &Path) -> Config {
    Config {
        api_url: format!("{}/graphql", server.uri()),
        token: "test-token".to_string(),
        username: "alice".to_string(),
        blog_host: "blog.example.com".to_string(),
        backup_path: backup_path.to_path_buf(),
        image_timeout: Duration::from_secs(5),
    }
}

/// Serve `body` for every GraphQL POST
pub async fn mount_api(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Serve `bytes` with `content_type` at `image_path`
#[allow(dead_code)]
pub async fn mount_image(server: &MockServer, image_path: &str, content_type: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", content_type)
                .set_body_bytes(bytes.to_vec()),
        )
        .mount(server)
        .await;
}
