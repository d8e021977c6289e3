//! GraphQL response fixtures

use serde_json::{Value, json};

/// A post edge as the API returns it
pub fn post_edge(
    title: &str,
    slug: &str,
    published_at: &str,
    markdown: &str,
    tags: &[&str],
) -> Value {
    let tags: Vec<Value> = tags.iter().map(|name| json!({ "name": name })).collect();
    json!({
        "node": {
            "title": title,
            "slug": slug,
            "publishedAt": published_at,
            "content": { "markdown": markdown },
            "tags": tags
        }
    })
}

/// Full success envelope, one inner vec per publication
pub fn envelope(publications: Vec<Vec<Value>>) -> Value {
    let edges: Vec<Value> = publications
        .into_iter()
        .map(|posts| json!({ "node": { "posts": { "edges": posts } } }))
        .collect();
    json!({ "data": { "user": { "publications": { "edges": edges } } } })
}

/// PNG signature, enough for byte comparisons
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// JPEG start-of-image marker plus filler
pub const JPEG_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
