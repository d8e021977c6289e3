//! Post record and the typed GraphQL response envelope

use serde::{Deserialize, Serialize};

/// A published post as returned by the API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post title
    pub title: String,

    /// URL-safe identifier, used as the backup directory name
    pub slug: String,

    /// ISO-8601 publish timestamp, kept verbatim
    pub published_at: String,

    /// Post body
    pub content: PostContent,

    /// Tags in API order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<Tag>,
}

impl Post {
    /// Raw Markdown body
    pub fn markdown(&self) -> &str {
        &self.content.markdown
    }
}

/// Post body wrapper (`content { markdown }`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    /// Markdown source
    pub markdown: String,
}

/// A post tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag display name
    pub name: String,
}

/// GraphQL `{ node: T }` wrapper
#[derive(Clone, Debug, Deserialize)]
pub struct Edge<T> {
    /// Wrapped item
    pub node: T,
}

/// GraphQL `{ edges: [...] }` connection
#[derive(Clone, Debug, Deserialize)]
pub struct Connection<T> {
    /// Items of this page
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
}

/// Publication node: only its first page of posts is requested
#[derive(Clone, Debug, Deserialize)]
pub struct Publication {
    /// Posts of the publication
    pub posts: Connection<Post>,
}

/// `user` object
#[derive(Clone, Debug, Deserialize)]
pub struct User {
    /// Publications the user belongs to
    pub publications: Connection<Publication>,
}

/// `data` object
#[derive(Clone, Debug, Deserialize)]
pub struct UserData {
    /// `null` when the username is unknown
    pub user: Option<User>,
}

/// Top-level GraphQL response
#[derive(Clone, Debug, Deserialize)]
pub struct GraphQlResponse {
    /// Present on success
    #[serde(default)]
    pub data: Option<UserData>,

    /// Present when the API rejected the query
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
