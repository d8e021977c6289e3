//! GraphQL client that fetches a user's published posts.
//!
//! One query is issued per run. It asks for the first 10 publications of the user
//! and the first 50 posts of each; anything beyond those pages is not fetched.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{GraphQlResponse, Post};
use tracing::{debug, error, info};

/// Publications requested per query
pub const PUBLICATIONS_PER_QUERY: u32 = 10;

/// Posts requested per publication
pub const POSTS_PER_PUBLICATION: u32 = 50;

/// Number of body characters included in the debug preview of the response
const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Build the GraphQL document for `username`
///
/// The username is embedded as a JSON string literal, which is also a valid
/// GraphQL string literal, so quotes and backslashes are escaped.
pub fn build_query(username: &str) -> String {
    let username = serde_json::Value::String(username.to_string());
    format!(
        r#"{{
    user(username: {username}) {{
        publications(first: {PUBLICATIONS_PER_QUERY}) {{
            edges {{
                node {{
                    posts(first: {POSTS_PER_PUBLICATION}) {{
                        edges {{
                            node {{
                                title
                                slug
                                publishedAt
                                content {{
                                    markdown
                                }}
                                tags {{
                                    name
                                }}
                            }}
                        }}
                    }}
                }}
            }}
        }}
    }}
}}"#
    )
}

/// Flatten the publication → post edges into a single list
///
/// Order is publication order, then post order within each publication. A post
/// that belongs to several publications appears once per publication.
///
/// # Errors
/// Returns [`Error::Api`] if the response carries an `errors` list and
/// [`Error::MissingData`] if `data` or `data.user` is absent.
pub fn flatten(response: GraphQlResponse, raw: &str) -> Result<Vec<Post>> {
    if let Some(errors) = response.errors {
        let errors = errors.to_string();
        error!(errors = %errors, "API returned errors");
        return Err(Error::Api { errors });
    }

    let Some(user) = response.data.and_then(|data| data.user) else {
        error!(payload = %raw, "unexpected API response structure");
        return Err(Error::MissingData {
            payload: raw.to_string(),
        });
    };

    let posts = user
        .publications
        .edges
        .into_iter()
        .flat_map(|publication| publication.node.posts.edges)
        .map(|edge| edge.node)
        .collect();

    Ok(posts)
}

/// Client for the Hashnode GraphQL API
pub struct HashnodeClient {
    http_client: reqwest::Client,
    api_url: String,
    token: String,
    username: String,
}

impl HashnodeClient {
    /// Create a client for the endpoint and credentials in `config`
    ///
    /// The post-list request has no timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("hashnode-backup/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            token: config.token.clone(),
            username: config.username.clone(),
        })
    }

    /// Fetch every post reachable from the first page of publications
    ///
    /// # Errors
    /// Any transport failure, an `errors` list in the response, a missing `data`
    /// field, or a body that is not the expected JSON envelope.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let query = build_query(&self.username);

        let response = self
            .http_client
            .post(&self.api_url)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), "API response status");
        debug!(preview = %preview(&body), "API response content");

        let envelope: GraphQlResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                status = status.as_u16(),
                payload = %preview(&body),
                "API response is not a GraphQL envelope"
            );
            Error::MalformedResponse(e)
        })?;

        let posts = flatten(envelope, &body)?;
        info!(count = posts.len(), "fetched posts");
        Ok(posts)
    }
}

fn preview(body: &str) -> String {
    let mut preview: String = body.chars().take(RESPONSE_PREVIEW_CHARS).collect();
    if preview.len() < body.len() {
        preview.push_str("...");
    }
    preview
}
