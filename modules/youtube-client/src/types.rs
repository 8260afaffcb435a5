use serde::Deserialize;

/// Author id used when the API omits `authorChannelId` (deleted or hidden channels).
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One page of `commentThreads.list` results.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentThreadList {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

impl CommentThreadList {
    /// The continuation token, or `None` when this is the last page.
    /// An empty token is treated the same as an absent one.
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentThread {
    pub snippet: ThreadSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    pub top_level_comment: TopLevelComment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopLevelComment {
    pub snippet: CommentSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentSnippet {
    #[serde(rename = "textOriginal", default)]
    pub text_original: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(rename = "authorChannelId")]
    pub author_channel_id: Option<AuthorChannelId>,
}

impl CommentSnippet {
    pub fn author_id(&self) -> &str {
        self.author_channel_id
            .as_ref()
            .map(|a| a.value.as_str())
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorChannelId {
    #[serde(default)]
    pub value: String,
}

impl CommentThread {
    /// The snippet of the thread's top-level comment. Replies are not fetched.
    pub fn top_level(&self) -> &CommentSnippet {
        &self.snippet.top_level_comment.snippet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "kind": "youtube#commentThreadListResponse",
        "nextPageToken": "QURTSl9p",
        "items": [
            {"snippet": {"topLevelComment": {"snippet": {
                "textOriginal": "First!",
                "publishedAt": "2024-03-01T12:00:00Z",
                "authorChannelId": {"value": "UCabc"}
            }}}},
            {"snippet": {"topLevelComment": {"snippet": {
                "textOriginal": "no channel",
                "publishedAt": "2024-03-01T13:00:00Z"
            }}}}
        ]
    }"#;

    #[test]
    fn flattens_top_level_snippets() {
        let page: CommentThreadList = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.continuation(), Some("QURTSl9p"));

        let first = page.items[0].top_level();
        assert_eq!(first.text_original, "First!");
        assert_eq!(first.published_at, "2024-03-01T12:00:00Z");
        assert_eq!(first.author_id(), "UCabc");
    }

    #[test]
    fn missing_author_defaults_to_unknown() {
        let page: CommentThreadList = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.items[1].top_level().author_id(), UNKNOWN_AUTHOR);
    }

    #[test]
    fn last_page_has_no_continuation() {
        let page: CommentThreadList =
            serde_json::from_str(r#"{"items": [], "nextPageToken": ""}"#).unwrap();
        assert_eq!(page.continuation(), None);

        let page: CommentThreadList = serde_json::from_str(r#"{}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.continuation(), None);
    }
}
