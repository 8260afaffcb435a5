use std::time::Duration;

use tracing::{info, warn};
use tubepulse_common::Comment;

use crate::guard::{guarded, CallOutcome, CancelFlag};
use crate::traits::CommentSource;

/// Comments gathered for one video, plus how many pages it took.
#[derive(Debug, Default)]
pub struct FetchedComments {
    pub comments: Vec<Comment>,
    pub pages_requested: u32,
}

/// Paginated retrieval, capped at `max_comments`.
///
/// The cap is checked between pages and the last page is never truncated, so
/// the result can exceed the cap by up to `page_size - 1` items. Pagination
/// stops at the cap, at the first page without a continuation token, or at
/// the first failed page. Failures keep what was already gathered.
pub struct CommentFetcher<'a> {
    source: &'a dyn CommentSource,
    page_size: u32,
    max_comments: usize,
    timeout: Duration,
}

impl<'a> CommentFetcher<'a> {
    pub fn new(
        source: &'a dyn CommentSource,
        page_size: u32,
        max_comments: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            page_size,
            max_comments,
            timeout,
        }
    }

    pub async fn fetch(&self, video_id: &str, cancel: &CancelFlag) -> FetchedComments {
        let mut out = FetchedComments::default();
        let mut page_token = String::new();

        while out.comments.len() < self.max_comments {
            if cancel.is_cancelled() {
                info!(video_id, kept = out.comments.len(), "Comment fetch cancelled");
                break;
            }
            out.pages_requested += 1;
            let outcome = guarded(
                "commentThreads",
                self.timeout,
                cancel,
                self.source.page(video_id, &page_token, self.page_size),
            )
            .await;

            let page = match outcome {
                CallOutcome::Success(page) => page,
                other => {
                    warn!(
                        video_id,
                        page = out.pages_requested,
                        kept = out.comments.len(),
                        outcome = ?other,
                        "Comment pagination stopped early"
                    );
                    break;
                }
            };

            out.comments.extend(page.comments);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = next,
                None => break,
            }
        }

        info!(
            video_id,
            count = out.comments.len(),
            pages = out.pages_requested,
            "Comments fetched"
        );
        out
    }
}
