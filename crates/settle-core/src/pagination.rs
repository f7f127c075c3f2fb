//! Lazy pagination over token-based list APIs
//!
//! [`paginate`] turns a page-fetching function into a finite stream of items.
//! Pages are requested only as the stream is polled; the stream ends after
//! the first page without a continuation token, or right after an error.

use futures_util::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// One page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Stream every item of every page returned by `fetch`
///
/// `fetch` receives `None` for the first page and the previous page's token
/// afterwards.
pub fn paginate<T, E, F, Fut>(fetch: F) -> impl Stream<Item = Result<T, E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    stream::unfold((Cursor::Start, fetch), |(cursor, mut fetch)| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return None,
        };

        match fetch(token).await {
            Ok(page) => {
                let next = match page.next_token {
                    Some(token) if !token.is_empty() => Cursor::Next(token),
                    _ => Cursor::Done,
                };
                Some((Ok(page.items), (next, fetch)))
            }
            Err(err) => Some((Err(err), (Cursor::Done, fetch))),
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
}

/// Drain every page into a single vector
pub async fn collect_pages<T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    paginate(fetch).try_collect().await
}
