//! Lazy pagination over page-shaped endpoints
//!
//! A page fetcher answers one request with [`Page`]: either a batch of items
//! plus an optional continuation token, or the end of data. [`paginate`]
//! threads the token from page to page and flattens the batches into a
//! stream. Termination is `None` from the stream; errors come through as
//! `Err` items and end the stream.

use std::collections::VecDeque;
use std::future::Future;

use futures_util::stream::{self, Stream};

use crate::Result;

/// Outcome of fetching one page
#[derive(Debug, Clone, PartialEq)]
pub enum Page<T, C> {
    /// Items of this page and the token for the next one, if any
    Items { items: Vec<T>, next: Option<C> },
    /// The backend signalled there is nothing more
    End,
}

struct State<T, C, F> {
    fetch: F,
    buffered: VecDeque<T>,
    next: Option<C>,
}

/// Turn a page fetcher into a lazy stream of items, starting at `start`
pub fn paginate<'a, T, C, F, Fut>(start: C, fetch: F) -> impl Stream<Item = Result<T>> + 'a
where
    T: 'a,
    C: 'a,
    F: FnMut(C) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T, C>>> + 'a,
{
    let state = State {
        fetch,
        buffered: VecDeque::new(),
        next: Some(start),
    };
    stream::try_unfold(state, next_item)
}

async fn next_item<T, C, F, Fut>(mut state: State<T, C, F>) -> Result<Option<(T, State<T, C, F>)>>
where
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<Page<T, C>>>,
{
    loop {
        if let Some(item) = state.buffered.pop_front() {
            return Ok(Some((item, state)));
        }

        let Some(token) = state.next.take() else {
            return Ok(None);
        };

        match (state.fetch)(token).await? {
            Page::End => return Ok(None),
            Page::Items { items, next } => {
                state.buffered.extend(items);
                state.next = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{StreamExt, TryStreamExt};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pages(index: u32) -> Result<Page<&'static str, u32>> {
        Ok(match index {
            0 => Page::Items {
                items: vec!["a", "b"],
                next: Some(1),
            },
            1 => Page::Items {
                items: vec![],
                next: Some(2),
            },
            2 => Page::Items {
                items: vec!["c"],
                next: Some(3),
            },
            _ => Page::End,
        })
    }

    #[tokio::test]
    async fn test_flattens_pages_until_end() {
        let items: Vec<_> = paginate(0, |i| async move { pages(i) })
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_missing_next_token_ends_stream() {
        let items: Vec<u8> = paginate((), |_| async {
            Ok::<_, crate::Error>(Page::Items {
                items: vec![1, 2],
                next: None,
            })
        })
        .try_collect()
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_error_is_yielded_then_stream_ends() {
        let stream = paginate(0u32, |i| async move {
            if i == 0 {
                Ok(Page::Items {
                    items: vec![10],
                    next: Some(1),
                })
            } else {
                Err(crate::Error::unknown_backend_response("broken page"))
            }
        });
        let results: Vec<_> = stream.collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(*results[0].as_ref().unwrap(), 10);
        assert!(matches!(
            results[1],
            Err(crate::Error::UnknownBackendResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_is_lazy_and_abandonable() {
        let calls = AtomicUsize::new(0);
        let stream = paginate(0, |i| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { pages(i) }
        });
        let mut stream = std::pin::pin!(stream);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        assert_eq!(stream.next().await.unwrap().unwrap(), "b");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
