//! Paginated collections
//!
//! Providers disagree on how they signal the last page: a short page, a
//! `next` link, or a reported page count. Each provider's list envelope
//! implements [`PageEnvelope`] to answer "are there more pages?" and
//! [`paginate`] turns that into a lazy, finite stream of items.

use crate::error::Result;
use crate::http::{ApiRequest, Transport, fetch_json};
use futures_util::Stream;
use futures_util::stream;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::sync::Arc;

/// Position of a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page number
    pub page: u32,
    /// Requested page size, when the caller controls it
    pub per_page: Option<u32>,
}

/// Items of one page and whether another page follows
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// A page is the last one when it is shorter than the requested size
    pub fn sized(items: Vec<T>, cursor: &PageCursor) -> Self {
        let has_more = cursor
            .per_page
            .is_some_and(|per_page| items.len() >= per_page as usize);
        Self { items, has_more }
    }
}

/// A deserialized list response
pub trait PageEnvelope: DeserializeOwned + Send + 'static {
    type Item: Send + 'static;

    fn into_page(self, cursor: &PageCursor) -> Page<Self::Item>;
}

/// A collection endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub request: ApiRequest,
    pub per_page: Option<u32>,
}

impl Collection {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            request: ApiRequest::get(path),
            per_page: None,
        }
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    fn request_for(&self, cursor: &PageCursor) -> ApiRequest {
        let request = self.request.clone().query("page", cursor.page);
        match cursor.per_page {
            Some(per_page) => request.query("per_page", per_page),
            None => request,
        }
    }
}

struct Pager<T> {
    transport: Arc<dyn Transport>,
    collection: Collection,
    next_page: Option<u32>,
    buffered: VecDeque<T>,
}

/// Stream every item of a collection, fetching pages only as they are needed
///
/// Stops after the page the envelope reports as last. A failed request or an
/// undecodable page ends the stream with that error.
pub fn paginate<E: PageEnvelope>(
    transport: Arc<dyn Transport>,
    collection: Collection,
) -> impl Stream<Item = Result<E::Item>> + Send {
    let pager = Pager {
        transport,
        collection,
        next_page: Some(1),
        buffered: VecDeque::new(),
    };

    stream::try_unfold(pager, next_item::<E>)
}

async fn next_item<E: PageEnvelope>(
    mut pager: Pager<E::Item>,
) -> Result<Option<(E::Item, Pager<E::Item>)>> {
    loop {
        if let Some(item) = pager.buffered.pop_front() {
            return Ok(Some((item, pager)));
        }

        let Some(page) = pager.next_page else {
            return Ok(None);
        };

        let cursor = PageCursor {
            page,
            per_page: pager.collection.per_page,
        };
        let request = pager.collection.request_for(&cursor);
        let envelope: E = fetch_json(pager.transport.as_ref(), &request).await?;
        let Page { items, has_more } = envelope.into_page(&cursor);

        tracing::trace!(
            "{} page {}: {} items, more: {}",
            request.path,
            page,
            items.len(),
            has_more
        );

        pager.next_page = if has_more { Some(page + 1) } else { None };
        pager.buffered.extend(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use futures_util::TryStreamExt;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Numbers {
        items: Vec<u32>,
        #[serde(default)]
        total_pages: Option<u32>,
    }

    impl PageEnvelope for Numbers {
        type Item = u32;

        fn into_page(self, cursor: &PageCursor) -> Page<u32> {
            match self.total_pages {
                Some(total) => Page {
                    items: self.items,
                    has_more: total > cursor.page,
                },
                None => Page::sized(self.items, cursor),
            }
        }
    }

    #[tokio::test]
    async fn test_sized_pages_stop_on_short_page() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok_json("numbers", serde_json::json!({"items": [1, 2]}));
        transport.ok_json("numbers", serde_json::json!({"items": [3]}));

        let items: Vec<u32> = paginate::<Numbers>(
            transport.clone(),
            Collection::new("numbers").per_page(2),
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query_value("page"), Some("1"));
        assert_eq!(requests[0].query_value("per_page"), Some("2"));
        assert_eq!(requests[1].query_value("page"), Some("2"));
    }

    #[tokio::test]
    async fn test_full_last_page_costs_one_empty_request() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok_json("numbers", serde_json::json!({"items": [1, 2]}));
        transport.ok_json("numbers", serde_json::json!({"items": []}));

        let items: Vec<u32> = paginate::<Numbers>(
            transport.clone(),
            Collection::new("numbers").per_page(2),
        )
        .try_collect()
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_reported_page_count_terminates() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok_json("numbers", serde_json::json!({"items": [1], "total_pages": 2}));
        transport.ok_json("numbers", serde_json::json!({"items": [2], "total_pages": 2}));

        let items: Vec<u32> = paginate::<Numbers>(transport.clone(), Collection::new("numbers"))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2]);
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.requests()[0].query_value("per_page"), None);
    }

    #[tokio::test]
    async fn test_decode_error_aborts_stream() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.ok_json("numbers", serde_json::json!({"unexpected": true}));

        let result: Result<Vec<u32>> =
            paginate::<Numbers>(transport.clone(), Collection::new("numbers"))
                .try_collect()
                .await;

        assert!(matches!(result, Err(crate::CloudError::Json(_))));
    }
}
