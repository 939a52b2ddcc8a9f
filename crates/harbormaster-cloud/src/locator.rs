//! Resource locator
//!
//! Finds the first item of a paginated collection that satisfies a predicate.
//! Pages are fetched lazily, so a match on page N costs exactly N requests.

use crate::error::Result;
use crate::http::Transport;
use crate::pagination::{Collection, PageEnvelope, paginate};
use futures_util::{Stream, TryStreamExt};
use std::sync::Arc;

/// Return the first item, in stream order, matching `predicate`
pub async fn find_first<T, S, P>(items: S, mut predicate: P) -> Result<Option<T>>
where
    S: Stream<Item = Result<T>>,
    P: FnMut(&T) -> bool,
{
    let mut items = std::pin::pin!(items);
    while let Some(item) = items.try_next().await? {
        if predicate(&item) {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Provider-agnostic lookup over paginated collections
#[derive(Clone)]
pub struct Locator {
    transport: Arc<dyn Transport>,
}

impl Locator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn find<E, P>(&self, collection: Collection, predicate: P) -> Result<Option<E::Item>>
    where
        E: PageEnvelope,
        P: FnMut(&E::Item) -> bool,
    {
        find_first(paginate::<E>(self.transport.clone(), collection), predicate).await
    }
}
