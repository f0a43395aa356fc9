//! Cursor-based paging over directory collections

use serde::Deserialize;
use std::future::Future;
use tracing::debug;

use crate::error::Result;
use crate::models::DirectoryObject;
use crate::query::{DirectoryCollection, DirectoryQuery};
use crate::traits::DirectoryClient;

/// One page of a Graph collection response
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    pub fn new(value: Vec<T>, next_link: Option<String>) -> Self {
        Self { value, next_link }
    }

    /// A page with no continuation
    pub fn last(value: Vec<T>) -> Self {
        Self::new(value, None)
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// Walk the page chain starting at `first_page`, accumulating every record in
/// arrival order. The first page may be empty, partial or full; the walk ends
/// when a page carries no next link.
pub async fn aggregate<T, F, Fut>(first_page: Page<T>, mut fetch_next_page: F) -> Result<Vec<T>>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = first_page.value;
    let mut next_link = first_page.next_link;
    let mut pages = 1usize;

    while let Some(link) = next_link.take() {
        let page = fetch_next_page(link).await?;
        pages += 1;
        items.extend(page.value);
        next_link = page.next_link;
    }

    debug!("Aggregated {} records from {} page(s)", items.len(), pages);

    Ok(items)
}

/// Issue `query` against `collection` and follow every next link.
pub async fn fetch_all(
    client: &dyn DirectoryClient,
    collection: &DirectoryCollection,
    query: &DirectoryQuery,
) -> Result<Vec<DirectoryObject>> {
    let first_page = client.query(collection, query).await?;
    aggregate(first_page, |link| async move { client.next_page(&link, query).await }).await
}
