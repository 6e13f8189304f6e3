//! Marker based pagination over IAM list operations.

use std::future::Future;

use log::{debug, warn};

use crate::types::Page;

/// Fetch every page of a listing and concatenate the items in order.
///
/// `fetch` is called with `None` first, then with the marker of the previous page for as
/// long as the service reports the page as truncated. The first error aborts the whole
/// collection and no partial result is returned.
pub async fn collect_pages<T, E, F, Fut>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut items = Vec::new();
    let mut marker: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(marker.clone()).await?;
        pages += 1;
        debug!(
            "Fetched page {} with {} items (truncated: {})",
            pages,
            page.items.len(),
            page.is_truncated
        );
        items.extend(page.items);

        if !page.is_truncated {
            break;
        }

        match page.marker {
            Some(next) if marker.as_deref() == Some(next.as_str()) => {
                warn!(
                    "Listing returned the marker it was called with; stopping after {} pages",
                    pages
                );
                break;
            }
            Some(next) => marker = Some(next),
            None => {
                warn!("Listing reported a truncated page without a marker; stopping");
                break;
            }
        }
    }

    Ok(items)
}
