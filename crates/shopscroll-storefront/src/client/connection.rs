//! Connection-level fetches for `StorefrontClient`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use shopscroll_paging::{
    Applied, ConnectionExtractor, Page, PageExtractor, PaginationAccumulator, QueryState,
};

use crate::error::StorefrontError;

use super::StorefrontClient;
use super::MAX_PAGES;

impl StorefrontClient {
    /// Fetches one page of the connection at `connection_path` (dotted path
    /// or JSON pointer into `data`, e.g. `collection.products`).
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::query`]; returns
    /// [`StorefrontError::Paging`] if the connection is missing or its nodes
    /// do not decode as `T`.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: &QueryState,
        connection_path: &str,
    ) -> Result<Page<T>, StorefrontError> {
        let data = self.query(&request.query, &request.variables).await?;
        let page = ConnectionExtractor::<T>::new(connection_path).extract_page(&data)?;
        Ok(page)
    }

    /// Drains a connection, following `endCursor` until `hasNextPage` is false.
    ///
    /// `inter_request_delay_ms` is slept between page requests (not before the
    /// first). Any page failure discards the pages already fetched.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_page`]. Returns
    /// [`StorefrontError::PaginationLimit`] if the connection has more than
    /// [`MAX_PAGES`] pages.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        request: QueryState,
        connection_path: &str,
        inter_request_delay_ms: u64,
    ) -> Result<Vec<T>, StorefrontError> {
        let mut accumulator = PaginationAccumulator::new(request);

        while let Some(next) = accumulator.begin_load() {
            if accumulator.pages_loaded() >= MAX_PAGES {
                return Err(StorefrontError::PaginationLimit {
                    store: self.endpoint().to_owned(),
                    max_pages: MAX_PAGES,
                });
            }
            if accumulator.pages_loaded() > 0 && inter_request_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
            }

            let page = self.fetch_page::<T>(&next, connection_path).await?;
            if let Applied::Appended {
                added,
                has_next_page,
            } = accumulator.complete(page)?
            {
                tracing::debug!(
                    connection = connection_path,
                    page = accumulator.pages_loaded(),
                    added,
                    has_next_page,
                    "connection page fetched"
                );
            }
        }

        Ok(accumulator.into_items())
    }
}
