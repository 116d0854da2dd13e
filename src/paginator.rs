//! Lazy paginated sequences.
//!
//! A [`Paginator`] is a read-only, index-addressable view of a remote
//! collection whose total size and page size are known up front. Pages are
//! fetched through an injected [`PageLoader`] on first access to any index
//! inside them and cached for the paginator's lifetime; accesses that hit a
//! cached page never touch the network.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::decode_items;
use crate::error::{Error, Result};
use crate::models::Resource;
use crate::transport::Transport;

/// Page-loading capability injected into a [`Paginator`].
///
/// Implementations load one page worth of items, preserving the backing
/// source's element order. Loads for distinct pages are independent; a
/// failure must leave no partial state behind.
pub trait PageLoader<T>: Send + Sync {
    /// Load the page at `page_index` (0-based).
    fn load_page(&self, page_index: usize) -> Result<Vec<T>>;

    /// Backing-source label used in error messages.
    fn describe(&self) -> String {
        "<page loader>".to_string()
    }
}

/// A paginated sequence of items, obtaining each page only when needed.
pub struct Paginator<T> {
    items_per_page: usize,
    total_items: usize,
    pages: Mutex<Vec<Option<Vec<T>>>>,
    loader: Box<dyn PageLoader<T>>,
}

impl<T> Paginator<T> {
    /// Create a paginator over `total_items` items in pages of
    /// `items_per_page`.
    ///
    /// # Panics
    ///
    /// Panics if `items_per_page` is zero.
    pub fn new(
        items_per_page: usize,
        total_items: usize,
        loader: impl PageLoader<T> + 'static,
    ) -> Self {
        assert!(items_per_page > 0, "items_per_page must be positive");
        let num_pages = total_items.div_ceil(items_per_page);
        Self {
            items_per_page,
            total_items,
            pages: Mutex::new((0..num_pages).map(|_| None).collect()),
            loader: Box::new(loader),
        }
    }

    /// Create a paginator with page 0 already populated, so the first page
    /// never triggers a fetch. The primed page must match the page size
    /// implied by the pagination metadata.
    pub(crate) fn with_first_page(
        items_per_page: usize,
        total_items: usize,
        first_page: Vec<T>,
        loader: impl PageLoader<T> + 'static,
    ) -> Result<Self> {
        let label = loader.describe();
        let paginator = Self::new(items_per_page, total_items, loader);

        if paginator.page_count() == 0 {
            if !first_page.is_empty() {
                return Err(Error::malformed(
                    label,
                    format!("expected no items, got {}", first_page.len()),
                ));
            }
            return Ok(paginator);
        }

        let expected = paginator.expected_page_len(0);
        if first_page.len() != expected {
            return Err(Error::malformed(
                label,
                format!(
                    "first page has {} items, pagination headers imply {}",
                    first_page.len(),
                    expected
                ),
            ));
        }
        paginator.pages.lock()[0] = Some(first_page);
        Ok(paginator)
    }

    /// Total number of items; known without fetching anything.
    pub fn len(&self) -> usize {
        self.total_items
    }

    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    /// Page size fixed at construction.
    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Number of pages backing the sequence.
    pub fn page_count(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page)
    }

    /// Whether the given page has been fetched and cached.
    pub fn is_page_loaded(&self, page_index: usize) -> bool {
        self.pages
            .lock()
            .get(page_index)
            .is_some_and(|page| page.is_some())
    }

    fn expected_page_len(&self, page_index: usize) -> usize {
        let start = page_index * self.items_per_page;
        self.items_per_page.min(self.total_items - start)
    }

    fn load_checked(&self, page_index: usize) -> Result<Vec<T>> {
        log::debug!(
            "loading page {} of {}",
            page_index + 1,
            self.loader.describe()
        );
        let items = self.loader.load_page(page_index)?;
        let expected = self.expected_page_len(page_index);
        if items.len() != expected {
            return Err(Error::malformed(
                self.loader.describe(),
                format!(
                    "page {} has {} items, pagination headers imply {}",
                    page_index + 1,
                    items.len(),
                    expected
                ),
            ));
        }
        Ok(items)
    }
}

impl<T: Clone> Paginator<T> {
    /// Item at `index`, fetching its page on first access.
    ///
    /// A page-load failure propagates to the caller and leaves the page
    /// unfetched, so the next access retries it.
    pub fn get(&self, index: usize) -> Result<T> {
        if index >= self.total_items {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.total_items,
            });
        }
        let page_index = index / self.items_per_page;
        let offset = index % self.items_per_page;

        let mut pages = self.pages.lock();
        if let Some(page) = &pages[page_index] {
            return Ok(page[offset].clone());
        }
        let items = self.load_checked(page_index)?;
        let item = items[offset].clone();
        pages[page_index] = Some(items);
        Ok(item)
    }

    /// Items in `range`, in order. Any out-of-range index fails.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<T>> {
        range.map(|index| self.get(index)).collect()
    }

    /// Iterate every item in index order, fetching pages as needed.
    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        (0..self.total_items).map(move |index| self.get(index))
    }
}

impl<T> fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded = self
            .pages
            .lock()
            .iter()
            .filter(|page| page.is_some())
            .count();
        f.debug_struct("Paginator")
            .field("items_per_page", &self.items_per_page)
            .field("total_items", &self.total_items)
            .field("loaded_pages", &loaded)
            .field("page_count", &self.page_count())
            .finish()
    }
}

/// Loader fetching pages of a remote collection with a 1-based `page` query
/// parameter, decoding the array under the collection key.
pub(crate) struct RemotePageLoader<T> {
    transport: Arc<dyn Transport>,
    endpoint: String,
    key: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> RemotePageLoader<T> {
    pub(crate) fn new(transport: Arc<dyn Transport>, endpoint: String, key: String) -> Self {
        Self {
            transport,
            endpoint,
            key,
            _entity: PhantomData,
        }
    }
}

impl<T: Resource> PageLoader<T> for RemotePageLoader<T> {
    fn load_page(&self, page_index: usize) -> Result<Vec<T>> {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        let endpoint = format!("{}{}page={}", self.endpoint, separator, page_index + 1);
        let response = self.transport.get(&endpoint)?;
        decode_items(&response.body, &self.key, &endpoint)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Result of a collection query: either the complete result set from a
/// single response, or a lazy paginator over the remote collection.
pub enum Collection<T> {
    /// Every item arrived in the first response.
    Complete(Vec<T>),
    /// Items are fetched page-by-page on demand.
    Paginated(Paginator<T>),
}

impl<T> Collection<T> {
    /// Total number of items; never requires a fetch.
    pub fn len(&self) -> usize {
        match self {
            Self::Complete(items) => items.len(),
            Self::Paginated(paginator) => paginator.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether items are fetched lazily.
    pub fn is_paginated(&self) -> bool {
        matches!(self, Self::Paginated(_))
    }
}

impl<T: Clone> Collection<T> {
    /// Item at `index`; may fetch a page when paginated.
    pub fn get(&self, index: usize) -> Result<T> {
        match self {
            Self::Complete(items) => items.get(index).cloned().ok_or(Error::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            Self::Paginated(paginator) => paginator.get(index),
        }
    }

    /// Items in `range`, in order.
    pub fn slice(&self, range: Range<usize>) -> Result<Vec<T>> {
        range.map(|index| self.get(index)).collect()
    }

    /// Iterate every item in index order.
    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }

    /// Collect every item, fetching all remaining pages.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().collect()
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete(items) => f
                .debug_tuple("Complete")
                .field(&format_args!("{} items", items.len()))
                .finish(),
            Self::Paginated(paginator) => f.debug_tuple("Paginated").field(paginator).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader over fixed pages, recording which pages were requested.
    struct FixtureLoader {
        pages: Vec<Vec<i64>>,
        loads: Arc<Mutex<Vec<usize>>>,
    }

    impl FixtureLoader {
        fn paged(data: &[i64], items_per_page: usize) -> (Self, Arc<Mutex<Vec<usize>>>) {
            let loads = Arc::new(Mutex::new(Vec::new()));
            let pages = data
                .chunks(items_per_page)
                .map(|chunk| chunk.to_vec())
                .collect();
            (
                Self {
                    pages,
                    loads: Arc::clone(&loads),
                },
                loads,
            )
        }
    }

    impl PageLoader<i64> for FixtureLoader {
        fn load_page(&self, page_index: usize) -> Result<Vec<i64>> {
            self.loads.lock().push(page_index);
            Ok(self.pages[page_index].clone())
        }
    }

    /// Loader that fails a configurable number of times before succeeding.
    struct FlakyLoader {
        page: Vec<i64>,
        failures_left: Mutex<usize>,
    }

    impl PageLoader<i64> for FlakyLoader {
        fn load_page(&self, _page_index: usize) -> Result<Vec<i64>> {
            let mut failures = self.failures_left.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(Error::transport("fixture", "simulated failure"));
            }
            Ok(self.page.clone())
        }
    }

    fn data(total: usize) -> Vec<i64> {
        (0..total as i64).map(|i| i * 7 + 3).collect()
    }

    #[test]
    fn test_len_requires_no_fetch() {
        let (loader, loads) = FixtureLoader::paged(&data(60), 25);
        let paginator = Paginator::new(25, 60, loader);
        assert_eq!(paginator.len(), 60);
        assert_eq!(paginator.page_count(), 3);
        assert!(loads.lock().is_empty());
    }

    #[test]
    fn test_get_loads_only_the_covering_page() {
        let (loader, loads) = FixtureLoader::paged(&data(60), 25);
        let paginator = Paginator::new(25, 60, loader);

        assert_eq!(paginator.get(40).unwrap(), 40 * 7 + 3);
        assert_eq!(*loads.lock(), vec![1]);
        assert!(!paginator.is_page_loaded(0));
        assert!(paginator.is_page_loaded(1));
        assert!(!paginator.is_page_loaded(2));
    }

    #[test]
    fn test_pages_load_at_most_once() {
        let (loader, loads) = FixtureLoader::paged(&data(60), 25);
        let paginator = Paginator::new(25, 60, loader);

        for index in [0, 24, 1, 12, 0] {
            paginator.get(index).unwrap();
        }
        assert_eq!(*loads.lock(), vec![0]);
    }

    #[test]
    fn test_arbitrary_access_order_matches_backing_data() {
        let reference = data(60);
        let (loader, loads) = FixtureLoader::paged(&reference, 25);
        let paginator = Paginator::new(25, 60, loader);

        for index in (0..60).rev() {
            assert_eq!(paginator.get(index).unwrap(), reference[index]);
        }
        assert_eq!(*loads.lock(), vec![2, 1, 0]);
    }

    #[test]
    fn test_slice_preserves_order_across_pages() {
        let reference = data(60);
        let (loader, _) = FixtureLoader::paged(&reference, 25);
        let paginator = Paginator::new(25, 60, loader);

        assert_eq!(paginator.slice(20..30).unwrap(), reference[20..30].to_vec());
    }

    #[test]
    fn test_out_of_range_access_fails() {
        let (loader, _) = FixtureLoader::paged(&data(60), 25);
        let paginator = Paginator::new(25, 60, loader);

        match paginator.get(60) {
            Err(Error::IndexOutOfRange { index: 60, len: 60 }) => {}
            other => panic!("expected IndexOutOfRange, got {other:?}"),
        }
        assert!(paginator.slice(55..61).is_err());
    }

    #[test]
    fn test_failed_load_retains_no_page_state() {
        let loader = FlakyLoader {
            page: data(5),
            failures_left: Mutex::new(1),
        };
        let paginator = Paginator::new(5, 5, loader);

        assert!(paginator.get(2).unwrap_err().is_transport());
        assert!(!paginator.is_page_loaded(0));

        // Next access retries the page and succeeds.
        assert_eq!(paginator.get(2).unwrap(), 2 * 7 + 3);
        assert!(paginator.is_page_loaded(0));
    }

    #[test]
    fn test_short_page_is_malformed() {
        struct ShortLoader;
        impl PageLoader<i64> for ShortLoader {
            fn load_page(&self, _page_index: usize) -> Result<Vec<i64>> {
                Ok(vec![1, 2])
            }
        }

        let paginator = Paginator::new(5, 8, ShortLoader);
        assert!(paginator.get(0).unwrap_err().is_malformed());
        assert!(!paginator.is_page_loaded(0));
    }

    #[test]
    fn test_primed_first_page_is_never_fetched() {
        let reference = data(60);
        let (loader, loads) = FixtureLoader::paged(&reference, 25);
        let paginator =
            Paginator::with_first_page(25, 60, reference[..25].to_vec(), loader).unwrap();

        assert_eq!(paginator.get(0).unwrap(), reference[0]);
        assert_eq!(paginator.get(24).unwrap(), reference[24]);
        assert!(loads.lock().is_empty());

        assert_eq!(paginator.get(25).unwrap(), reference[25]);
        assert_eq!(*loads.lock(), vec![1]);
    }

    #[test]
    fn test_primed_page_size_mismatch_is_malformed() {
        let (loader, _) = FixtureLoader::paged(&data(60), 25);
        let result = Paginator::with_first_page(25, 60, data(10), loader);
        assert!(result.unwrap_err().is_malformed());
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let (loader, loads) = FixtureLoader::paged(&[], 25);
        let paginator = Paginator::with_first_page(25, 0, Vec::new(), loader).unwrap();
        assert!(paginator.is_empty());
        assert_eq!(paginator.page_count(), 0);
        assert!(paginator.get(0).is_err());
        assert!(loads.lock().is_empty());
    }

    #[test]
    fn test_collection_unifies_both_shapes() {
        let complete = Collection::Complete(vec![1i64, 2, 3]);
        assert_eq!(complete.len(), 3);
        assert!(!complete.is_paginated());
        assert_eq!(complete.get(2).unwrap(), 3);
        assert!(complete.get(3).is_err());
        assert_eq!(complete.to_vec().unwrap(), vec![1, 2, 3]);

        let (loader, _) = FixtureLoader::paged(&data(60), 25);
        let paginated = Collection::Paginated(Paginator::new(25, 60, loader));
        assert_eq!(paginated.len(), 60);
        assert!(paginated.is_paginated());
        assert_eq!(paginated.to_vec().unwrap(), data(60));
    }
}
