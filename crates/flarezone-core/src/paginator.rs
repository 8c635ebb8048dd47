//! Lazy iteration over paginated listings
//!
//! Services return one [`Page`] per call; [`Paginator`] walks the pages on
//! demand, requesting the next one only once the current page is exhausted.

use crate::error::Result;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number
    pub page: u32,
    /// Total number of pages reported by the provider
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, page: u32, total_pages: u32) -> Self {
        Self {
            items,
            page,
            total_pages,
        }
    }

    /// A listing that fits in a single page
    pub fn single(items: Vec<T>) -> Self {
        Self::new(items, 1, 1)
    }

    /// Whether no further page should be requested
    pub fn is_last(&self) -> bool {
        self.items.is_empty() || self.page >= self.total_pages
    }
}

/// Iterator over every item of a paginated listing
///
/// `fetch` is called with 1-based page numbers. Iteration stops after the
/// last page, or after yielding the first error.
pub struct Paginator<T, F>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    fetch: F,
    next_page: Option<u32>,
    buffer: std::vec::IntoIter<T>,
}

impl<T, F> Paginator<T, F>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    /// Start a walk from the first page
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            next_page: Some(1),
            buffer: Vec::new().into_iter(),
        }
    }
}

impl<T, F> Iterator for Paginator<T, F>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }

            let page = self.next_page?;
            tracing::debug!("Fetching page {}", page);

            match (self.fetch)(page) {
                Ok(result) => {
                    self.next_page = if result.is_last() {
                        None
                    } else {
                        Some(page + 1)
                    };
                    self.buffer = result.items.into_iter();
                }
                Err(e) => {
                    self.next_page = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T, F> std::iter::FusedIterator for Paginator<T, F> where F: FnMut(u32) -> Result<Page<T>> {}
