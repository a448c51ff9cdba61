//! # Pagination Module
//!
//! Page metadata for [`ReadService::paginate`](crate::read::ReadService::paginate).
//! A [`Pagination`] is computed fresh on every call from a live `COUNT(*)`
//! and is never cached. Pages are 1-based.
//!
//! Both [`Pagination`] and [`Page`] serialize with `serde`, so they can be
//! returned from a web handler as-is.
//!
//! ## Example
//!
//! ```rust,ignore
//! let page = users.paginate(&Conditions::new(), &Sort::desc("id"), 10, 2).await?;
//!
//! println!("page {} of {}", page.pagination.current_page, page.pagination.total_pages);
//! for row in page.data {
//!     println!("{:?}", row.get("name"));
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, value::Record};

/// Computed page metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Rows per page, at least 1.
    pub per_page: u64,
    /// The current page, starting at 1.
    pub current_page: u64,
    /// Rows matching the query across all pages.
    pub total_records: u64,
    /// `ceil(total_records / per_page)`.
    pub total_pages: u64,
}

impl Pagination {
    /// Builds the descriptor, rejecting a zero page size or page number.
    pub fn new(per_page: u64, current_page: u64, total_records: u64) -> Result<Self, Error> {
        validate(per_page, current_page)?;
        Ok(Self { per_page, current_page, total_records, total_pages: total_pages(total_records, per_page) })
    }

    /// Row offset of the first row on the current page.
    ///
    /// Fails with [`Error::InvalidArgument`] when the page lies beyond the
    /// `u64` row range.
    pub fn offset(&self) -> Result<u64, Error> {
        (self.current_page - 1)
            .checked_mul(self.per_page)
            .ok_or_else(|| Error::invalid_argument("current_page * per_page is out of range"))
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of rows plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}

/// `ceil(total_records / per_page)`; zero when `per_page` is zero.
pub fn total_pages(total_records: u64, per_page: u64) -> u64 {
    if per_page == 0 { 0 } else { total_records.div_ceil(per_page) }
}

pub(crate) fn validate(per_page: u64, current_page: u64) -> Result<(), Error> {
    if per_page == 0 {
        return Err(Error::invalid_argument("per_page must be at least 1"));
    }
    if current_page == 0 {
        return Err(Error::invalid_argument("current_page starts at 1"));
    }
    Ok(())
}
