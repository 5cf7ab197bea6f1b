//! Paging value types.
//!
//! # Invariants
//! - `PageRequest::page_size` is within `1..=MAX_PAGE_SIZE`.
//! - `PageMetadata::total_pages == ceil(total_elements / size)`.
//! - `PageResult` content and metadata are read-only after construction.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_PAGE_NUMBER: u64 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Rejected paging input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    NegativePageNumber(i64),
    NonPositivePageSize(i64),
    PageSizeTooLarge(u32),
}

impl Display for PageRequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativePageNumber(value) => {
                write!(f, "page number must be >= 0, got {value}")
            }
            Self::NonPositivePageSize(value) => write!(f, "page size must be >= 1, got {value}"),
            Self::PageSizeTooLarge(value) => {
                write!(f, "page size must be <= {MAX_PAGE_SIZE}, got {value}")
            }
        }
    }
}

impl Error for PageRequestError {}

/// Zero-based page window request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u64,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request from unchecked caller input.
    ///
    /// Negative page numbers and sizes below one are rejected; sizes above
    /// `MAX_PAGE_SIZE` are clamped to it. Any non-negative page number is
    /// accepted, however far past the data it points.
    pub fn from_raw(page_number: i64, page_size: i64) -> Result<Self, PageRequestError> {
        if page_number < 0 {
            return Err(PageRequestError::NegativePageNumber(page_number));
        }
        if page_size < 1 {
            return Err(PageRequestError::NonPositivePageSize(page_size));
        }
        let page_number = page_number.unsigned_abs();
        let page_size =
            u32::try_from(page_size.min(i64::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE);
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// Re-checks invariants on a request assembled field by field.
    pub fn validate(&self) -> Result<(), PageRequestError> {
        if self.page_size == 0 {
            return Err(PageRequestError::NonPositivePageSize(0));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeTooLarge(self.page_size));
        }
        Ok(())
    }

    /// Number of rows preceding this page in the full result set.
    ///
    /// Saturates at `u64::MAX`; such a window is always past the end.
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_mul(u64::from(self.page_size))
    }
}

/// Immutable pagination metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMetadata {
    number: u64,
    size: u32,
    total_elements: u64,
    total_pages: u64,
}

impl PageMetadata {
    pub fn new(request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.page_size.max(1));
        Self {
            number: request.page_number,
            size: request.page_size,
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    /// True for the final page and for any page past the end.
    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }

    pub fn has_next(&self) -> bool {
        !self.is_last()
    }
}

/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    content: Vec<T>,
    metadata: PageMetadata,
}

impl<T> PageResult<T> {
    pub fn new(content: Vec<T>, metadata: PageMetadata) -> Self {
        Self { content, metadata }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Converts the element type, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            content: self.content.into_iter().map(f).collect(),
            metadata: self.metadata,
        }
    }

    pub fn into_parts(self) -> (Vec<T>, PageMetadata) {
        (self.content, self.metadata)
    }
}
