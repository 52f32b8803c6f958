//! Page requests and result pages
//!
//! Pages are numbered from 1. A request without a size is unpaged and
//! returns every matching row, which is what count/list agreement checks use.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::error::CoreError;

/// Largest page size a caller may request
pub const MAX_PAGE_SIZE: u32 = 500;

/// Default page size when none is given
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoreError::invalid_value("sort direction", other)),
        }
    }
}

/// A caller-supplied sort, resolved against the entity's sortable columns
/// when the query is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for Sort {
    type Err = CoreError;

    /// Parses `field` or `field,direction`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().trim();
        if field.is_empty() {
            return Err(CoreError::validation("sort field must not be empty"));
        }
        let direction = match parts.next() {
            Some(dir) => dir.parse()?,
            None => SortDirection::Asc,
        };
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Page number, page size and optional sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PageRequest {
    /// 1-based page number
    #[validate(range(min = 1, message = "page numbers start at 1"))]
    pub page: u32,
    /// Rows per page, None for unpaged
    #[validate(range(min = 1, max = 500, message = "page size must be between 1 and 500"))]
    pub size: Option<u32>,
    pub sort: Option<Sort>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: Some(size),
            sort: None,
        }
    }

    /// Every matching row in one page
    pub fn unpaged() -> Self {
        Self {
            page: 1,
            size: None,
            sort: None,
        }
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Validates page number and size
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the page is 0 or the size is
    /// outside `1..=MAX_PAGE_SIZE`.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }

    /// Rows to skip before this page
    pub fn offset(&self) -> u64 {
        match self.size {
            Some(size) => u64::from(self.page.saturating_sub(1)) * u64::from(size),
            None => 0,
        }
    }
}

/// One page of results plus the total from the matching count query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: Option<u32>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: &PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page,
            size: request.size,
            total,
        }
    }

    pub fn total_pages(&self) -> u64 {
        match self.size {
            Some(size) => self.total.div_ceil(u64::from(size)),
            None if self.total == 0 => 0,
            None => 1,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total: self.total,
        }
    }
}
