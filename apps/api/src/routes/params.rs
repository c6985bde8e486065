//! Query parameters and response envelopes shared by handlers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct TenantQuery {
    pub tenant_id: Uuid,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl PageQuery {
    pub fn resolve(self) -> Result<Page, AppError> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if page == 0 {
            return Err(AppError::Validation("page starts at 1".to_string()));
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(AppError::Validation(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        Ok(Page { page, per_page })
    }
}

impl Page {
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, page: Page, total: i64) -> Self {
        Self {
            items,
            page: page.page,
            per_page: page.per_page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageQuery::default().resolve().unwrap();
        assert_eq!(page, Page { page: 1, per_page: 20 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let page = PageQuery {
            page: Some(3),
            per_page: Some(25),
        }
        .resolve()
        .unwrap();
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn test_bounds_are_rejected() {
        assert!(PageQuery { page: Some(0), per_page: None }.resolve().is_err());
        assert!(PageQuery { page: None, per_page: Some(0) }.resolve().is_err());
        assert!(PageQuery { page: None, per_page: Some(101) }.resolve().is_err());
    }
}
