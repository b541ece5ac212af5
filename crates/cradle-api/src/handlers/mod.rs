pub mod auth;
pub mod categories;
pub mod request_analytics;
pub mod request_types;
pub mod uploads;
pub mod users;

use cradle_core::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use cradle_core::{AppError, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

/// `?page=&page_size=` (or `limit=` as an alias of `page_size`)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// 1-indexed page, default 1
    pub page: Option<u32>,
    /// Items per page, default 10, at most 100
    pub page_size: Option<u32>,
    /// Alias of `page_size`
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.or(self.limit).unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_limit_alias() {
        let defaults = PaginationQuery::default().page_request().unwrap();
        assert_eq!((defaults.page(), defaults.page_size()), (1, 10));

        let aliased = PaginationQuery {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        }
        .page_request()
        .unwrap();
        assert_eq!((aliased.page(), aliased.page_size()), (3, 25));
    }

    #[test]
    fn test_zero_page_size_is_invalid_input() {
        let query = PaginationQuery {
            page_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(query.page_request(), Err(AppError::InvalidInput(_))));
    }
}
