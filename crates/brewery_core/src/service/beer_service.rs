//! Beer lookup and query service.
//!
//! # Responsibility
//! - `find_by_id`: resolve exactly one record or report `NotFound`.
//! - `list`: resolve one filtered page with pre-pagination totals.
//!
//! # Invariants
//! - Invalid page requests are rejected before the store is touched.
//! - Each call issues exactly one repository call.
//! - Store faults surface as `StoreUnavailable` without retry.

use crate::model::beer::{Beer, BeerId};
use crate::model::page::{PageMetadata, PageRequest, PageRequestError, PageResult};
use crate::repo::beer_repo::{BeerFilter, BeerListQuery, BeerRepository, RepoError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classified failure of a lookup or list call.
#[derive(Debug)]
pub enum ServiceError {
    /// No record carries the requested id.
    NotFound(BeerId),
    /// Caller input was rejected before reaching the store.
    InvalidArgument(String),
    /// The store could not serve the request.
    StoreUnavailable(RepoError),
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "beer not found: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::StoreUnavailable(err) => write!(f, "beer store unavailable: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::StoreUnavailable(value)
    }
}

impl From<PageRequestError> for ServiceError {
    fn from(value: PageRequestError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

/// Read-only service over a beer repository.
pub struct BeerService<R: BeerRepository> {
    repo: R,
}

impl<R: BeerRepository> BeerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Gets one record by id.
    ///
    /// # Errors
    /// - `NotFound` when no record has this id.
    /// - `StoreUnavailable` when the repository fails.
    pub fn find_by_id(&self, id: BeerId) -> ServiceResult<Beer> {
        match self.repo.find_beer(id) {
            Ok(Some(beer)) => Ok(beer),
            Ok(None) => {
                debug!("event=beer_get module=service status=not_found id={id}");
                Err(ServiceError::NotFound(id))
            }
            Err(err) => {
                warn!("event=beer_get module=service status=error id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Lists one page of records matching `filter`.
    ///
    /// Pages past the end come back empty with correct totals.
    ///
    /// # Errors
    /// - `InvalidArgument` when `page` violates paging invariants.
    /// - `StoreUnavailable` when the repository fails.
    pub fn list(
        &self,
        filter: &BeerFilter,
        page: &PageRequest,
    ) -> ServiceResult<PageResult<Beer>> {
        page.validate()?;

        let query = BeerListQuery {
            filter: filter.normalized(),
            limit: page.page_size,
            offset: page.offset(),
        };
        let window = self.repo.list_beers(&query).map_err(|err| {
            warn!(
                "event=beer_list module=service status=error page={} size={} error={err}",
                page.page_number, page.page_size
            );
            ServiceError::from(err)
        })?;

        let metadata = PageMetadata::new(page, window.total_elements);
        debug!(
            "event=beer_list module=service status=ok page={} size={} returned={} total_elements={} total_pages={}",
            page.page_number,
            page.page_size,
            window.items.len(),
            metadata.total_elements(),
            metadata.total_pages()
        );
        Ok(PageResult::new(window.items, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::{BeerService, ServiceError};
    use crate::model::beer::{Beer, BeerId};
    use crate::model::page::PageRequest;
    use crate::repo::beer_repo::{
        BeerFilter, BeerListQuery, BeerRepository, BeerWindow, RepoError, RepoResult,
    };
    use std::cell::{Cell, RefCell};
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingRepo {
        calls: Cell<usize>,
        fail: bool,
        last_query: RefCell<Option<BeerListQuery>>,
    }

    impl BeerRepository for RecordingRepo {
        fn find_beer(&self, _id: BeerId) -> RepoResult<Option<Beer>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(RepoError::InvalidData("store offline".to_string()));
            }
            Ok(None)
        }

        fn list_beers(&self, query: &BeerListQuery) -> RepoResult<BeerWindow> {
            self.calls.set(self.calls.get() + 1);
            *self.last_query.borrow_mut() = Some(query.clone());
            if self.fail {
                return Err(RepoError::InvalidData("store offline".to_string()));
            }
            Ok(BeerWindow {
                items: Vec::new(),
                total_elements: 7,
            })
        }
    }

    #[test]
    fn invalid_page_is_rejected_before_store_access() {
        let repo = RecordingRepo::default();
        let service = BeerService::new(&repo);
        let page = PageRequest {
            page_number: 0,
            page_size: 0,
        };

        let err = service.list(&BeerFilter::default(), &page).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert_eq!(repo.calls.get(), 0);
    }

    #[test]
    fn list_translates_page_into_one_window_query() {
        let repo = RecordingRepo::default();
        let service = BeerService::new(&repo);
        let page = PageRequest::from_raw(2, 3).unwrap();

        let result = service
            .list(&BeerFilter::by_name("  Galaxy*  "), &page)
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.metadata().total_elements(), 7);
        assert_eq!(result.metadata().total_pages(), 3);
        assert_eq!(repo.calls.get(), 1);

        let query = repo.last_query.borrow().clone().unwrap();
        assert_eq!(query.limit, 3);
        assert_eq!(query.offset, 6);
        assert_eq!(query.filter.beer_name.as_deref(), Some("Galaxy*"));
    }

    #[test]
    fn missing_record_is_not_found() {
        let repo = RecordingRepo::default();
        let service = BeerService::new(&repo);
        let id = Uuid::new_v4();

        let err = service.find_by_id(id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(found) if found == id));
    }

    #[test]
    fn store_failures_surface_once_without_retry() {
        let repo = RecordingRepo {
            fail: true,
            ..RecordingRepo::default()
        };
        let service = BeerService::new(&repo);

        let err = service.find_by_id(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(_)));
        assert_eq!(err.code(), "STORE_UNAVAILABLE");

        let err = service
            .list(&BeerFilter::default(), &PageRequest::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(_)));
        assert_eq!(repo.calls.get(), 2);
    }
}
