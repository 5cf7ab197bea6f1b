//! Route handling for the beer endpoints.
//!
//! # Routes
//! - `GET /api/v1/beer/{id}` -> 200 `BeerDto` | 400 | 404 | 503
//! - `GET /api/v1/beer?beerName=&beerStyle=&pageNumber=&pageSize=`
//!   -> 200 `BeerPageDto` | 400 | 503
//!
//! Short parameter aliases `name`, `category`, `page` and `size` are accepted.

use crate::db::open_db_existing;
use crate::model::beer::{BeerId, BeerStyle};
use crate::model::page::{PageRequest, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::repo::beer_repo::{BeerFilter, BeerRepository, RepoError, SqliteBeerRepository};
use crate::service::beer_service::{BeerService, ServiceError, ServiceResult};
use crate::web::dto::{BeerDto, BeerPageDto, ErrorBody};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Mount point of the beer resource; both routes hang off it.
pub const BEER_API_BASE_PATH: &str = "/api/v1/beer";

static BEER_COLLECTION_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}/?$", regex::escape(BEER_API_BASE_PATH)))
        .expect("valid collection path regex")
});
static BEER_ITEM_PATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^{}/([^/]+)/?$", regex::escape(BEER_API_BASE_PATH)))
        .expect("valid item path regex")
});

const STORE_UNAVAILABLE_MESSAGE: &str = "beer store unavailable";

/// Path of a single beer resource.
pub fn beer_item_path(id: &str) -> String {
    format!("{BEER_API_BASE_PATH}/{id}")
}

/// Status code plus JSON body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: &impl Serialize) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(err) => Self::error(
                500,
                format!("response encoding failed: {err}"),
                "ENCODING_FAILED",
            ),
        }
    }

    fn error(status: u16, error: String, code: &'static str) -> Self {
        let body = serde_json::to_value(ErrorBody { error, code }).unwrap_or(Value::Null);
        Self { status, body }
    }

    /// Client errors carry their detail; store failures are logged and
    /// answered with a fixed message.
    fn from_service_error(err: &ServiceError) -> Self {
        let message = match err {
            ServiceError::StoreUnavailable(source) => {
                warn!(
                    "event=http_response module=web status=503 error_code={} error={source}",
                    err.code()
                );
                STORE_UNAVAILABLE_MESSAGE.to_string()
            }
            ServiceError::NotFound(_) | ServiceError::InvalidArgument(_) => err.to_string(),
        };
        Self::error(status_for(err), message, err.code())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Maps a classified service failure onto its HTTP status.
pub fn status_for(err: &ServiceError) -> u16 {
    match err {
        ServiceError::InvalidArgument(_) => 400,
        ServiceError::NotFound(_) => 404,
        ServiceError::StoreUnavailable(_) => 503,
    }
}

/// Raw, unvalidated query parameters of the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBeersParams {
    pub beer_name: Option<String>,
    pub beer_style: Option<String>,
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl ListBeersParams {
    /// Collects known keys from decoded query pairs; unknown keys are ignored
    /// and the last occurrence of a key wins.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key {
                "beerName" | "name" => &mut params.beer_name,
                "beerStyle" | "category" => &mut params.beer_style,
                "pageNumber" | "page" => &mut params.page_number,
                "pageSize" | "size" => &mut params.page_size,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        params
    }

    /// Validates parameters into a filter and page request.
    ///
    /// # Errors
    /// - `InvalidArgument` for unknown styles and non-integer or out-of-range
    ///   paging values.
    pub fn parse(&self) -> ServiceResult<(BeerFilter, PageRequest)> {
        let beer_style = match non_blank(self.beer_style.as_deref()) {
            Some(raw) => Some(
                BeerStyle::from_str(raw)
                    .map_err(|err| ServiceError::InvalidArgument(err.to_string()))?,
            ),
            None => None,
        };
        let filter = BeerFilter {
            beer_name: non_blank(self.beer_name.as_deref()).map(str::to_string),
            beer_style,
        };

        let page_number = parse_integer(
            "pageNumber",
            self.page_number.as_deref(),
            i64::try_from(DEFAULT_PAGE_NUMBER).unwrap_or_default(),
        )?;
        let page_size = parse_integer(
            "pageSize",
            self.page_size.as_deref(),
            i64::from(DEFAULT_PAGE_SIZE),
        )?;
        let page = PageRequest::from_raw(page_number, page_size)?;

        Ok((filter, page))
    }
}

/// Request handlers bound to one service instance.
pub struct BeerApi<R: BeerRepository> {
    service: BeerService<R>,
}

impl<R: BeerRepository> BeerApi<R> {
    pub fn new(service: BeerService<R>) -> Self {
        Self { service }
    }

    /// Dispatches a `GET` request by path.
    pub fn handle_get<'a>(
        &self,
        path: &str,
        query: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> ApiResponse {
        let path = path.split('?').next().unwrap_or_default();
        let response = if BEER_COLLECTION_PATH_RE.is_match(path) {
            self.list_beers(&ListBeersParams::from_pairs(query))
        } else if let Some(caps) = BEER_ITEM_PATH_RE.captures(path) {
            self.get_beer(caps.get(1).map_or("", |m| m.as_str()))
        } else {
            ApiResponse::error(404, format!("no route for `{path}`"), "ROUTE_NOT_FOUND")
        };

        info!(
            "event=http_request module=web method=GET path={} status={}",
            path, response.status
        );
        response
    }

    /// `GET /api/v1/beer/{id}`.
    pub fn get_beer(&self, raw_id: &str) -> ApiResponse {
        let result = parse_beer_id(raw_id).and_then(|id| self.service.find_by_id(id));
        match result {
            Ok(beer) => ApiResponse::ok(&BeerDto::from(beer)),
            Err(err) => ApiResponse::from_service_error(&err),
        }
    }

    /// `GET /api/v1/beer`.
    pub fn list_beers(&self, params: &ListBeersParams) -> ApiResponse {
        let result = params
            .parse()
            .and_then(|(filter, page)| self.service.list(&filter, &page));
        match result {
            Ok(page) => ApiResponse::ok(&BeerPageDto::from(page)),
            Err(err) => ApiResponse::from_service_error(&err),
        }
    }
}

/// Serves one `GET` request against the catalog database at `db_path`.
///
/// Opens a dedicated read-only connection for the request, so concurrent
/// callers share no connection state. A missing database file is reported as
/// an unavailable store and is never created.
pub fn serve_request<'a>(
    db_path: &Path,
    path: &str,
    query: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> ApiResponse {
    let conn = match open_db_existing(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!(
                "event=http_request module=web status=error error_code=db_open_failed error={err}"
            );
            return ApiResponse::from_service_error(&ServiceError::StoreUnavailable(
                RepoError::Db(err),
            ));
        }
    };
    let repo = match SqliteBeerRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            warn!(
                "event=http_request module=web status=error error_code=repo_init_failed error={err}"
            );
            return ApiResponse::from_service_error(&ServiceError::StoreUnavailable(err));
        }
    };

    BeerApi::new(BeerService::new(repo)).handle_get(path, query)
}

/// Parses a path segment into a `BeerId`.
///
/// # Errors
/// - `InvalidArgument` when the segment is not a UUID.
pub fn parse_beer_id(raw: &str) -> ServiceResult<BeerId> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::InvalidArgument(format!("malformed beer id `{raw}`")))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Digit strings too long for `i64` saturate; paging treats them as
/// "far past the end" rather than malformed.
fn parse_integer(name: &str, raw: Option<&str>, default: i64) -> ServiceResult<i64> {
    let Some(value) = non_blank(raw) else {
        return Ok(default);
    };
    match value.parse::<i64>() {
        Ok(parsed) => Ok(parsed),
        Err(_) if is_unsigned_digits(value) => Ok(i64::MAX),
        Err(_) => Err(ServiceError::InvalidArgument(format!(
            "{name} must be an integer, got `{value}`"
        ))),
    }
}

fn is_unsigned_digits(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
