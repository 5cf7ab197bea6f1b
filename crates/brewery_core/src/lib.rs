//! Read path over the beer catalog.
//!
//! Single-record lookup and filtered, paginated listing over a SQLite-backed
//! store, plus a framework-agnostic request boundary for both.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod web;

pub use config::{BreweryConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::beer::{Beer, BeerId, BeerStyle, BeerValidationError, UnknownBeerStyle};
pub use model::page::{
    PageMetadata, PageRequest, PageRequestError, PageResult, DEFAULT_PAGE_NUMBER,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use repo::beer_repo::{
    BeerFilter, BeerListQuery, BeerRepository, BeerWindow, RepoError, RepoResult,
    SqliteBeerRepository,
};
pub use service::beer_service::{BeerService, ServiceError, ServiceResult};
pub use web::api::{
    beer_item_path, serve_request, ApiResponse, BeerApi, ListBeersParams, BEER_API_BASE_PATH,
};
pub use web::dto::{BeerDto, BeerPageDto};
