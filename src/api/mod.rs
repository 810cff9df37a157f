//! HTTP API handlers for music-db

pub mod autocomplete;
pub mod details;
pub mod health;
pub mod search;

pub use autocomplete::autocomplete_routes;
pub use details::details_routes;
pub use health::health_routes;
pub use search::search_routes;
