pub mod api;
pub mod client;

pub use api::DiscoverQuery;
pub use client::TmdbClient;
