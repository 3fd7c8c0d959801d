pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod leave;
pub mod model;
pub mod routes;
pub mod store;
