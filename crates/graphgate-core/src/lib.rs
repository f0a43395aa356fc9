//! Graphgate Core - Domain types and traits for the directory query proxy
//!
//! The core is the request-to-filter compiler and the paged-result pipeline
//! shared by every endpoint:
//! - `filter`: compiles a validated request into an OData filter expression
//! - `paging`: walks `@odata.nextLink` cursors and accumulates records
//! - `models`: raw directory records and their reduced projections
//! - `traits`: the secret and directory-client seams the handlers depend on

pub mod config;
pub mod error;
pub mod filter;
pub mod ids;
pub mod models;
pub mod paging;
pub mod query;
pub mod traits;


pub use config::*;
pub use error::*;
pub use filter::*;
pub use ids::*;
pub use models::*;
pub use paging::*;
pub use query::*;
pub use traits::*;
