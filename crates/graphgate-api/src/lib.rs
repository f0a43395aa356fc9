//! Graphgate API - HTTP layer of the directory proxy
//!
//! Every directory endpoint is a `POST` with a JSON body. List endpoints
//! always answer `200` with an `items` collection (empty on failure); lookup
//! endpoints answer `400`/`404` with a text message and `500` with an error
//! body.

pub mod dto;
pub mod handlers;
pub mod reply;
pub mod routes;
pub mod service;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use service::DirectoryService;
pub use state::AppState;
