//! # stockroom-web
//!
//! Server-rendered inventory application.
//!
//! - Login/logout with server-side sessions
//! - Inventory dashboard and summary for every signed-in user
//! - Add-product and draw-stock forms for Managers and Administrators
//!
//! ## Tech Stack
//!
//! - Axum for HTTP, with the session gate and role guard as middleware
//! - HTML built with `format!` templates, styled with Tailwind CSS

pub mod auth;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::WebError;
pub use routes::create_router;
pub use server::StockroomServer;
pub use state::AppState;
