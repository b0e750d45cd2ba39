//! Library users domain
//!
//! Registration, listing, update and removal of library patrons.
//!
//! ```text
//! handlers  ← axum routes under /library/user
//!    │
//! service   ← email uniqueness and format, existence checks, partial updates
//!    │
//! repository ← UserRepository trait; in-memory and PostgreSQL stores
//! ```
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = axum::Router::new().nest(handlers::BASE_PATH, handlers::router(service));
//! ```

pub mod email;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use email::EmailValidator;
pub use error::{UserError, UserResult};
pub use models::{CreateUser, UpdateUser, User, UserResponse};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
