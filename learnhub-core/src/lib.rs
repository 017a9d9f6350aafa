//! # LearnHub Core
//!
//! Services behind the LearnHub learning platform: per-user enrollment
//! progress, wishlists, course search, login with streak bookkeeping, and
//! the small client-side helpers (sanitizers, rate limiters, local state,
//! UI state models) the pages rely on.
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL store adapter (SQLx) and embedded migrations
//! - `rest`: PostgREST-compatible hosted store adapter (reqwest)
//! - `pg-tests`: integration tests that need a live database
//!
//! ## Architecture
//!
//! - [`database`]: repository ports and the memory / Postgres / REST adapters
//! - [`domain`]: progress, wishlist, enrollment, analytics, search and auth
//! - [`application`]: the [`application::LearnHubApi`] facade returning
//!   normalized [`api_types::ApiResult`]s
//! - [`api_types`]: error kinds, the success/error envelope, normalization
//! - [`security`], [`local`], [`ui`]: sanitizers, local state, UI models

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod api_types;
pub mod application;
pub mod database;
pub mod domain;
pub mod error;
pub mod identity;
pub mod local;
pub mod query;
pub mod security;
pub mod ui;
pub mod validation;

pub use learnhub_model as model;

pub use api_types::{ApiError, ApiResult, Envelope, ErrorKind};
pub use application::{AppUnitOfWork, LearnHubApi};
pub use error::{LearnError, Result, StoreError};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
