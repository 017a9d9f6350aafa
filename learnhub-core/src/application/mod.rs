//! Composition root: repository wiring and the normalized public facade.

pub mod api;
pub mod unit_of_work;

pub use api::{ApiSettings, LearnHubApi};
pub use unit_of_work::{AppUnitOfWork, AppUnitOfWorkBuilder};
