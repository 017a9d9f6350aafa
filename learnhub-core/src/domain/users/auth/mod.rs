//! Credential verification and login streak bookkeeping.

pub mod crypto;
pub mod service;
pub mod streak;

pub use crypto::{AuthCrypto, AuthCryptoError};
pub use service::AuthService;
pub use streak::{StreakCalendar, advance_streak};
