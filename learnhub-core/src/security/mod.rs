//! Client-side hygiene helpers: input sanitizers, CSRF token handling and
//! advisory rate limiters.
//!
//! None of this is a security boundary. Stripping a denylist is not
//! sanitization, and a limiter living in one process is bypassed by
//! restarting it.

pub mod csrf;
pub mod rate_limit;
pub mod sanitize;

pub use csrf::CsrfTokens;
pub use rate_limit::{RateLimitRule, RateLimiter, RateLimiters};
pub use sanitize::{
    escape_html, sanitize_email, sanitize_input, sanitize_phone, unescape_html,
};
