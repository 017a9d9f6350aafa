pub mod auth;
pub mod session;

pub use auth::{AuthCrypto, AuthService, advance_streak};
pub use session::{
    ActivityEvent, LogoutPlan, SessionPhase, SessionSettings, SessionSignal,
    SessionTimer, SessionWatchdog, logout, redirect_target,
};
