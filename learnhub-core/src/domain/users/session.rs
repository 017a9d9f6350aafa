//! Inactivity-based session expiry.
//!
//! Any activity event pushes both deadlines out again: a warning at
//! `timeout - warning_window` and expiry at `timeout`. On expiry the
//! caller runs [`logout`], which wipes local state and plans the redirect.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::local::{LocalStore, LocalStoreError};
use crate::ui::{ToastId, ToastKind, ToastQueue};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired due to inactivity";
pub const SESSION_EXTENDED_MESSAGE: &str = "Session extended";
pub const LOGGED_OUT_MESSAGE: &str = "Logged out";

const ADMIN_LOGIN_PAGE: &str = "login.html";
const PORTAL_LOGIN_PAGE: &str = "../portal/login.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub timeout: Duration,
    pub warning_window: Duration,
    pub logout_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30 * 60),
            warning_window: Duration::from_secs(5 * 60),
            logout_delay: Duration::from_secs(1),
        }
    }
}

impl SessionSettings {
    /// Delay from the last activity until the warning.
    pub fn warning_after(&self) -> Duration {
        self.timeout.saturating_sub(self.warning_window)
    }

    /// Text shown when the warning fires.
    pub fn warning_message(&self) -> String {
        format!(
            "Your session will expire in {} due to inactivity.",
            describe_window(self.warning_window)
        )
    }
}

/// Whole minutes when the window divides evenly, seconds otherwise.
fn describe_window(window: Duration) -> String {
    let secs = window.as_secs();
    let (count, unit) = if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Input events that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    PointerDown,
    KeyDown,
    Scroll,
    TouchStart,
}

impl ActivityEvent {
    pub fn from_dom_event(name: &str) -> Option<Self> {
        match name {
            "mousedown" => Some(ActivityEvent::PointerDown),
            "keydown" => Some(ActivityEvent::KeyDown),
            "scroll" => Some(ActivityEvent::Scroll),
            "touchstart" => Some(ActivityEvent::TouchStart),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Warning { remaining: Duration },
    Expired,
}

/// Deadline bookkeeping without any task behind it.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimer {
    settings: SessionSettings,
    last_activity: Instant,
}

impl SessionTimer {
    pub fn new(settings: SessionSettings, now: Instant) -> Self {
        Self {
            settings,
            last_activity: now,
        }
    }

    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn warning_at(&self) -> Instant {
        self.last_activity + self.settings.warning_after()
    }

    pub fn expires_at(&self) -> Instant {
        self.last_activity + self.settings.timeout
    }

    pub fn phase(&self, now: Instant) -> SessionPhase {
        if now >= self.expires_at() {
            SessionPhase::Expired
        } else if now >= self.warning_at() {
            SessionPhase::Warning {
                remaining: self.expires_at() - now,
            }
        } else {
            SessionPhase::Active
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Warning,
    Expired,
}

/// Background task emitting [`SessionSignal`]s. The task stops after
/// `Expired` and is aborted when the watchdog is dropped.
#[derive(Debug)]
pub struct SessionWatchdog {
    activity: mpsc::UnboundedSender<ActivityEvent>,
    task: JoinHandle<()>,
}

impl SessionWatchdog {
    pub fn spawn(settings: SessionSettings) -> (Self, mpsc::Receiver<SessionSignal>) {
        let (activity, activity_rx) = mpsc::unbounded_channel();
        let (signals, signals_rx) = mpsc::channel(4);
        let task = tokio::spawn(watch(settings, activity_rx, signals));
        (Self { activity, task }, signals_rx)
    }

    /// Resets both deadlines. Returns `false` once the session expired.
    pub fn activity(&self, event: ActivityEvent) -> bool {
        self.activity.send(event).is_ok()
    }

    /// The "stay logged in" answer to the warning.
    pub fn extend(&self, toasts: &mut ToastQueue) -> bool {
        let alive = self.activity(ActivityEvent::PointerDown);
        if alive {
            toasts.success(SESSION_EXTENDED_MESSAGE);
        }
        alive
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SessionWatchdog {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn watch(
    settings: SessionSettings,
    mut activity: mpsc::UnboundedReceiver<ActivityEvent>,
    signals: mpsc::Sender<SessionSignal>,
) {
    let mut timer = SessionTimer::new(settings, Instant::now());
    let mut warned = false;
    loop {
        let deadline = if warned {
            timer.expires_at()
        } else {
            timer.warning_at()
        };
        tokio::select! {
            event = activity.recv() => {
                let Some(event) = event else { break };
                debug!(?event, "session activity");
                timer.record_activity(Instant::now());
                warned = false;
            }
            _ = sleep_until(deadline) => {
                if warned {
                    info!("session expired");
                    let _ = signals.send(SessionSignal::Expired).await;
                    break;
                }
                warned = true;
                if signals.send(SessionSignal::Warning).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// What the page does after local state is wiped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutPlan {
    pub redirect_to: &'static str,
    pub delay: Duration,
    pub notice: String,
}

impl LogoutPlan {
    pub fn announce(&self, toasts: &mut ToastQueue) -> ToastId {
        toasts.show(ToastKind::Warning, self.notice.clone(), None)
    }
}

/// Login page for the area `path` belongs to.
pub fn redirect_target(path: &str) -> &'static str {
    if path.contains("/admin/") {
        ADMIN_LOGIN_PAGE
    } else {
        PORTAL_LOGIN_PAGE
    }
}

pub fn logout(
    store: &dyn LocalStore,
    path: &str,
    message: Option<&str>,
    settings: &SessionSettings,
) -> Result<LogoutPlan, LocalStoreError> {
    store.clear()?;
    let plan = LogoutPlan {
        redirect_to: redirect_target(path),
        delay: settings.logout_delay,
        notice: message
            .filter(|m| !m.is_empty())
            .unwrap_or(LOGGED_OUT_MESSAGE)
            .to_string(),
    };
    info!(redirect = plan.redirect_to, "logged out");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::{MemoryLocalStore, THEME_KEY};

    fn quick() -> SessionSettings {
        SessionSettings {
            timeout: Duration::from_secs(30),
            warning_window: Duration::from_secs(5),
            logout_delay: Duration::from_secs(1),
        }
    }

    #[test]
    fn timer_phases() {
        let start = Instant::now();
        let mut timer = SessionTimer::new(quick(), start);
        assert_eq!(timer.phase(start + Duration::from_secs(10)), SessionPhase::Active);
        assert_eq!(
            timer.phase(start + Duration::from_secs(27)),
            SessionPhase::Warning {
                remaining: Duration::from_secs(3)
            }
        );
        assert_eq!(timer.phase(start + Duration::from_secs(30)), SessionPhase::Expired);

        timer.record_activity(start + Duration::from_secs(27));
        assert_eq!(timer.phase(start + Duration::from_secs(40)), SessionPhase::Active);
    }

    #[test]
    fn warning_text_follows_the_window() {
        assert_eq!(
            SessionSettings::default().warning_message(),
            "Your session will expire in 5 minutes due to inactivity."
        );
        let one_minute = SessionSettings {
            warning_window: Duration::from_secs(60),
            ..SessionSettings::default()
        };
        assert_eq!(
            one_minute.warning_message(),
            "Your session will expire in 1 minute due to inactivity."
        );
        assert_eq!(
            quick().warning_message(),
            "Your session will expire in 5 seconds due to inactivity."
        );
    }

    #[test]
    fn dom_events_map_to_activity() {
        assert_eq!(
            ActivityEvent::from_dom_event("touchstart"),
            Some(ActivityEvent::TouchStart)
        );
        assert_eq!(ActivityEvent::from_dom_event("mousemove"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_warns_then_expires() {
        let start = Instant::now();
        let (watchdog, mut signals) = SessionWatchdog::spawn(quick());

        assert_eq!(signals.recv().await, Some(SessionSignal::Warning));
        assert_eq!(start.elapsed(), Duration::from_secs(25));
        assert_eq!(signals.recv().await, Some(SessionSignal::Expired));
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert_eq!(signals.recv().await, None);
        assert!(!watchdog.activity(ActivityEvent::KeyDown));
    }

    #[tokio::test(start_paused = true)]
    async fn activity_pushes_deadlines_out() {
        let start = Instant::now();
        let (watchdog, mut signals) = SessionWatchdog::spawn(quick());

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(watchdog.activity(ActivityEvent::Scroll));

        assert_eq!(signals.recv().await, Some(SessionSignal::Warning));
        assert_eq!(start.elapsed(), Duration::from_secs(45));

        let mut toasts = ToastQueue::new();
        assert!(watchdog.extend(&mut toasts));
        assert_eq!(toasts.visible()[0].message, SESSION_EXTENDED_MESSAGE);

        assert_eq!(signals.recv().await, Some(SessionSignal::Warning));
        assert_eq!(start.elapsed(), Duration::from_secs(70));
    }

    #[test]
    fn logout_clears_state_and_picks_login_page() {
        let store = MemoryLocalStore::new();
        store.set_item(THEME_KEY, "dark").unwrap();

        let plan = logout(&store, "/learnhub/admin/courses.html", None, &quick()).unwrap();
        assert!(store.is_empty());
        assert_eq!(plan.redirect_to, "login.html");
        assert_eq!(plan.notice, LOGGED_OUT_MESSAGE);
        assert_eq!(plan.delay, Duration::from_secs(1));

        let plan = logout(
            &store,
            "/learnhub/portal/dashboard.html",
            Some(SESSION_EXPIRED_MESSAGE),
            &quick(),
        )
        .unwrap();
        assert_eq!(plan.redirect_to, "../portal/login.html");

        let mut toasts = ToastQueue::new();
        plan.announce(&mut toasts);
        assert_eq!(toasts.visible()[0].kind, ToastKind::Warning);
        assert_eq!(toasts.visible()[0].message, SESSION_EXPIRED_MESSAGE);
    }
}
