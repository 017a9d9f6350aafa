use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);
/// Time a dismissed toast stays around for its exit transition.
pub const TOAST_REMOVAL_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✕",
            ToastKind::Warning => "⚠",
            ToastKind::Info => "ℹ",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ToastKind::Success => "Success",
            ToastKind::Error => "Error",
            ToastKind::Warning => "Warning",
            ToastKind::Info => "Information",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    /// `None` for sticky toasts.
    pub expires_at: Option<Instant>,
}

impl Toast {
    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_sticky(&self) -> bool {
        self.expires_at.is_none()
    }
}

/// Visible toasts in display order.
#[derive(Debug, Default)]
pub struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a toast. `None` uses the default lifetime; a zero duration
    /// keeps it until dismissed.
    pub fn show(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> ToastId {
        self.show_at(kind, message, duration, Instant::now())
    }

    pub fn show_at(
        &mut self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Option<Duration>,
        now: Instant,
    ) -> ToastId {
        let duration = duration.unwrap_or(DEFAULT_TOAST_DURATION);
        let id = ToastId(self.next_id);
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message: message.into(),
            expires_at: (!duration.is_zero()).then(|| now + duration),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Success, message, None)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Error, message, None)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Warning, message, None)
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.show(ToastKind::Info, message, None)
    }

    pub fn dismiss(&mut self, id: ToastId) -> Option<Toast> {
        let index = self.toasts.iter().position(|toast| toast.id == id)?;
        Some(self.toasts.remove(index))
    }

    /// Drops every toast whose lifetime ended at or before `now`.
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, live): (Vec<Toast>, Vec<Toast>) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|toast| toast.expires_at.is_some_and(|at| at <= now));
        self.toasts = live;
        expired
    }

    /// Earliest pending expiry, for scheduling the next `expire` call.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.toasts.iter().filter_map(|toast| toast.expires_at).min()
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
