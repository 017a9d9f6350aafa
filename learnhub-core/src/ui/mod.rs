//! Presentation state models for the pages: toasts, loading placeholders,
//! progress rings, focus trapping, debouncing and in-memory filtering.
//!
//! These hold no rendering code; a front end drives them and draws the
//! result.

pub mod debounce;
pub mod filter;
pub mod focus;
pub mod loading;
pub mod progress;
pub mod toast;

pub use debounce::Debouncer;
pub use filter::ItemFilter;
pub use focus::{FocusAction, FocusKey, FocusTrap};
pub use loading::{LoadingState, SkeletonKind};
pub use progress::{ProgressAnimation, ProgressRing};
pub use toast::{Toast, ToastId, ToastKind, ToastQueue};
