//! Domain services. Each service owns its repository handles and returns
//! [`crate::error::Result`]; normalization happens in
//! [`crate::application::LearnHubApi`].

pub mod analytics;
pub mod enrollment;
pub mod progress;
pub mod search;
pub mod users;
pub mod wishlist;

pub use analytics::{AnalyticsService, StudentAnalytics};
pub use enrollment::EnrollmentService;
pub use progress::{GuardKey, ProgressService, UpdateGuard, UserWriteQueue};
pub use search::SearchService;
pub use users::{AuthCrypto, AuthService};
pub use wishlist::WishlistService;
