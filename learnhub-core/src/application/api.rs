use std::sync::Arc;

use learnhub_model::{CourseId, NewCourse, NewUser, UserKey, UserRole};
use tracing::info;

use super::unit_of_work::AppUnitOfWork;
use crate::api_types::{
    AnalyticsSummary, ApiError, ApiResult, CourseCreated, CourseList,
    EnrolledCourse, LoginSuccess, ProgressSnapshot, ProgressUpdated,
    UserCreated,
};
use crate::domain::users::auth::StreakCalendar;
use crate::domain::{
    AnalyticsService, AuthCrypto, AuthService, EnrollmentService,
    ProgressService, SearchService, UpdateGuard, UserWriteQueue,
    WishlistService,
};
use crate::query::{CoursePage, DEFAULT_PAGE_SIZE, SearchFilters};
use crate::security::{RateLimitRule, RateLimiters};
use crate::validation::validate_course;

/// Knobs the services are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSettings {
    pub default_page_size: u32,
    pub calendar: StreakCalendar,
    pub login_limit: RateLimitRule,
    pub registration_limit: RateLimitRule,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            calendar: StreakCalendar::default(),
            login_limit: RateLimitRule::LOGIN,
            registration_limit: RateLimitRule::REGISTRATION,
        }
    }
}

/// Public entry points. Every call returns an [`ApiResult`]; raw service
/// failures are logged and normalized here.
#[derive(Debug, Clone)]
pub struct LearnHubApi {
    uow: AppUnitOfWork,
    auth: AuthService,
    progress: ProgressService,
    wishlist: WishlistService,
    enrollment: EnrollmentService,
    analytics: AnalyticsService,
    search: SearchService,
}

impl LearnHubApi {
    pub fn new(uow: AppUnitOfWork, crypto: Arc<AuthCrypto>) -> Self {
        Self::with_settings(uow, crypto, ApiSettings::default())
    }

    pub fn with_settings(
        uow: AppUnitOfWork,
        crypto: Arc<AuthCrypto>,
        settings: ApiSettings,
    ) -> Self {
        let queue = UserWriteQueue::new();
        let limiters = Arc::new(RateLimiters::new(
            settings.login_limit,
            settings.registration_limit,
            RateLimitRule::FORM_SUBMIT,
        ));
        Self {
            auth: AuthService::new(uow.users.clone(), crypto, limiters)
                .with_calendar(settings.calendar),
            progress: ProgressService::new(
                uow.users.clone(),
                UpdateGuard::new(),
                queue.clone(),
            ),
            wishlist: WishlistService::new(
                uow.users.clone(),
                uow.courses.clone(),
                queue,
            ),
            enrollment: EnrollmentService::new(
                uow.users.clone(),
                uow.courses.clone(),
            ),
            analytics: AnalyticsService::new(uow.users.clone()),
            search: SearchService::new(uow.courses.clone())
                .with_default_page_size(settings.default_page_size),
            uow,
        }
    }

    pub fn unit_of_work(&self) -> &AppUnitOfWork {
        &self.uow
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn progress_service(&self) -> &ProgressService {
        &self.progress
    }

    // ===== Auth =====

    pub async fn login(
        &self,
        login_id: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> ApiResult<LoginSuccess> {
        self.auth
            .login(login_id, password, role)
            .await
            .map(|user| LoginSuccess { user })
            .map_err(|err| ApiError::from_learn(err, "Login"))
    }

    pub async fn update_login_streak(&self, user: UserKey) -> u32 {
        self.auth.update_login_streak(user).await
    }

    pub async fn register(
        &self,
        user: NewUser,
        password: &str,
    ) -> ApiResult<UserCreated> {
        self.auth
            .register(user, password)
            .await
            .map(|user| UserCreated { user })
            .map_err(|err| ApiError::from_learn(err, "Register"))
    }

    pub async fn set_password(&self, user: UserKey, password: &str) -> ApiResult<()> {
        self.auth
            .set_password(user, password)
            .await
            .map_err(|err| ApiError::from_learn(err, "Set Password"))
    }

    // ===== Progress =====

    pub async fn update_progress(
        &self,
        user: UserKey,
        course: CourseId,
        progress: i64,
        lesson: Option<&str>,
    ) -> ApiResult<ProgressUpdated> {
        self.progress
            .update_progress(user, course, progress, lesson)
            .await
            .map_err(|err| ApiError::from_learn(err, "Update Progress"))
    }

    pub async fn get_progress(
        &self,
        user: UserKey,
        course: CourseId,
    ) -> ApiResult<ProgressSnapshot> {
        self.progress
            .get_progress(user, course)
            .await
            .map_err(|err| ApiError::from_learn(err, "Get Progress"))
    }

    // ===== Wishlist =====

    pub async fn wishlist_add(&self, user: UserKey, course: CourseId) -> ApiResult<()> {
        self.wishlist
            .add(user, course)
            .await
            .map_err(|err| ApiError::from_learn(err, "Add to Wishlist"))
    }

    pub async fn wishlist_remove(
        &self,
        user: UserKey,
        course: CourseId,
    ) -> ApiResult<()> {
        self.wishlist
            .remove(user, course)
            .await
            .map_err(|err| ApiError::from_learn(err, "Remove from Wishlist"))
    }

    pub async fn wishlist_get(&self, user: UserKey) -> ApiResult<CourseList> {
        self.wishlist
            .get(user)
            .await
            .map(|courses| CourseList { courses })
            .map_err(|err| ApiError::from_learn(err, "Get Wishlist"))
    }

    // ===== Courses =====

    pub async fn search_courses(
        &self,
        text: &str,
        filters: &SearchFilters,
        page: u32,
        page_size: Option<u32>,
    ) -> ApiResult<CoursePage> {
        self.search
            .courses(text, filters, page, page_size)
            .await
            .map_err(|err| ApiError::from_learn(err, "Search Courses"))
    }

    pub async fn get_enrolled(
        &self,
        user: UserKey,
    ) -> ApiResult<CourseList<EnrolledCourse>> {
        self.enrollment
            .get_enrolled(user)
            .await
            .map(|courses| CourseList { courses })
            .map_err(|err| ApiError::from_learn(err, "Get Enrolled Courses"))
    }

    pub async fn student_analytics(&self, user: UserKey) -> ApiResult<AnalyticsSummary> {
        self.analytics
            .student_analytics(user)
            .await
            .map(|analytics| AnalyticsSummary { analytics })
            .map_err(|err| ApiError::from_learn(err, "Get Analytics"))
    }

    /// Validates the draft before it reaches the store.
    pub async fn create_course(&self, course: NewCourse) -> ApiResult<CourseCreated> {
        let errors = validate_course(&course);
        if !errors.is_empty() {
            return Err(ApiError::validation(errors.join(". ")));
        }
        let created = self
            .uow
            .courses
            .create_course(&course)
            .await
            .map_err(|err| ApiError::from_learn(err.into(), "Create Course"))?;
        info!(course = %created.id, "course created");
        Ok(CourseCreated { course: created })
    }
}
