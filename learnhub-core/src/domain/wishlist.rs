use std::fmt;
use std::sync::Arc;

use learnhub_model::{Course, CourseId, UserKey};
use tracing::debug;

use crate::database::ports::courses::CoursesRepository;
use crate::database::ports::users::UsersRepository;
use crate::domain::progress::UserWriteQueue;
use crate::error::Result;

/// Server-side wishlist stored on the user row.
///
/// Writes share the per-user lane with progress updates so neither can
/// overwrite the other's read-modify-write.
#[derive(Clone)]
pub struct WishlistService {
    users: Arc<dyn UsersRepository>,
    courses: Arc<dyn CoursesRepository>,
    queue: UserWriteQueue,
}

impl fmt::Debug for WishlistService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WishlistService")
            .field("users", &std::any::type_name_of_val(self.users.as_ref()))
            .field(
                "courses",
                &std::any::type_name_of_val(self.courses.as_ref()),
            )
            .finish()
    }
}

impl WishlistService {
    pub fn new(
        users: Arc<dyn UsersRepository>,
        courses: Arc<dyn CoursesRepository>,
        queue: UserWriteQueue,
    ) -> Self {
        Self {
            users,
            courses,
            queue,
        }
    }

    /// No-op when the course is already wishlisted.
    pub async fn add(&self, user: UserKey, course: CourseId) -> Result<()> {
        let _turn = self.queue.enter(user).await;
        let mut wishlist = self.users.get_wishlist(user).await?;
        if !wishlist.insert(course) {
            debug!(%user, %course, "course already wishlisted");
            return Ok(());
        }
        self.users.replace_wishlist(user, &wishlist).await?;
        Ok(())
    }

    pub async fn remove(&self, user: UserKey, course: CourseId) -> Result<()> {
        let _turn = self.queue.enter(user).await;
        let mut wishlist = self.users.get_wishlist(user).await?;
        wishlist.remove(course);
        self.users.replace_wishlist(user, &wishlist).await?;
        Ok(())
    }

    /// Resolves wishlisted keys to course rows. An empty wishlist never
    /// queries the courses table.
    pub async fn get(&self, user: UserKey) -> Result<Vec<Course>> {
        let wishlist = self.users.get_wishlist(user).await?;
        if wishlist.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.courses.courses_by_ids(wishlist.as_slice()).await?)
    }
}
