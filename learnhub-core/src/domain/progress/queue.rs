use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use learnhub_model::UserKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

type Lane = Arc<Mutex<()>>;

/// Serializes every read-modify-write on one user's document.
///
/// Updates for different courses of the same user would otherwise each read
/// the whole enrollment sequence and the later write would drop the earlier
/// one's entry. Lanes are created on demand and removed once idle.
#[derive(Debug, Clone, Default)]
pub struct UserWriteQueue {
    lanes: Arc<DashMap<UserKey, Lane>>,
}

impl UserWriteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the user's lane. Writers are admitted in FIFO order.
    pub async fn enter(&self, user: UserKey) -> UserWriteTurn {
        let lane = self
            .lanes
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let held = Arc::clone(&lane).lock_owned().await;

        UserWriteTurn {
            user,
            lanes: Arc::clone(&self.lanes),
            lane,
            held: Some(held),
        }
    }

    pub fn active_lanes(&self) -> usize {
        self.lanes.len()
    }
}

/// Exclusive turn on a user's lane, released on drop.
pub struct UserWriteTurn {
    user: UserKey,
    lanes: Arc<DashMap<UserKey, Lane>>,
    lane: Lane,
    held: Option<OwnedMutexGuard<()>>,
}

impl fmt::Debug for UserWriteTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserWriteTurn")
            .field("user", &self.user)
            .field("held", &self.held.is_some())
            .finish()
    }
}

impl Drop for UserWriteTurn {
    fn drop(&mut self) {
        drop(self.held.take());
        // One reference in the map, one in this turn: nobody else is waiting.
        self.lanes
            .remove_if(&self.user, |_, lane| {
                Arc::ptr_eq(lane, &self.lane) && Arc::strong_count(lane) == 2
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn idle_lanes_are_dropped() {
        let queue = UserWriteQueue::new();
        let user = UserKey::new();
        {
            let _turn = queue.enter(user).await;
            assert_eq!(queue.active_lanes(), 1);
        }
        assert_eq!(queue.active_lanes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn same_user_turns_do_not_overlap() {
        let queue = UserWriteQueue::new();
        let user = UserKey::new();
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let run = |tag: &'static str| {
            let queue = queue.clone();
            let log = Arc::clone(&log);
            async move {
                let _turn = queue.enter(user).await;
                log.lock().push(format!("{tag}:start"));
                tokio::time::sleep(Duration::from_millis(10)).await;
                log.lock().push(format!("{tag}:end"));
            }
        };

        tokio::join!(run("a"), run("b"));

        assert_eq!(
            *log.lock(),
            vec!["a:start", "a:end", "b:start", "b:end"]
        );
        assert_eq!(queue.active_lanes(), 0);
    }

    #[tokio::test]
    async fn different_users_do_not_wait() {
        let queue = UserWriteQueue::new();
        let _first = queue.enter(UserKey::new()).await;
        let second = tokio::time::timeout(
            Duration::from_millis(50),
            queue.enter(UserKey::new()),
        )
        .await;
        assert!(second.is_ok());
        assert_eq!(queue.active_lanes(), 2);
    }
}
