use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// `max_requests` per sliding `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitRule {
    pub const fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub const LOGIN: RateLimitRule = RateLimitRule::new(5, Duration::from_secs(60));
    pub const REGISTRATION: RateLimitRule =
        RateLimitRule::new(3, Duration::from_secs(60));
    pub const FORM_SUBMIT: RateLimitRule =
        RateLimitRule::new(10, Duration::from_secs(60));
}

/// Sliding-window request counter.
#[derive(Debug)]
pub struct RateLimiter {
    rule: RateLimitRule,
    requests: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(rule: RateLimitRule) -> Self {
        Self {
            rule,
            requests: Mutex::new(VecDeque::new()),
        }
    }

    pub fn rule(&self) -> RateLimitRule {
        self.rule
    }

    fn prune(&self, requests: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = requests.front() {
            if now.saturating_duration_since(*oldest) >= self.rule.window {
                requests.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn can_make_request(&self) -> bool {
        self.can_make_request_at(Instant::now())
    }

    pub fn can_make_request_at(&self, now: Instant) -> bool {
        let mut requests = self.requests.lock();
        self.prune(&mut requests, now);
        requests.len() < self.rule.max_requests as usize
    }

    pub fn record_request(&self) {
        self.record_request_at(Instant::now());
    }

    pub fn record_request_at(&self, now: Instant) {
        self.requests.lock().push_back(now);
    }

    /// Time until the oldest request in the window expires; zero when a
    /// request could be made right away.
    pub fn wait_time(&self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    pub fn wait_time_at(&self, now: Instant) -> Duration {
        let mut requests = self.requests.lock();
        self.prune(&mut requests, now);
        if requests.len() < self.rule.max_requests as usize {
            return Duration::ZERO;
        }
        requests
            .front()
            .map(|oldest| {
                self.rule
                    .window
                    .saturating_sub(now.saturating_duration_since(*oldest))
            })
            .unwrap_or(Duration::ZERO)
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_at(Instant::now())
    }

    pub fn remaining_at(&self, now: Instant) -> u32 {
        let mut requests = self.requests.lock();
        self.prune(&mut requests, now);
        let used = u32::try_from(requests.len()).unwrap_or(u32::MAX);
        self.rule.max_requests.saturating_sub(used)
    }
}

/// The three limiters the pages use.
#[derive(Debug)]
pub struct RateLimiters {
    pub login: RateLimiter,
    pub registration: RateLimiter,
    pub form_submit: RateLimiter,
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new(
            RateLimitRule::LOGIN,
            RateLimitRule::REGISTRATION,
            RateLimitRule::FORM_SUBMIT,
        )
    }
}

impl RateLimiters {
    pub fn new(
        login: RateLimitRule,
        registration: RateLimitRule,
        form_submit: RateLimitRule,
    ) -> Self {
        Self {
            login: RateLimiter::new(login),
            registration: RateLimiter::new(registration),
            form_submit: RateLimiter::new(form_submit),
        }
    }
}
