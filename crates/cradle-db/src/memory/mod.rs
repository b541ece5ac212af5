//! In-memory repositories for tests and local experiments
//!
//! These mirror the PostgreSQL behaviour that callers depend on: unique
//! constraints surface as `AppError::Conflict`, listings are ordered by
//! creation time, and the status update is a compare-and-set.

mod catalog;
mod request_analytics;
mod user;

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use catalog::{InMemoryCategoryRepository, InMemoryRequestTypeRepository};
pub use request_analytics::InMemoryRequestAnalyticsRepository;
pub use user::InMemoryUserRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Hands out strictly increasing timestamps so creation order survives
/// inserts that land within the same clock tick.
#[derive(Debug)]
struct Clock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Clock {
    fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        let mut last = lock(&self.last);
        let mut now = Utc::now();
        if let Some(prev) = *last {
            if now <= prev {
                now = prev + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}

fn conflict() -> cradle_core::AppError {
    cradle_core::AppError::Conflict("Resource already exists".to_string())
}

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    items.iter().skip(offset).take(limit).cloned().collect()
}
