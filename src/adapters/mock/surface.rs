//! Recording notifier and navigator for testing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::navigation::Navigator;
use crate::notifications::{Notification, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps every notification it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.notifications).clone()
    }

    /// Titles only, in arrival order.
    pub fn titles(&self) -> Vec<String> {
        lock(&self.notifications)
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    pub fn clear(&self) {
        lock(&self.notifications).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.notifications).push(notification);
    }
}

/// Keeps every route it is asked to open.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<String> {
        lock(&self.routes).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        lock(&self.routes).push(route.to_string());
    }
}
