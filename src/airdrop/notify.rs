//! User-facing notifications (toasts).

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub level: NotificationLevel,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// Bounded queue; the oldest entry is evicted when full.
#[derive(Debug)]
pub struct NotificationCenter {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(
        &self,
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Uuid {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let notification = Notification {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            level,
            created_at,
        };
        let id = notification.id;

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
        id
    }

    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) -> Uuid {
        self.push(NotificationLevel::Error, title, description)
    }

    /// Remove a notification. Returns false if it was not present.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}
