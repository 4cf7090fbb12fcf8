//! Toast notifications
//!
//! Dismissible, auto-expiring messages. Showing a toast never fails and
//! returns nothing; the center only remembers what is currently visible.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Oldest toasts are dropped beyond this many
pub const MAX_VISIBLE_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// How long a toast of this kind stays on screen
    pub fn duration(&self) -> Duration {
        match self {
            ToastKind::Info | ToastKind::Success => Duration::seconds(3),
            ToastKind::Warning | ToastKind::Error => Duration::seconds(5),
        }
    }

    /// Bootstrap contextual background class
    pub fn css_class(&self) -> &'static str {
        match self {
            ToastKind::Info => "bg-info",
            ToastKind::Success => "bg-success",
            ToastKind::Warning => "bg-warning",
            ToastKind::Error => "bg-danger",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    fn new(message: String, kind: ToastKind, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            kind,
            created_at: now,
            expires_at: now + kind.duration(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

pub trait ToastPresenter: Send + Sync {
    fn show(&self, message: &str, kind: ToastKind);
}

#[derive(Debug, Default)]
pub struct ToastCenter {
    toasts: Mutex<VecDeque<Toast>>,
}

impl ToastCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast created at `now`, returning its id for dismissal
    pub fn push_at(&self, message: &str, kind: ToastKind, now: DateTime<Utc>) -> Uuid {
        let toast = Toast::new(message.to_string(), kind, now);
        let id = toast.id;

        match kind {
            ToastKind::Error => tracing::warn!(toast_id = %id, kind = %kind, "{}", message),
            _ => tracing::info!(toast_id = %id, kind = %kind, "{}", message),
        }

        let mut toasts = self.toasts.lock();
        toasts.retain(|t| !t.is_expired(now));
        toasts.push_back(toast);
        while toasts.len() > MAX_VISIBLE_TOASTS {
            toasts.pop_front();
        }

        id
    }

    pub fn push(&self, message: &str, kind: ToastKind) -> Uuid {
        self.push_at(message, kind, Utc::now())
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        self.toasts
            .lock()
            .iter()
            .filter(|t| !t.is_expired(now))
            .cloned()
            .collect()
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.visible_at(Utc::now())
    }

    /// User closed a toast before it expired
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.toasts.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    /// Drop expired toasts, returning how many were removed
    pub fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let mut toasts = self.toasts.lock();
        let before = toasts.len();
        toasts.retain(|t| !t.is_expired(now));
        before - toasts.len()
    }

    pub fn clear(&self) {
        self.toasts.lock().clear();
    }
}

impl ToastPresenter for ToastCenter {
    fn show(&self, message: &str, kind: ToastKind) {
        self.push(message, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expiry_by_kind() {
        let center = ToastCenter::new();
        let now = Utc::now();

        center.push_at("Saved", ToastKind::Success, now);
        center.push_at("Feed unavailable", ToastKind::Error, now);

        assert_eq!(center.visible_at(now).len(), 2);

        let later = now + Duration::seconds(4);
        let visible = center.visible_at(later);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].kind, ToastKind::Error);

        assert_eq!(center.prune_expired(now + Duration::seconds(6)), 2);
        assert!(center.visible_at(now).is_empty());
    }

    #[test]
    fn test_dismiss() {
        let center = ToastCenter::new();
        let id = center.push("Hello", ToastKind::Info);

        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.visible().is_empty());
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let center = ToastCenter::new();
        let now = Utc::now();

        for i in 0..(MAX_VISIBLE_TOASTS + 2) {
            center.push_at(&format!("toast {}", i), ToastKind::Info, now);
        }

        let visible = center.visible_at(now);
        assert_eq!(visible.len(), MAX_VISIBLE_TOASTS);
        assert_eq!(visible[0].message, "toast 2");
    }

    #[test]
    fn test_presenter_trait_object() {
        let center = std::sync::Arc::new(ToastCenter::new());
        let presenter: std::sync::Arc<dyn ToastPresenter> = center.clone();

        presenter.show("via trait", ToastKind::Warning);
        assert_eq!(center.visible()[0].message, "via trait");
    }
}
