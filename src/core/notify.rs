use crate::domain::model::{CartEvent, CartItem};
use crate::domain::ports::CartObserver;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Default)]
struct ToastState {
    next_id: u64,
    current: Option<Notification>,
}

/// Single transient toast slot. A newer toast replaces the older one.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    state: Arc<Mutex<ToastState>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let Ok(mut state) = self.state.lock() else {
            return 0;
        };
        state.next_id += 1;
        let notification = Notification {
            id: state.next_id,
            kind,
            message: message.into(),
        };
        tracing::debug!("Toast #{}: {}", notification.id, notification.message);
        state.current = Some(notification);
        state.next_id
    }

    /// Shows a toast and schedules its removal after `after`.
    pub fn show_for(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        after: Duration,
    ) -> u64 {
        let id = self.show(kind, message);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let center = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(after).await;
                    center.dismiss(id);
                });
            }
            Err(_) => tracing::debug!("No runtime, toast #{} stays until replaced", id),
        }
        id
    }

    /// Removes toast `id` if it is still the one on screen.
    pub fn dismiss(&self, id: u64) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        match &state.current {
            Some(current) if current.id == id => {
                state.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.state.lock().ok()?.current.clone()
    }
}

/// Pops an "added to cart" toast on every add.
pub struct ToastObserver {
    center: NotificationCenter,
    dismiss_after: Duration,
}

impl ToastObserver {
    pub fn new(center: NotificationCenter, dismiss_after: Duration) -> Self {
        Self {
            center,
            dismiss_after,
        }
    }
}

impl CartObserver for ToastObserver {
    fn on_cart_changed(&mut self, event: &CartEvent, _items: &[CartItem]) {
        if let CartEvent::Added(item) = event {
            self.center.show_for(
                NotificationKind::Success,
                format!("✓ {} added to cart", item.service_name),
                self.dismiss_after,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_dismiss_is_noop() {
        let center = NotificationCenter::new();
        let first = center.show(NotificationKind::Info, "first");
        let second = center.show(NotificationKind::Info, "second");

        assert!(!center.dismiss(first));
        assert_eq!(center.current().unwrap().message, "second");
        assert!(center.dismiss(second));
        assert!(center.current().is_none());
        assert!(!center.dismiss(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss() {
        let center = NotificationCenter::new();
        center.show_for(NotificationKind::Success, "saved", Duration::from_secs(3));
        assert!(center.current().is_some());

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(center.current().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(center.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_timer_does_not_remove_new_toast() {
        let center = NotificationCenter::new();
        center.show_for(NotificationKind::Success, "first", Duration::from_secs(3));
        tokio::time::sleep(Duration::from_secs(2)).await;
        center.show_for(NotificationKind::Success, "second", Duration::from_secs(3));

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(center.current().unwrap().message, "second");

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(center.current().is_none());
    }
}
