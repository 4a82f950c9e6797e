//! User-facing notifications.
//!
//! The client layer reports lifecycle changes (connected, offline,
//! connection lost, session expired) to a [`Notifier`]. What the surface does
//! with them is up to the host application: the CLI logs them and, on macOS,
//! posts them to Notification Center.

use std::fmt;
use std::time::Duration;

/// Severity of a notification, mirrored by the surface's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// A notification for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    /// How long the surface should show it; `None` uses the surface default.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// The stream connection opened.
    pub fn connected() -> Self {
        Self::new(
            "🌟 Let's Go!",
            "Hey! You're back, time to level up your English! Ready for a fun chat? I'm all ears! 😊",
            Severity::Success,
        )
    }

    /// The stream connection closed.
    pub fn offline() -> Self {
        Self::new(
            "😴 Linda Offline",
            "I'm taking a short break. I'll be back soon! 🌙",
            Severity::Warning,
        )
        .with_duration(Duration::from_millis(6000))
    }

    /// The stream connection reported an error.
    pub fn connection_lost() -> Self {
        Self::new(
            "😢 Connection Lost",
            "Oops! I'm having trouble connecting. Please try again later! 🔌",
            Severity::Error,
        )
        .with_duration(Duration::from_millis(6000))
    }

    /// Automatic reconnection gave up.
    pub fn reconnect_failed(attempts: u32) -> Self {
        Self::new(
            "🔌 Still Offline",
            format!(
                "I couldn't get back online after {} attempts. Reconnect when you're ready!",
                attempts
            ),
            Severity::Error,
        )
    }

    /// The server no longer recognises the session.
    pub fn session_expired() -> Self {
        Self::new(
            "👋 Hey Stranger!",
            "Wait... I can't remember your name! Did we forget to introduce ourselves? Let's fix that! 😊",
            Severity::Info,
        )
        .with_duration(Duration::from_millis(6000))
    }
}

/// Receives notifications. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> Notifier for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);
    }
}

fn log_notification(notification: &Notification) {
    match notification.severity {
        Severity::Success | Severity::Info => {
            tracing::info!("{}: {}", notification.title, notification.message)
        }
        Severity::Warning => tracing::warn!("{}: {}", notification.title, notification.message),
        Severity::Error => tracing::error!("{}: {}", notification.title, notification.message),
    }
}

/// Logs notifications and mirrors them to the desktop.
///
/// On macOS the banner is posted through `osascript` from a blocking task so
/// dispatch never stalls the caller. Elsewhere only the log line is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, notification: Notification) {
        log_notification(&notification);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        handle.spawn_blocking(move || {
            send_notification(&notification.title, &notification.message);
        });
    }
}

#[cfg(target_os = "macos")]
fn send_notification(title: &str, body: &str) {
    use std::process::Command;

    // AppleScript string literals
    let escaped_title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let escaped_body = body.replace('\\', "\\\\").replace('"', "\\\"");

    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        escaped_body, escaped_title
    );

    match Command::new("osascript").arg("-e").arg(&script).output() {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("osascript notification failed: {}", stderr.trim());
        }
        Err(e) => {
            tracing::warn!("Failed to spawn osascript: {}", e);
        }
        _ => {
            tracing::debug!("Desktop notification sent");
        }
    }
}

#[cfg(not(target_os = "macos"))]
fn send_notification(_title: &str, _body: &str) {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_presets_match_surface_contract() {
        let offline = Notification::offline();
        assert_eq!(offline.severity, Severity::Warning);
        assert_eq!(offline.duration, Some(Duration::from_millis(6000)));

        let connected = Notification::connected();
        assert_eq!(connected.severity, Severity::Success);
        assert_eq!(connected.duration, None);

        let expired = Notification::session_expired();
        assert_eq!(expired.severity, Severity::Info);
        assert!(expired.title.contains("Stranger"));

        assert_eq!(Notification::connection_lost().severity, Severity::Error);
        assert!(Notification::reconnect_failed(3).message.contains('3'));
    }

    #[test]
    fn test_closure_is_a_notifier() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let notifier = move |n: Notification| sink.lock().unwrap().push(n.title);

        notifier.notify(Notification::offline());
        assert_eq!(seen.lock().unwrap().as_slice(), ["😴 Linda Offline"]);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
    }

    #[test]
    fn test_desktop_notifier_without_runtime_does_not_panic() {
        DesktopNotifier.notify(Notification::connected());
    }
}
