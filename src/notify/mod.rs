use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;

/// How many rendered notifications the feed keeps around for polling clients
const FEED_CAP: usize = 100;

/// How long a terminal notification stays on screen, in milliseconds
const FINISH_DURATION_MS: u64 = 5_000;

/// Lifecycle of one tracked operation notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Started,
    Updated,
    Finished,
}

/// Terminal styling for a finished operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishKind {
    Success,
    Error,
}

/// Visual style the display surface applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceStyle {
    Loading,
    Success,
    Error,
}

/// What the display surface receives for one render
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    /// `None` keeps the notification up until it is explicitly finished
    pub duration: Option<u64>,
    pub style: SurfaceStyle,
}

/// One in-flight operation tracked by the registry
#[derive(Debug, Clone)]
struct NotificationEntry {
    phase: Phase,
    message: String,
    percent: Option<u8>,
}

impl NotificationEntry {
    fn display_message(&self) -> String {
        match self.percent {
            Some(p) => format!("{} ({}%)", self.message, p),
            None => self.message.clone(),
        }
    }
}

/// Display mechanism notifications are rendered through
#[async_trait]
pub trait NotificationSurface: Send + Sync {
    async fn show(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Registry of in-flight, user-visible operation notifications.
///
/// Explicitly owned and injected (carried in app state), never ambient.
/// Process-local: reset on restart, not shared across instances.
pub struct ProgressNotifier {
    surface: Arc<dyn NotificationSurface>,
    entries: Mutex<HashMap<i64, NotificationEntry>>,
    last_id: AtomicI64,
}

impl ProgressNotifier {
    pub fn new(surface: Arc<dyn NotificationSurface>) -> Self {
        Self {
            surface,
            entries: Mutex::new(HashMap::new()),
            last_id: AtomicI64::new(0),
        }
    }

    /// Open a persistent notification in the started phase and return its id.
    pub async fn start(&self, message: &str) -> i64 {
        let id = self.next_id();

        let entry = NotificationEntry {
            phase: Phase::Started,
            message: message.to_string(),
            percent: None,
        };
        let display = entry.display_message();

        self.entries.lock().expect("notifier registry poisoned").insert(id, entry);

        self.render(Notification {
            id,
            message: display,
            duration: None,
            style: SurfaceStyle::Loading,
        })
        .await;

        id
    }

    /// Re-render a tracked notification in place with new text and an
    /// optional rounded percentage suffix. Unknown ids are silently ignored.
    pub async fn update(&self, id: i64, message: &str, percent: Option<f64>) {
        let display = {
            let mut entries = self.entries.lock().expect("notifier registry poisoned");
            let entry = match entries.get_mut(&id) {
                Some(entry) => entry,
                None => return,
            };
            entry.phase = Phase::Updated;
            entry.message = message.to_string();
            entry.percent = percent.map(|p| p.round().clamp(0.0, 100.0) as u8);
            entry.display_message()
        };

        self.render(Notification {
            id,
            message: display,
            duration: None,
            style: SurfaceStyle::Loading,
        })
        .await;
    }

    /// Transition a notification to its terminal state and drop it from the
    /// registry. A second finish on the same id is a no-op: the id is no
    /// longer registered.
    pub async fn finish(&self, id: i64, message: &str, kind: FinishKind) {
        {
            let mut entries = self.entries.lock().expect("notifier registry poisoned");
            if entries.remove(&id).is_none() {
                return;
            }
        }

        let style = match kind {
            FinishKind::Success => SurfaceStyle::Success,
            FinishKind::Error => SurfaceStyle::Error,
        };

        self.render(Notification {
            id,
            message: message.to_string(),
            duration: Some(FINISH_DURATION_MS),
            style,
        })
        .await;
    }

    /// Number of operations currently tracked
    pub fn active_count(&self) -> usize {
        self.entries.lock().expect("notifier registry poisoned").len()
    }

    /// Time-based identifier, bumped when two starts land in the same
    /// millisecond so ids stay monotonically distinguishable in-process.
    /// Nothing guards against collisions across processes.
    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .expect("fetch_update closure always returns Some")
    }

    async fn render(&self, notification: Notification) {
        if let Err(e) = self.surface.show(notification.clone()).await {
            // Degraded path: the operation outcome still reaches the operator
            // through the log, and the caller never sees a failure.
            tracing::warn!("Notification surface unavailable, falling back to log: {}", e);
            tracing::info!(
                id = notification.id,
                style = ?notification.style,
                "{}",
                notification.message
            );
        }
    }
}

/// In-memory notification feed the browser polls; the primary display surface.
#[derive(Default)]
pub struct NotificationFeed {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.entries.lock().expect("notification feed poisoned").clone()
    }
}

#[async_trait]
impl NotificationSurface for NotificationFeed {
    async fn show(&self, notification: Notification) -> anyhow::Result<()> {
        let mut entries = self.entries.lock().expect("notification feed poisoned");

        match entries.iter_mut().find(|n| n.id == notification.id) {
            Some(existing) => *existing = notification,
            None => {
                entries.push(notification);
                if entries.len() > FEED_CAP {
                    entries.remove(0);
                }
            }
        }

        Ok(())
    }
}
