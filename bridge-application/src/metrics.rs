use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    events_received: AtomicU64,
    events_published: AtomicU64,
    events_dropped: AtomicU64,
    refreshes: AtomicU64,
}

impl Metrics {
    pub fn record_event_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> String {
        format!(
            "events received={} published={} dropped={} refreshes={}",
            self.events_received.load(Ordering::Relaxed),
            self.events_published.load(Ordering::Relaxed),
            self.events_dropped.load(Ordering::Relaxed),
            self.refreshes.load(Ordering::Relaxed),
        )
    }
}
