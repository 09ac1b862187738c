use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{max_list, static_dir};
use crate::store::FlowerStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FlowerStore>,
    pub max_list: usize,
    pub static_dir: String,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    list_requests_total: AtomicU64,
    lookup_requests_total: AtomicU64,
    lookup_misses_total: AtomicU64,
    flowers_created_total: AtomicU64,
    create_conflicts_total: AtomicU64,
    create_rejections_total: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ObservabilitySnapshot {
    pub list_requests_total: u64,
    pub lookup_requests_total: u64,
    pub lookup_misses_total: u64,
    pub flowers_created_total: u64,
    pub create_conflicts_total: u64,
    pub create_rejections_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            list_requests_total: self.list_requests_total.load(Ordering::Relaxed),
            lookup_requests_total: self.lookup_requests_total.load(Ordering::Relaxed),
            lookup_misses_total: self.lookup_misses_total.load(Ordering::Relaxed),
            flowers_created_total: self.flowers_created_total.load(Ordering::Relaxed),
            create_conflicts_total: self.create_conflicts_total.load(Ordering::Relaxed),
            create_rejections_total: self.create_rejections_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_list_request(&self) {
        self.list_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, hit: bool) {
        self.lookup_requests_total.fetch_add(1, Ordering::Relaxed);
        if !hit {
            self.lookup_misses_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_created(&self) {
        self.flowers_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conflict(&self) {
        self.create_conflicts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.create_rejections_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(store: FlowerStore) -> Self {
        Self {
            store: Arc::new(store),
            max_list: max_list(),
            static_dir: static_dir(),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}
