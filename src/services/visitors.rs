// src/services/visitors.rs - Visit counters
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide visit counters.
///
/// Two independent monotonically increasing counters; neither survives a
/// restart. One instance is shared across all workers via `web::Data`.
#[derive(Debug, Default)]
pub struct VisitorService {
    total_visits: AtomicU64,
    unique_visitors: AtomicU64,
}

impl VisitorService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total(&self) -> u64 {
        self.total_visits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn increment_unique(&self) -> u64 {
        self.unique_visitors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn total_visits(&self) -> u64 {
        self.total_visits.load(Ordering::Relaxed)
    }

    pub fn unique_visitors(&self) -> u64 {
        self.unique_visitors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let service = VisitorService::new();
        assert_eq!(service.total_visits(), 0);
        assert_eq!(service.unique_visitors(), 0);
    }

    #[test]
    fn counters_are_independent() {
        let service = VisitorService::new();

        assert_eq!(service.increment_total(), 1);
        assert_eq!(service.increment_total(), 2);
        assert_eq!(service.increment_unique(), 1);

        assert_eq!(service.total_visits(), 2);
        assert_eq!(service.unique_visitors(), 1);
    }
}
