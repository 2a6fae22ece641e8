// ==========================================
// Seguimiento - aggregate statistics
// ==========================================

use serde::{Deserialize, Serialize};

use super::types::TrackingStatus;

/// Counts of requests by tracking status over the full population
/// matching a category filter. Recomputed whole on every change
/// notification or filter change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub active: u64,
    pub executed: u64,
    pub cancelled: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.active + self.executed + self.cancelled
    }

    pub fn record(&mut self, status: TrackingStatus) {
        match status {
            TrackingStatus::Active => self.active += 1,
            TrackingStatus::Executed => self.executed += 1,
            TrackingStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn get(&self, status: TrackingStatus) -> u64 {
        match status {
            TrackingStatus::Active => self.active,
            TrackingStatus::Executed => self.executed,
            TrackingStatus::Cancelled => self.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_total() {
        let mut counts = StatusCounts::default();
        counts.record(TrackingStatus::Active);
        counts.record(TrackingStatus::Active);
        counts.record(TrackingStatus::Executed);
        counts.record(TrackingStatus::Cancelled);

        assert_eq!(counts.active, 2);
        assert_eq!(counts.executed, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(TrackingStatus::Executed), 1);
    }
}
