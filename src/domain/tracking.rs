// ==========================================
// Seguimiento - tracking state entity
// ==========================================
// One-to-one extension of a request: lifecycle status plus
// milestone dates. Created lazily on first tracking access,
// then updated in place (total overwrite, never recreated).
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::TrackingStatus;

/// Lifecycle status and milestone dates for one request.
///
/// Milestone dates are independently optional. The only enforced
/// invariant is that `completion_date`, when set alongside
/// `start_date`, must not precede it (see [`TrackingState::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingState {
    /// Foreign key to the request; unique (one row per request).
    pub request_id: i64,
    pub status: TrackingStatus,
    /// Date the request entered the office.
    #[serde(default)]
    pub intake_date: Option<NaiveDate>,
    /// Date work started.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Date a crew/resource was assigned.
    #[serde(default)]
    pub assignment_date: Option<NaiveDate>,
    /// Date of the technical assessment.
    #[serde(default)]
    pub assessment_date: Option<NaiveDate>,
    /// Date work completed.
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
}

impl TrackingState {
    /// Fresh tracking row for a request: ACTIVE, no milestones.
    pub fn new(request_id: i64) -> Self {
        Self {
            request_id,
            status: TrackingStatus::Active,
            intake_date: None,
            start_date: None,
            assignment_date: None,
            assessment_date: None,
            completion_date: None,
        }
    }

    /// Check the milestone invariant.
    ///
    /// Returns the violation message when both dates are set and
    /// completion precedes start; `Ok` otherwise (including when
    /// either date is absent).
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(completion)) = (self.start_date, self.completion_date) {
            if completion < start {
                return Err(format!(
                    "completion date {} precedes start date {}",
                    completion, start
                ));
            }
        }
        Ok(())
    }

    /// True when no milestone date has been recorded yet.
    pub fn milestones_empty(&self) -> bool {
        self.intake_date.is_none()
            && self.start_date.is_none()
            && self.assignment_date.is_none()
            && self.assessment_date.is_none()
            && self.completion_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_state_is_active_with_empty_milestones() {
        let state = TrackingState::new(500);
        assert_eq!(state.request_id, 500);
        assert_eq!(state.status, TrackingStatus::Active);
        assert!(state.milestones_empty());
    }

    #[test]
    fn test_validate_rejects_completion_before_start() {
        let mut state = TrackingState::new(1);
        state.start_date = Some(date(2024, 1, 10));
        state.completion_date = Some(date(2024, 1, 5));
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_completion_on_or_after_start() {
        let mut state = TrackingState::new(1);
        state.start_date = Some(date(2024, 1, 10));
        state.completion_date = Some(date(2024, 1, 10));
        assert!(state.validate().is_ok());

        state.completion_date = Some(date(2024, 1, 15));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_validate_ignores_missing_dates() {
        let mut state = TrackingState::new(1);
        assert!(state.validate().is_ok());

        state.completion_date = Some(date(2024, 1, 5));
        assert!(state.validate().is_ok(), "no start date to compare against");
    }
}
