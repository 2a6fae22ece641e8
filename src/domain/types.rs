// ==========================================
// Seguimiento - domain type definitions
// ==========================================
// Serialization format: SCREAMING_SNAKE_CASE, matching the
// values stored by the backend.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// TrackingStatus - request lifecycle status
// ==========================================
// User-directed state machine: any status may move to any
// other by explicit action. ACTIVE is the implicit default
// for requests with no tracking row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    Active,
    Executed,
    Cancelled,
}

impl Default for TrackingStatus {
    fn default() -> Self {
        TrackingStatus::Active
    }
}

impl TrackingStatus {
    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::Active => "ACTIVE",
            TrackingStatus::Executed => "EXECUTED",
            TrackingStatus::Cancelled => "CANCELLED",
        }
    }

    /// Parse the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(TrackingStatus::Active),
            "EXECUTED" => Some(TrackingStatus::Executed),
            "CANCELLED" => Some(TrackingStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// RequestCategory - internal vs external orders
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestCategory {
    Internal,
    External,
}

impl RequestCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCategory::Internal => "INTERNAL",
            RequestCategory::External => "EXTERNAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "INTERNAL" => Some(RequestCategory::Internal),
            "EXTERNAL" => Some(RequestCategory::External),
            _ => None,
        }
    }
}

impl fmt::Display for RequestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// ConsumptionSource - ledger record origin
// ==========================================
// CONSUMABLE: stock issuance line item.
// ASSET: fixed-asset assignment line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsumptionSource {
    Consumable,
    Asset,
}

impl ConsumptionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsumptionSource::Consumable => "CONSUMABLE",
            ConsumptionSource::Asset => "ASSET",
        }
    }
}

impl fmt::Display for ConsumptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
