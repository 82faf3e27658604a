//! Closed tagged unions shared by all four subsystems.
//!
//! Per the "runtime-tagged message types" design note, these replace what
//! the original implementation dispatched on by string comparison with
//! proper Rust enums. Wire representations use `SCREAMING_SNAKE_CASE` to
//! match the literal names the spec and the shared-store contract use.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Text,
    Image,
    Audio,
    Video,
    Document,
    Interactive,
    Template,
    System,
}

/// Lower value sorts first: CRITICAL messages are always popped ahead of
/// everything else. Derives `Ord` off the declaration order, which is
/// exactly the 1..5 ranking the spec assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical = 1,
    High = 2,
    Normal = 3,
    Low = 4,
    Batch = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Retry,
    DeadLetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendingNumberStatus {
    Active,
    RateLimited,
    Failed,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    Healthy,
    Degraded,
    Critical,
    Emergency,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheLevel {
    L1,
    L2,
    L3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollbackType {
    Application,
    Database,
    Infrastructure,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
}

impl Comparison {
    pub fn holds(&self, observed: f64, threshold: f64) -> bool {
        match self {
            Comparison::Gt => observed > threshold,
            Comparison::Gte => observed >= threshold,
            Comparison::Lt => observed < threshold,
            Comparison::Lte => observed <= threshold,
            Comparison::Eq => (observed - threshold).abs() < f64::EPSILON,
            Comparison::Ne => (observed - threshold).abs() >= f64::EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_critical_first() {
        let mut priorities = vec![Priority::Low, Priority::Critical, Priority::Normal];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![Priority::Critical, Priority::Normal, Priority::Low]
        );
    }

    #[test]
    fn message_type_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&MessageType::Interactive).unwrap();
        assert_eq!(json, "\"INTERACTIVE\"");
    }

    #[test]
    fn comparison_gte_is_inclusive() {
        assert!(Comparison::Gte.holds(5.0, 5.0));
        assert!(!Comparison::Gt.holds(5.0, 5.0));
    }
}
