use chrono::{DateTime, Utc};
use common::SendingNumberStatus;
use serde::{Deserialize, Serialize};

/// Opaque credentials for a sending identity. The fields are never
/// interpreted by the balancer itself; it only ever forwards them to the
/// outbound send collaborator (`whatsapp_client`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendingCredentials {
    pub id: String,
    pub account_id: String,
    pub token: String,
}

/// One WhatsApp Business sending identity with capacity and rate-limit
/// state. The pool (`LoadBalancer`) is the sole owner of every
/// `SendingNumber`; everything else (assignments, callers) references it
/// only by `phone_id` and dereferences on demand, per the "cyclic
/// ownership" design note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendingNumber {
    pub phone_id: String,
    pub credentials: SendingCredentials,
    pub display_name: String,
    pub status: SendingNumberStatus,
    pub current_load: u32,
    pub max_capacity: u32,
    /// Sends recorded in the current rate-limit window.
    pub window_count: u32,
    pub window_start: DateTime<Utc>,
    pub error_count: u32,
    pub total_messages: u64,
    pub last_health_check: DateTime<Utc>,
    /// Set when the number is marked RATE_LIMITED; the health loop
    /// promotes it back to ACTIVE once `now >= rate_limited_at + 60s`.
    pub rate_limited_at: Option<DateTime<Utc>>,
}

impl SendingNumber {
    pub fn new(phone_id: impl Into<String>, credentials: SendingCredentials, max_capacity: u32) -> Self {
        let now = Utc::now();
        Self {
            phone_id: phone_id.into(),
            credentials,
            display_name: String::new(),
            status: SendingNumberStatus::Active,
            current_load: 0,
            max_capacity,
            window_count: 0,
            window_start: now,
            error_count: 0,
            total_messages: 0,
            last_health_check: now,
            rate_limited_at: None,
        }
    }

    /// Resets the rolling per-minute send counter if the window has
    /// elapsed. Called lazily before every window-sensitive read.
    pub fn refresh_window(&mut self, now: DateTime<Utc>) {
        if now.signed_duration_since(self.window_start).num_seconds() >= 60 {
            self.window_count = 0;
            self.window_start = now;
        }
    }

    pub fn is_rate_limited_now(&self, now: DateTime<Utc>, per_minute_limit: u32) -> bool {
        let elapsed = now.signed_duration_since(self.window_start).num_seconds();
        elapsed < 60 && self.window_count >= per_minute_limit
    }

    pub fn is_available(&self, per_minute_limit: u32, now: DateTime<Utc>) -> bool {
        self.status == SendingNumberStatus::Active
            && self.current_load < self.max_capacity
            && !self.is_rate_limited_now(now, per_minute_limit)
            && self.error_count < 10
    }
}

/// Durable user → sending-number mapping used for stickiness. Persisted
/// under the `user_assignments` namespace with a 24h inactivity expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAssignment {
    pub user_id: String,
    pub phone_id: String,
    pub assigned_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}
