use crate::errors::LoadBalancerError;
use crate::types::{SendingNumber, UserAssignment};
use chrono::{DateTime, Utc};
use common::{SendingNumberStatus, SharedStore};
use md5::{Digest, Md5};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Sends permitted per rolling minute, per number (§4.1).
const PER_MINUTE_LIMIT: u32 = 60;
/// Corrective-override threshold: if the consistent-hash pick is this much
/// more loaded than the least-loaded candidate, and the least-loaded has
/// slack, override the hash pick.
const LOAD_IMBALANCE_THRESHOLD: u32 = 100;
const LOAD_IMBALANCE_CAPACITY_FRACTION: f64 = 0.8;
/// error_count >= this demotes ACTIVE -> FAILED.
const FAILED_ERROR_THRESHOLD: u32 = 10;
/// error_count >= this (but below FAILED_ERROR_THRESHOLD) demotes during the health loop.
const DEMOTE_ERROR_THRESHOLD: u32 = 5;
/// error_count must decay below this to auto-recover FAILED -> ACTIVE.
const RECOVER_ERROR_THRESHOLD: u32 = 3;
/// Seconds a RATE_LIMITED number stays down before the health loop promotes it.
const REHAB_SECONDS: i64 = 60;

/// Outcome classification returned alongside the chosen number, so
/// callers can observe assignment/reassignment decisions (§4.1's
/// `getOptimalForMessage`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentReason {
    StickyAssignment,
    NewAssignment,
    ReassignedDueToRateLimit,
    ReassignedDueToFailure,
    ForcedReassignment,
}

impl AssignmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentReason::StickyAssignment => "sticky_assignment",
            AssignmentReason::NewAssignment => "new_assignment",
            AssignmentReason::ReassignedDueToRateLimit => "reassigned_due_to_rate_limit",
            AssignmentReason::ReassignedDueToFailure => "reassigned_due_to_failure",
            AssignmentReason::ForcedReassignment => "forced_reassignment",
        }
    }
}

/// Stable 32-bit hash of a user id, computed as the original implementation
/// does: an MD5 digest of the id, with the first 4 bytes read as a
/// big-endian unsigned integer (equivalent to "first 8 hex characters as
/// an integer").
pub fn hash_user_id(user_id: &str) -> u32 {
    let digest = Md5::digest(user_id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Assigns users to sending numbers with consistent hashing, enforces
/// per-number rate limits, and reassigns on failure.
///
/// The pool is the sole owner of every `SendingNumber` (see the "cyclic
/// ownership" design note); `UserAssignment`s and callers only ever carry
/// a `phone_id` and look the number up here.
pub struct LoadBalancer {
    pool: Mutex<Vec<SendingNumber>>,
    assignments: Mutex<HashMap<String, UserAssignment>>,
    store: Arc<dyn SharedStore>,
}

impl LoadBalancer {
    pub fn new(numbers: Vec<SendingNumber>, store: Arc<dyn SharedStore>) -> Self {
        Self {
            pool: Mutex::new(numbers),
            assignments: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// `assignNumber(userId, forceReassign)`.
    pub async fn assign_number(
        &self,
        user_id: &str,
        force_reassign: bool,
    ) -> Result<(SendingNumber, AssignmentReason), LoadBalancerError> {
        let now = Utc::now();
        let mut pool = self.pool.lock().await;
        let mut assignments = self.assignments.lock().await;

        let mut sticky_number_rate_limited = false;

        if !force_reassign {
            if let Some(existing) = assignments.get(user_id) {
                if let Some(number) = pool.iter_mut().find(|n| n.phone_id == existing.phone_id) {
                    if number.is_available(PER_MINUTE_LIMIT, now) {
                        number.current_load += 1;
                        let phone_id = number.phone_id.clone();
                        let chosen = number.clone();
                        drop(pool);
                        if let Some(a) = assignments.get_mut(user_id) {
                            a.last_active = now;
                        }
                        drop(assignments);
                        self.persist_assignment(user_id, &phone_id, now).await?;
                        return Ok((chosen, AssignmentReason::StickyAssignment));
                    }
                    sticky_number_rate_limited = number.is_rate_limited_now(now, PER_MINUTE_LIMIT);
                }
            }
        }

        let reason = if sticky_number_rate_limited {
            AssignmentReason::ReassignedDueToRateLimit
        } else if assignments.contains_key(user_id) {
            if force_reassign {
                AssignmentReason::ForcedReassignment
            } else {
                AssignmentReason::ReassignedDueToFailure
            }
        } else {
            AssignmentReason::NewAssignment
        };

        let chosen_phone_id = {
            let mut candidates: Vec<&mut SendingNumber> = pool
                .iter_mut()
                .filter(|n| n.is_available(PER_MINUTE_LIMIT, now))
                .collect();

            if candidates.is_empty() {
                return Err(LoadBalancerError::NoNumberAvailable);
            }

            let idx = select_index(&candidates, user_id);
            candidates[idx].current_load += 1;
            candidates[idx].phone_id.clone()
        };

        let chosen = pool
            .iter()
            .find(|n| n.phone_id == chosen_phone_id)
            .cloned()
            .expect("just selected from pool");

        assignments.insert(
            user_id.to_string(),
            UserAssignment {
                user_id: user_id.to_string(),
                phone_id: chosen_phone_id.clone(),
                assigned_at: now,
                last_active: now,
            },
        );

        drop(pool);
        drop(assignments);
        self.persist_assignment(user_id, &chosen_phone_id, now).await?;

        Ok((chosen, reason))
    }

    /// `getOptimalForMessage(userId, type, priority)`. The selection
    /// algorithm doesn't currently branch on message type/priority (the
    /// source treats all outbound sends identically for balancing
    /// purposes); the parameters are accepted for interface parity and
    /// future differentiation.
    pub async fn get_optimal_for_message(
        &self,
        user_id: &str,
        _message_type: common::MessageType,
        _priority: common::Priority,
    ) -> Result<(SendingNumber, AssignmentReason), LoadBalancerError> {
        self.assign_number(user_id, false).await
    }

    /// `recordMessageResult(userId, phone, success, errorDetails?)`.
    pub async fn record_message_result(
        &self,
        user_id: &str,
        phone_id: &str,
        success: bool,
        error_details: Option<&str>,
    ) -> Result<(), LoadBalancerError> {
        let now = Utc::now();
        let mut pool = self.pool.lock().await;
        let number = pool
            .iter_mut()
            .find(|n| n.phone_id == phone_id)
            .ok_or_else(|| LoadBalancerError::UnknownNumber(phone_id.to_string()))?;

        number.refresh_window(now);

        if success {
            number.window_count += 1;
            number.total_messages += 1;
            number.error_count = number.error_count.saturating_sub(1);
            return Ok(());
        }

        number.error_count += 1;
        let is_rate_limit = error_details
            .map(|detail| detail.to_lowercase().contains("rate limit"))
            .unwrap_or(false);
        drop(pool);

        if is_rate_limit {
            self.handle_rate_limit(user_id, phone_id).await?;
        }
        Ok(())
    }

    /// `handleRateLimit(userId, failedNumber)`. Marks the number
    /// RATE_LIMITED, reassigns the user, and schedules its automatic
    /// return to ACTIVE once the rolling window clears (driven by the
    /// health loop rather than a dedicated timer task).
    pub async fn handle_rate_limit(
        &self,
        user_id: &str,
        failed_phone_id: &str,
    ) -> Result<Option<(SendingNumber, AssignmentReason)>, LoadBalancerError> {
        let now = Utc::now();
        {
            let mut pool = self.pool.lock().await;
            if let Some(number) = pool.iter_mut().find(|n| n.phone_id == failed_phone_id) {
                number.status = SendingNumberStatus::RateLimited;
                number.rate_limited_at = Some(now);
            }
        }

        match self.assign_number(user_id, true).await {
            Ok((number, _)) => Ok(Some((number, AssignmentReason::ReassignedDueToRateLimit))),
            Err(LoadBalancerError::NoNumberAvailable) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn persist_assignment(
        &self,
        user_id: &str,
        phone_id: &str,
        now: DateTime<Utc>,
    ) -> Result<(), LoadBalancerError> {
        let key = format!("user_assignments:{user_id}");
        let value = serde_json::json!({ "phone_id": phone_id, "updated_at": now }).to_string();
        self.store
            .set_ex(&key, value.into_bytes(), Duration::from_secs(24 * 3600))
            .await?;
        Ok(())
    }

    /// Every 30 seconds: promote RATE_LIMITED -> ACTIVE when the window has
    /// cleared, demote ACTIVE -> FAILED when errors >= 5, auto-recover
    /// FAILED -> ACTIVE when errors decay below 3.
    pub async fn run_health_tick(&self) {
        let now = Utc::now();
        let mut pool = self.pool.lock().await;
        for number in pool.iter_mut() {
            number.last_health_check = now;
            match number.status {
                SendingNumberStatus::RateLimited => {
                    let cleared = number
                        .rate_limited_at
                        .map(|at| now.signed_duration_since(at).num_seconds() >= REHAB_SECONDS)
                        .unwrap_or(true);
                    if cleared {
                        number.status = SendingNumberStatus::Active;
                        number.rate_limited_at = None;
                        tracing::info!(phone_id = %number.phone_id, "number rehabilitated to ACTIVE");
                    }
                }
                SendingNumberStatus::Active => {
                    if number.error_count >= DEMOTE_ERROR_THRESHOLD {
                        number.status = SendingNumberStatus::Failed;
                        tracing::warn!(phone_id = %number.phone_id, error_count = number.error_count, "number demoted to FAILED");
                    }
                }
                SendingNumberStatus::Failed => {
                    if number.error_count < RECOVER_ERROR_THRESHOLD {
                        number.status = SendingNumberStatus::Active;
                        tracing::info!(phone_id = %number.phone_id, "number auto-recovered to ACTIVE");
                    }
                }
                SendingNumberStatus::Maintenance => {}
            }
            if number.error_count >= FAILED_ERROR_THRESHOLD {
                number.status = SendingNumberStatus::Failed;
            }
        }
    }

    /// Spawns the periodic health loop described in §4.1. Returns the
    /// `JoinHandle` so callers can cancel it during shutdown.
    pub fn spawn_health_loop(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(30));
            loop {
                interval.tick().await;
                self.run_health_tick().await;
            }
        })
    }

    pub async fn snapshot(&self) -> Vec<SendingNumber> {
        self.pool.lock().await.clone()
    }
}

/// Implements the four-step selection algorithm over an already-filtered
/// candidate set: hash, sort by (load, rate-limit counter), pick by
/// `hash mod len`, then apply the bounded corrective override.
fn select_index(candidates: &[&mut SendingNumber], user_id: &str) -> usize {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by_key(|&i| (candidates[i].current_load, candidates[i].window_count));

    let hash = hash_user_id(user_id);
    let picked_rank = (hash as usize) % order.len();
    let picked = order[picked_rank];

    let least_loaded = order[0];
    let least_loaded_load = candidates[least_loaded].current_load;
    let least_loaded_capacity_used =
        least_loaded_load as f64 / candidates[least_loaded].max_capacity.max(1) as f64;

    if candidates[picked].current_load > least_loaded_load + LOAD_IMBALANCE_THRESHOLD
        && least_loaded_capacity_used < LOAD_IMBALANCE_CAPACITY_FRACTION
    {
        least_loaded
    } else {
        picked
    }
}
