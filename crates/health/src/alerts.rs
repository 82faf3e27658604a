//! Alert engine (§4.4 "Alert engine", §3 `Alert`/`AlertRule`).
//!
//! Default rule seeding and the hourly retention sweep are grounded in
//! `real_time_monitoring.py`'s `_setup_default_alert_rules` and
//! `_metrics_cleanup_loop`/`_cleanup_old_alerts`.

use crate::collaborators::Notifier;
use crate::errors::HealthError;
use crate::types::{Alert, AlertRule, NotificationDispatch};
use chrono::{DateTime, Utc};
use common::{AlertLevel, Comparison, SharedStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const DEFAULT_COOLDOWN: Duration = Duration::from_secs(300);
/// Alert history older than this is dropped by the hourly cleanup task.
const ALERT_RETENTION: chrono::Duration = chrono::Duration::hours(72);

struct RuleState {
    rule: AlertRule,
    /// Samples observed inside the current sustain window, oldest first.
    window: Vec<(DateTime<Utc>, f64)>,
    active: Option<Alert>,
    last_fired_at: Option<DateTime<Utc>>,
}

/// Evaluates samples against configured rules, tracks the single active
/// alert per rule, and dispatches notifications for CRITICAL-level fires.
pub struct AlertEngine {
    store: Arc<dyn SharedStore>,
    notifier: Arc<dyn Notifier>,
    emergency_contacts: Vec<String>,
    rules: Mutex<HashMap<String, RuleState>>,
    history: Mutex<Vec<Alert>>,
}

impl AlertEngine {
    pub fn new(store: Arc<dyn SharedStore>, notifier: Arc<dyn Notifier>, emergency_contacts: Vec<String>) -> Self {
        let engine = Self {
            store,
            notifier,
            emergency_contacts,
            rules: Mutex::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
        };
        engine
    }

    /// Seeds the starter rule set so the system is self-monitoring out of
    /// the box (§4.4 "Supplemental default alert rules").
    pub async fn seed_default_rules(&self) {
        let defaults = [
            AlertRule {
                name: "high_error_rate".to_string(),
                metric_name: "metric:error_rate:latest".to_string(),
                condition: Comparison::Gt,
                threshold: 0.05,
                sustain: Duration::from_secs(60),
                level: AlertLevel::Error,
                cooldown: DEFAULT_COOLDOWN,
                enabled: true,
            },
            AlertRule {
                name: "queue_backup".to_string(),
                metric_name: "metric:queue_depth:latest".to_string(),
                condition: Comparison::Gt,
                threshold: 1000.0,
                sustain: Duration::from_secs(60),
                level: AlertLevel::Error,
                cooldown: DEFAULT_COOLDOWN,
                enabled: true,
            },
            AlertRule {
                name: "low_cache_hit_rate".to_string(),
                metric_name: "metric:cache_hit_rate:latest".to_string(),
                condition: Comparison::Lt,
                threshold: 0.7,
                sustain: Duration::from_secs(300),
                level: AlertLevel::Warning,
                cooldown: DEFAULT_COOLDOWN,
                enabled: true,
            },
            AlertRule {
                name: "high_response_time".to_string(),
                metric_name: "metric:queue_avg_processing_ms:latest".to_string(),
                condition: Comparison::Gt,
                threshold: 5000.0,
                sustain: Duration::from_secs(120),
                level: AlertLevel::Error,
                cooldown: DEFAULT_COOLDOWN,
                enabled: true,
            },
        ];
        let mut rules = self.rules.lock().await;
        for rule in defaults {
            rules.insert(
                rule.name.clone(),
                RuleState { rule, window: Vec::new(), active: None, last_fired_at: None },
            );
        }
    }

    pub async fn add_rule(&self, rule: AlertRule) {
        let mut rules = self.rules.lock().await;
        rules.insert(rule.name.clone(), RuleState { rule, window: Vec::new(), active: None, last_fired_at: None });
    }

    pub async fn set_enabled(&self, rule_name: &str, enabled: bool) -> Result<(), HealthError> {
        let mut rules = self.rules.lock().await;
        let state = rules.get_mut(rule_name).ok_or_else(|| HealthError::UnknownRule(rule_name.to_string()))?;
        state.rule.enabled = enabled;
        Ok(())
    }

    /// Evaluates every rule whose `metric_name` matches `metric`, called
    /// whenever a fresh sample arrives (§4.4).
    pub async fn record_sample(&self, metric: &str, value: f64) {
        let now = Utc::now();
        let mut rules = self.rules.lock().await;
        for state in rules.values_mut() {
            if state.rule.metric_name != metric || !state.rule.enabled {
                continue;
            }
            self.evaluate_rule(state, value, now).await;
        }
    }

    async fn evaluate_rule(&self, state: &mut RuleState, value: f64, now: DateTime<Utc>) {
        let holds = state.rule.condition.holds(value, state.rule.threshold);

        if !holds {
            state.window.clear();
            if let Some(active) = state.active.take() {
                self.resolve(state, active, now).await;
            }
            return;
        }

        state.window.retain(|(at, _)| now.signed_duration_since(*at) <= chrono_duration(state.rule.sustain));
        state.window.push((now, value));

        if state.active.is_some() {
            return;
        }

        let sustained = state
            .window
            .first()
            .map(|(first_at, _)| now.signed_duration_since(*first_at) >= chrono_duration(state.rule.sustain))
            .unwrap_or(false);
        if !sustained {
            return;
        }

        if let Some(last_fired) = state.last_fired_at {
            if now.signed_duration_since(last_fired) < chrono_duration(state.rule.cooldown) {
                return;
            }
        }

        let alert = Alert {
            rule_name: state.rule.name.clone(),
            level: state.rule.level,
            observed_value: value,
            threshold: state.rule.threshold,
            fired_at: now,
            resolved: false,
            resolved_at: None,
        };
        state.active = Some(alert.clone());
        state.last_fired_at = Some(now);
        self.history.lock().await.push(alert.clone());

        let _ = self
            .store
            .set_ex(
                &format!("alert:{}:{}", now.timestamp(), state.rule.name),
                serde_json::to_vec(&alert).unwrap_or_default(),
                Duration::from_secs(ALERT_RETENTION.num_seconds() as u64),
            )
            .await;

        tracing::warn!(rule = %alert.rule_name, level = ?alert.level, value, threshold = alert.threshold, "alert fired");

        if alert.level == AlertLevel::Critical {
            self.dispatch_notifications(&alert).await;
        }
    }

    async fn resolve(&self, state: &mut RuleState, mut alert: Alert, now: DateTime<Utc>) {
        alert.resolved = true;
        alert.resolved_at = Some(now);
        tracing::info!(rule = %alert.rule_name, "alert auto-resolved");
        let mut history = self.history.lock().await;
        if let Some(existing) = history.iter_mut().rev().find(|a| a.rule_name == alert.rule_name && !a.resolved) {
            existing.resolved = true;
            existing.resolved_at = Some(now);
        }
    }

    /// Dispatches a `NotificationDispatch` per configured emergency
    /// contact. Used both for CRITICAL-level alert fires and directly by
    /// the controller on EMERGENCY transitions.
    pub async fn dispatch_notifications(&self, alert: &Alert) {
        for contact in &self.emergency_contacts {
            let dispatch = NotificationDispatch {
                contact: contact.clone(),
                channel: "default".to_string(),
                alert_rule_name: alert.rule_name.clone(),
                dispatched_at: Utc::now(),
            };
            if let Err(e) = self.notifier.notify(contact, alert).await {
                tracing::error!(contact, error = %e, "notification dispatch failed");
            } else {
                tracing::info!(?dispatch, "notification dispatched");
            }
        }
    }

    pub async fn unresolved(&self) -> Vec<Alert> {
        self.history.lock().await.iter().filter(|a| !a.resolved).cloned().collect()
    }

    /// Hourly retention sweep (§4.4, grounded in `_cleanup_old_alerts`).
    pub async fn cleanup_old_alerts(&self) {
        let cutoff = Utc::now() - ALERT_RETENTION;
        let mut history = self.history.lock().await;
        history.retain(|a| a.fired_at > cutoff);
    }
}

fn chrono_duration(d: Duration) -> chrono::Duration {
    chrono::Duration::from_std(d).unwrap_or(chrono::Duration::zero())
}
