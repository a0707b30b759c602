//! Server Metrics — Lightweight request/economy metrics with Prometheus + JSON export
//!
//! Uses lock-free atomics for all counters. No external metrics crate needed.
//!
//! ## Endpoints
//! - `GET /metrics` — Prometheus text format (for Grafana/Prometheus scraping)
//! - `GET /metrics/json` — JSON format (for ops tooling)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::api::ApiState;

/// Shared metrics state (all lock-free atomics)
#[derive(Debug)]
pub struct ServerMetrics {
    /// Total HTTP requests served
    pub total_requests: AtomicU64,
    /// Total request errors (4xx + 5xx)
    pub total_errors: AtomicU64,
    /// Cumulative request duration in microseconds (for computing average)
    pub total_duration_us: AtomicU64,
    /// Damage events ingested
    pub damage_events: AtomicU64,
    /// Items produced by the drop gate
    pub items_dropped: AtomicU64,
    /// Paid gacha draws performed
    pub gacha_pulls: AtomicU64,
    /// Successful crafts
    pub crafts_completed: AtomicU64,
    /// Marketplace listings created
    pub listings_created: AtomicU64,
    /// Marketplace purchases completed
    pub trades_completed: AtomicU64,
    /// Server start time (for uptime calculation)
    pub start_time: Instant,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_errors: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
            damage_events: AtomicU64::new(0),
            items_dropped: AtomicU64::new(0),
            gacha_pulls: AtomicU64::new(0),
            crafts_completed: AtomicU64::new(0),
            listings_created: AtomicU64::new(0),
            trades_completed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record_request(&self, duration_us: u64, is_error: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us.fetch_add(duration_us, Ordering::Relaxed);
        if is_error {
            self.total_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    pub fn requests_per_second(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed) as f64;
        let uptime = self.uptime_secs();
        if uptime > 0.0 {
            total / uptime
        } else {
            0.0
        }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        let total = self.total_requests.load(Ordering::Relaxed);
        let dur_us = self.total_duration_us.load(Ordering::Relaxed);
        if total > 0 {
            (dur_us as f64 / total as f64) / 1000.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Axum Middleware — Automatic request tracking
// ============================================================================

/// Middleware that records request count and duration for every HTTP request.
pub async fn metrics_middleware(
    State(state): State<ApiState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let resp = next.run(req).await;
    let duration_us = start.elapsed().as_micros() as u64;
    let is_error = resp.status().is_client_error() || resp.status().is_server_error();

    state.metrics.record_request(duration_us, is_error);
    resp
}

// ============================================================================
// GET /metrics — Prometheus text exposition format
// ============================================================================

pub async fn prometheus_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let m = &state.metrics;
    let total_requests = m.total_requests.load(Ordering::Relaxed);
    let total_errors = m.total_errors.load(Ordering::Relaxed);
    let total_dur_us = m.total_duration_us.load(Ordering::Relaxed);
    let uptime = m.uptime_secs();
    let rps = m.requests_per_second();

    let avg_req_duration_s = if total_requests > 0 {
        (total_dur_us as f64 / total_requests as f64) / 1_000_000.0
    } else {
        0.0
    };

    let damage_events = m.damage_events.load(Ordering::Relaxed);
    let items_dropped = m.items_dropped.load(Ordering::Relaxed);
    let gacha_pulls = m.gacha_pulls.load(Ordering::Relaxed);
    let crafts = m.crafts_completed.load(Ordering::Relaxed);
    let listings = m.listings_created.load(Ordering::Relaxed);
    let trades = m.trades_completed.load(Ordering::Relaxed);

    let body = format!(
        "# HELP starforge_requests_total Total HTTP requests served\n\
         # TYPE starforge_requests_total counter\n\
         starforge_requests_total {total_requests}\n\
         \n\
         # HELP starforge_request_errors_total Total HTTP request errors (4xx/5xx)\n\
         # TYPE starforge_request_errors_total counter\n\
         starforge_request_errors_total {total_errors}\n\
         \n\
         # HELP starforge_request_duration_seconds Average request duration\n\
         # TYPE starforge_request_duration_seconds gauge\n\
         starforge_request_duration_seconds {avg_req_duration_s:.6}\n\
         \n\
         # HELP starforge_requests_per_second Current request throughput\n\
         # TYPE starforge_requests_per_second gauge\n\
         starforge_requests_per_second {rps:.2}\n\
         \n\
         # HELP starforge_uptime_seconds Server uptime\n\
         # TYPE starforge_uptime_seconds counter\n\
         starforge_uptime_seconds {uptime:.0}\n\
         \n\
         # HELP starforge_damage_events_total Damage events ingested\n\
         # TYPE starforge_damage_events_total counter\n\
         starforge_damage_events_total {damage_events}\n\
         \n\
         # HELP starforge_items_dropped_total Items produced by the drop gate\n\
         # TYPE starforge_items_dropped_total counter\n\
         starforge_items_dropped_total {items_dropped}\n\
         \n\
         # HELP starforge_gacha_pulls_total Paid gacha draws performed\n\
         # TYPE starforge_gacha_pulls_total counter\n\
         starforge_gacha_pulls_total {gacha_pulls}\n\
         \n\
         # HELP starforge_crafts_total Successful crafts\n\
         # TYPE starforge_crafts_total counter\n\
         starforge_crafts_total {crafts}\n\
         \n\
         # HELP starforge_listings_created_total Marketplace listings created\n\
         # TYPE starforge_listings_created_total counter\n\
         starforge_listings_created_total {listings}\n\
         \n\
         # HELP starforge_trades_total Marketplace purchases completed\n\
         # TYPE starforge_trades_total counter\n\
         starforge_trades_total {trades}\n"
    );

    (
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

// ============================================================================
// GET /metrics/json — JSON snapshot
// ============================================================================

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub requests_per_second: f64,
    pub avg_duration_ms: f64,
    pub damage_events: u64,
    pub items_dropped: u64,
    pub gacha_pulls: u64,
    pub crafts_completed: u64,
    pub listings_created: u64,
    pub trades_completed: u64,
}

pub async fn json_metrics_handler(State(state): State<ApiState>) -> Json<MetricsSnapshot> {
    let m = &state.metrics;
    Json(MetricsSnapshot {
        uptime_secs: m.uptime_secs(),
        total_requests: m.total_requests.load(Ordering::Relaxed),
        total_errors: m.total_errors.load(Ordering::Relaxed),
        requests_per_second: m.requests_per_second(),
        avg_duration_ms: m.avg_duration_ms(),
        damage_events: m.damage_events.load(Ordering::Relaxed),
        items_dropped: m.items_dropped.load(Ordering::Relaxed),
        gacha_pulls: m.gacha_pulls.load(Ordering::Relaxed),
        crafts_completed: m.crafts_completed.load(Ordering::Relaxed),
        listings_created: m.listings_created.load(Ordering::Relaxed),
        trades_completed: m.trades_completed.load(Ordering::Relaxed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_accumulates() {
        let metrics = ServerMetrics::default();
        metrics.record_request(1_000, false);
        metrics.record_request(3_000, true);

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.total_errors.load(Ordering::Relaxed), 1);
        assert!((metrics.avg_duration_ms() - 2.0).abs() < 1e-9);
    }
}
