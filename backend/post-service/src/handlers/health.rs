/// Health probes for container orchestration
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;

/// Probe bodies are public; driver errors only go to the log
const STORE_UNAVAILABLE: &str = "Post store unavailable";

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize, Debug)]
pub struct ComponentCheck {
    pub status: ComponentStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Serialize, Debug)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub status: ComponentStatus,
    pub checks: HashMap<String, ComponentCheck>,
    pub timestamp: String,
}

pub async fn health_summary(service: web::Data<PostService>) -> HttpResponse {
    match service.check_store().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "post-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::error!(error = %e, "health check: post store unreachable");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": STORE_UNAVAILABLE,
                "service": "post-service"
            }))
        }
    }
}

pub async fn readiness_check(service: web::Data<PostService>) -> HttpResponse {
    let mut checks = HashMap::new();

    let start = Instant::now();
    let result = service.check_store().await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    let ready = result.is_ok();
    let store_check = match result {
        Ok(()) => ComponentCheck {
            status: ComponentStatus::Healthy,
            message: "Post store round-trip successful".to_string(),
            latency_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            ComponentCheck {
                status: ComponentStatus::Unhealthy,
                message: STORE_UNAVAILABLE.to_string(),
                latency_ms,
            }
        }
    };
    checks.insert("store".to_string(), store_check);

    let response = ReadinessResponse {
        ready,
        status: if ready {
            ComponentStatus::Healthy
        } else {
            ComponentStatus::Unhealthy
        },
        checks,
        timestamp: Utc::now().to_rfc3339(),
    };

    if ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}
