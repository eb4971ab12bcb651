use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::api::services::polls::{
    ErrorCode, HealthResponse, HealthStorageCheck, error_response,
};
use crate::storage::PollRepository;

/// 健康检查依赖：存储句柄 + 启动时间
#[derive(Clone)]
pub struct HealthState {
    pub repository: Arc<dyn PollRepository>,
    pub backend: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl HealthState {
    pub fn new(repository: Arc<dyn PollRepository>, backend: impl Into<String>) -> Self {
        Self {
            repository,
            backend: backend.into(),
            started_at: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(state: web::Data<HealthState>) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let ping = tokio::time::timeout(Duration::from_secs(5), state.repository.ping()).await;
        let storage = match ping {
            Ok(Ok(())) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend: state.backend.clone(),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend: state.backend.clone(),
                    error: Some(e.message().to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timed out");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend: state.backend.clone(),
                    error: Some("Storage check timed out".to_string()),
                }
            }
        };

        if storage.status != "healthy" {
            let message = storage.error.as_deref().unwrap_or("Storage unavailable");
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                message,
            );
        }

        let now = chrono::Utc::now();
        HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
            uptime_secs: (now - state.started_at).num_seconds(),
            response_time_ms: start_time.elapsed().as_millis() as u64,
            storage,
        })
    }
}

/// 健康检查路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("/", web::get().to(HealthService::health_check))
}
