//! HTTP surface: route tables, handlers and middleware.

pub mod middleware;
pub mod services;

use std::sync::Arc;

use actix_web::web;

use crate::config::ChartConfig;
use crate::services::chart::ChartRenderer;
use crate::services::{ChartService, ExportService, ListingService, StatisticsService};
use crate::storage::PollRepository;

pub use services::{HealthState, health_routes, polls_routes};

/// 各 handler 依赖的服务，启动时构造一次，每个 worker 克隆一份 `Data` 句柄
#[derive(Clone)]
pub struct AppServices {
    statistics: web::Data<StatisticsService>,
    listing: web::Data<ListingService>,
    export: web::Data<ExportService>,
    chart: web::Data<ChartService>,
    health: web::Data<HealthState>,
}

impl AppServices {
    /// 使用默认 SVG 渲染器
    pub fn new(repository: Arc<dyn PollRepository>, backend: &str, chart: &ChartConfig) -> Self {
        let chart_service = ChartService::with_svg(repository.clone(), chart);
        Self::assemble(repository, backend, chart_service)
    }

    pub fn with_renderer(
        repository: Arc<dyn PollRepository>,
        backend: &str,
        chart: &ChartConfig,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let chart_service = ChartService::new(repository.clone(), renderer, chart);
        Self::assemble(repository, backend, chart_service)
    }

    fn assemble(
        repository: Arc<dyn PollRepository>,
        backend: &str,
        chart_service: ChartService,
    ) -> Self {
        Self {
            statistics: web::Data::new(StatisticsService::new(repository.clone())),
            listing: web::Data::new(ListingService::new(repository.clone())),
            export: web::Data::new(ExportService::new(repository.clone())),
            chart: web::Data::new(chart_service),
            health: web::Data::new(HealthState::new(repository, backend)),
        }
    }

    /// 注册服务与全部路由，server 与集成测试共用
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.statistics.clone())
            .app_data(self.listing.clone())
            .app_data(self.export.clone())
            .app_data(self.chart.clone())
            .app_data(self.health.clone())
            .service(polls_routes())
            .service(health_routes());
    }
}
