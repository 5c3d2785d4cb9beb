// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::{check_use_case::CheckUseCase, scan_use_case::ScanUseCase};
use crate::engines::traits::ResourceFetcher;
use crate::presentation::handlers::{check_handler, scan_handler};
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由，处理器所需的用例通过 [`app`] 注入
pub fn routes<F>() -> Router
where
    F: ResourceFetcher + 'static,
{
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route("/v1/stats", get(check_handler::stats::<F>));

    let api_routes = Router::new()
        .route("/v1/check", post(check_handler::check_text::<F>))
        .route("/v1/analyze", post(check_handler::analyze::<F>))
        .route("/v1/compare", post(check_handler::compare::<F>))
        .route("/v1/suggest-fixes", post(check_handler::suggest_fixes::<F>))
        .route("/v1/check-url", post(check_handler::check_url::<F>))
        .route("/v1/batch-check", post(check_handler::batch_check::<F>))
        .route("/v1/multiscan", post(scan_handler::multiscan::<F>));

    Router::new().merge(public_routes).merge(api_routes)
}

/// 组装完整应用：路由、用例注入和请求追踪
///
/// # 参数
///
/// * `scan` - 多资源扫描用例
/// * `check` - 文本/URL检查用例
pub fn app<F>(scan: Arc<ScanUseCase<F>>, check: Arc<CheckUseCase<F>>) -> Router
where
    F: ResourceFetcher + 'static,
{
    routes::<F>()
        .layer(Extension(scan))
        .layer(Extension(check))
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
