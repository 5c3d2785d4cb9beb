// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 按资源类型和结果计数的已处理资源数
pub const RESOURCES_PROCESSED: &str = "lawscan_resources_processed_total";
/// 因结果数上限终止的任务数
pub const CRAWL_ABORTS: &str = "lawscan_crawl_aborts_total";
/// 完成的任务数（按端点）
pub const RUNS_TOTAL: &str = "lawscan_runs_total";
/// 任务耗时
pub const RUN_DURATION: &str = "lawscan_run_duration_seconds";

/// 初始化 Prometheus 导出器
///
/// 监听地址无效或端口被占用时只记录警告，不影响服务启动
pub fn init_metrics(listen: &str) {
    let addr: SocketAddr = match listen.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen, e);
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!(
        RESOURCES_PROCESSED,
        "Resources processed, labelled by kind and outcome"
    );
    describe_counter!(CRAWL_ABORTS, "Crawls terminated by the URL limit");
    describe_counter!(RUNS_TOTAL, "Completed runs, labelled by endpoint");
    describe_histogram!(RUN_DURATION, "Duration of runs in seconds");

    info!("Metrics exporter listening on {}", addr);
}
