// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::run_event_sink::{RunEvent, RunEventSink};
use async_trait::async_trait;
use tracing::info;

/// 将运行事件写入日志的接收器
#[derive(Debug, Clone, Default)]
pub struct TracingRunEventSink;

#[async_trait]
impl RunEventSink for TracingRunEventSink {
    async fn record(&self, event: RunEvent) {
        info!(
            run_id = %event.run_id,
            endpoint = %event.endpoint,
            success = event.success,
            duration_ms = event.duration_ms,
            items_total = event.items_total,
            items_error = event.items_error,
            violations_total = event.violations_total,
            "run finished"
        );
    }
}
