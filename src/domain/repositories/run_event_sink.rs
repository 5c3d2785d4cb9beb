// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// 一次运行的结构化事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunEvent {
    pub run_id: Uuid,
    /// 触发运行的端点，如 `multiscan`、`batch_check`
    pub endpoint: String,
    pub success: bool,
    pub duration_ms: u64,
    pub items_total: usize,
    pub items_error: usize,
    pub violations_total: usize,
}

/// 运行事件接收器特质
///
/// 运行历史的持久化由实现方决定，核心只负责发出事件
#[async_trait]
pub trait RunEventSink: Send + Sync {
    async fn record(&self, event: RunEvent);
}
