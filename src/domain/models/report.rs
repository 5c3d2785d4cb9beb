// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::{CrawlMode, CrawlState, CrawlStats, ResourceResult};
use crate::domain::models::resource::ResourceKind;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 汇总统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    pub total: usize,
    pub processed_success: usize,
    pub processed_error: usize,
    pub with_violations: usize,
    pub totals_by_type: BTreeMap<ResourceKind, usize>,
    /// 所有成功结果中违规词的排序去重集合
    pub forbidden_words: BTreeSet<String>,
}

/// 一次爬取任务的完整报告
///
/// 每次调用返回一个新值，不保留进程级历史
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub mode: CrawlMode,
    pub state: CrawlState,
    /// 任务因结果数上限终止时的原因
    pub abort_reason: Option<String>,
    pub crawl_stats: CrawlStats,
    #[serde(flatten)]
    pub summary: AggregateSummary,
    pub results: Vec<ResourceResult>,
}

impl CrawlReport {
    pub fn is_aborted(&self) -> bool {
        self.state == CrawlState::Aborted
    }
}
