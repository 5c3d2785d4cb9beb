// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::ResourceResult;
use crate::domain::models::report::AggregateSummary;

/// 结果汇总器
///
/// 只做增量累加，不会重新计算或重复汇总同一资源
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<ResourceResult>,
    summary: AggregateSummary,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ResourceResult) {
        let summary = &mut self.summary;
        summary.total += 1;
        *summary.totals_by_type.entry(result.kind()).or_insert(0) += 1;

        match result.classification() {
            Some(classification) => {
                summary.processed_success += 1;
                if classification.violations_count() > 0 {
                    summary.with_violations += 1;
                    summary.forbidden_words.extend(classification.forbidden_words());
                }
            }
            None => summary.processed_error += 1,
        }

        self.results.push(result);
    }

    /// 已记录的结果数
    pub fn recorded(&self) -> usize {
        self.results.len()
    }

    pub fn into_parts(self) -> (Vec<ResourceResult>, AggregateSummary) {
        (self.results, self.summary)
    }
}
