// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::crawl::ResourceResult;
use crate::domain::models::dictionary::DictionaryStats;
use crate::domain::models::report::CrawlReport;
use crate::domain::services::text_analytics::TextAnalysis;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// 阶段耗时（毫秒）
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TimingsMs {
    pub validate: u64,
    pub crawl: u64,
    pub total: u64,
}

/// 多资源扫描响应
///
/// 资源级失败嵌入在结果中，任务本身始终 `success: true`
#[derive(Debug, Serialize)]
pub struct MultiscanResponse {
    pub success: bool,
    pub run_id: Uuid,
    pub provider: String,
    pub model: Option<String>,
    #[serde(flatten)]
    pub report: CrawlReport,
    pub timings_ms: TimingsMs,
}

/// 建议级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationLevel {
    Critical,
    Warning,
    Info,
    Success,
}

/// 修改建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub title: String,
    pub message: String,
}

/// 文本检查响应
#[derive(Debug, Serialize)]
pub struct CheckTextResponse {
    pub success: bool,
    pub check_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub result: ClassificationResult,
    pub recommendations: Vec<Recommendation>,
}

/// 单个URL检查响应
#[derive(Debug, Serialize)]
pub struct CheckUrlResponse {
    pub success: bool,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub result: ResourceResult,
    pub recommendations: Vec<Recommendation>,
}

/// 批量检查响应，结果顺序与输入一致
#[derive(Debug, Serialize)]
pub struct BatchCheckResponse {
    pub success: bool,
    pub run_id: Uuid,
    /// 请求中的URL数（截断前）
    pub total: usize,
    pub checked: usize,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<ResourceResult>,
}

/// 词典统计响应
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub dictionary: DictionaryStats,
    pub morph_available: bool,
}

/// 文本详细分析响应
#[derive(Debug, Serialize)]
pub struct AnalyzeTextResponse {
    pub success: bool,
    pub result: ClassificationResult,
    pub analysis: TextAnalysis,
    pub recommendations: Vec<Recommendation>,
}

/// 对比结果：正的 `violations_delta` 表示第二段文本违规更多
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDifference {
    pub violations_delta: i64,
    pub improved: bool,
    pub improvement_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct TextComparison {
    pub text1: ClassificationResult,
    pub text2: ClassificationResult,
    pub difference: TextDifference,
}

/// 文本对比响应
#[derive(Debug, Serialize)]
pub struct CompareTextsResponse {
    pub success: bool,
    pub comparison: TextComparison,
}

/// 替换建议响应，键为请求中的原词
#[derive(Debug, Serialize)]
pub struct SuggestFixesResponse {
    pub success: bool,
    pub suggestions: BTreeMap<String, Vec<String>>,
}
