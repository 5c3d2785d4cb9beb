// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{
    application::dto::{
        scan_request::{
            AnalyzeTextRequestDto, BatchCheckRequestDto, CheckTextRequestDto,
            CheckUrlRequestDto, CompareTextsRequestDto, SuggestFixesRequestDto,
        },
        scan_response::{
            AnalyzeTextResponse, BatchCheckResponse, CheckTextResponse, CheckUrlResponse,
            CompareTextsResponse, Recommendation, RecommendationLevel, StatsResponse,
            SuggestFixesResponse, TextComparison, TextDifference,
        },
    },
    config::settings::CrawlSettings,
    domain::{
        models::{
            classification::ClassificationResult,
            crawl::{CrawlLimits, ResourceMeta, ResourceResult},
            resource::{ResourceKind, ResourceRef},
        },
        repositories::run_event_sink::{RunEvent, RunEventSink},
        services::{
            crawl_service::CrawlService,
            lexical_classifier::LexicalClassifier,
            text_analytics::{self, TextAnalysis},
        },
    },
    engines::traits::{FetchError, ResourceFetcher},
    infrastructure::metrics::{RUNS_TOTAL, RUN_DURATION},
    utils::{
        errors::{RequestError, ResourceError},
        url_utils::normalize_http_url,
    },
};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use metrics::{counter, histogram};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const BATCH_ENDPOINT: &str = "batch_check";
const MAX_SUGGESTED_WORDS: usize = 50;

#[derive(Error, Debug)]
pub enum CheckUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// 根据分类结果生成修改建议
///
/// 脏话为 critical，拉丁字母为 warning，未知词为 info，合规时只有一条 success
pub fn recommendations(result: &ClassificationResult) -> Vec<Recommendation> {
    let mut items = Vec::new();

    let profanity = result.profanity_words().len();
    if profanity > 0 {
        items.push(Recommendation {
            level: RecommendationLevel::Critical,
            title: "Profanity".to_string(),
            message: format!(
                "Found {} profane word(s). Remove or replace every one of them.",
                profanity
            ),
        });
    }

    let latin = result.latin_words().len();
    if latin > 0 {
        items.push(Recommendation {
            level: RecommendationLevel::Warning,
            title: "Latin script".to_string(),
            message: format!(
                "Found {} word(s) in Latin script. Replace them with Russian equivalents or add a Russian explanation.",
                latin
            ),
        });
    }

    let unknown = result.unknown_words().len();
    if unknown > 0 {
        items.push(Recommendation {
            level: RecommendationLevel::Info,
            title: "Unknown words".to_string(),
            message: format!(
                "Found {} word(s) missing from the dictionaries. Check spelling or use established terms.",
                unknown
            ),
        });
    }

    if result.law_compliant() {
        items.push(Recommendation {
            level: RecommendationLevel::Success,
            title: "Compliant".to_string(),
            message: "No violations found.".to_string(),
        });
    }

    items
}

/// 文本、单个URL和批量URL检查用例
pub struct CheckUseCase<F: ResourceFetcher> {
    service: CrawlService<F>,
    classifier: LexicalClassifier,
    settings: CrawlSettings,
    events: Arc<dyn RunEventSink>,
}

impl<F: ResourceFetcher + 'static> CheckUseCase<F> {
    pub fn new(
        fetcher: Arc<F>,
        classifier: LexicalClassifier,
        settings: CrawlSettings,
        events: Arc<dyn RunEventSink>,
    ) -> Self {
        Self {
            service: CrawlService::new(fetcher, classifier.clone()),
            classifier,
            settings,
            events,
        }
    }

    /// 单资源检查使用的限制：不限结果数，不延迟
    fn limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_text_chars: self.settings.max_text_chars,
            timeout: Duration::from_secs(self.settings.default_timeout_sec),
            inter_request_delay_ms: 0,
            max_download_bytes: self.settings.max_download_bytes,
            ..CrawlLimits::default()
        }
    }

    pub fn check_text(
        &self,
        dto: CheckTextRequestDto,
    ) -> Result<CheckTextResponse, CheckUseCaseError> {
        dto.validate()
            .map_err(|e| CheckUseCaseError::ValidationError(e.to_string()))?;
        if dto.text.trim().is_empty() {
            return Err(CheckUseCaseError::ValidationError(
                "text cannot be empty".to_string(),
            ));
        }

        let result = self.classifier.classify(&dto.text);
        let recommendations = recommendations(&result);

        Ok(CheckTextResponse {
            success: true,
            check_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            result,
            recommendations,
        })
    }

    /// 检查文本并附加可读性、词频和复杂度统计
    pub fn analyze(
        &self,
        dto: AnalyzeTextRequestDto,
    ) -> Result<AnalyzeTextResponse, CheckUseCaseError> {
        dto.validate()
            .map_err(|e| CheckUseCaseError::ValidationError(e.to_string()))?;
        if dto.text.trim().is_empty() {
            return Err(CheckUseCaseError::ValidationError(
                "text cannot be empty".to_string(),
            ));
        }

        let result = self.classifier.classify(&dto.text);
        let recommendations = recommendations(&result);

        Ok(AnalyzeTextResponse {
            success: true,
            analysis: TextAnalysis::of(&dto.text),
            result,
            recommendations,
        })
    }

    /// 对比两段文本的违规数；空文本按无违规处理
    pub fn compare(&self, dto: CompareTextsRequestDto) -> CompareTextsResponse {
        let before = self.classifier.classify(&dto.text1);
        let after = self.classifier.classify(&dto.text2);
        let (v1, v2) = (before.violations_count(), after.violations_count());

        CompareTextsResponse {
            success: true,
            comparison: TextComparison {
                difference: TextDifference {
                    violations_delta: v2 as i64 - v1 as i64,
                    improved: v2 < v1,
                    improvement_percent: text_analytics::improvement_percent(v1, v2),
                },
                text1: before,
                text2: after,
            },
        }
    }

    /// 替换建议，最多处理前 50 个词
    pub fn suggest_fixes(&self, dto: SuggestFixesRequestDto) -> SuggestFixesResponse {
        let dictionary = self.classifier.dictionary();
        let suggestions: BTreeMap<String, Vec<String>> = dto
            .words
            .into_iter()
            .take(MAX_SUGGESTED_WORDS)
            .map(|word| {
                let items = text_analytics::suggestions(&word, dictionary);
                (word, items)
            })
            .collect();

        SuggestFixesResponse {
            success: true,
            suggestions,
        }
    }

    /// 检查单个页面；获取或提取失败体现在结果中，不作为请求错误
    pub async fn check_url(
        &self,
        dto: CheckUrlRequestDto,
    ) -> Result<CheckUrlResponse, CheckUseCaseError> {
        dto.validate()
            .map_err(|e| CheckUseCaseError::ValidationError(e.to_string()))?;
        let url = normalize_http_url(&dto.url)
            .ok_or_else(|| RequestError::InvalidUrl(dto.url.clone()))?;

        let result = self.service.check_resource(&url, &self.limits()).await;
        let recommendations = result
            .classification()
            .map(recommendations)
            .unwrap_or_default();

        Ok(CheckUrlResponse {
            success: result.is_success(),
            url: url.to_string(),
            timestamp: Utc::now(),
            result,
            recommendations,
        })
    }

    /// 批量检查
    ///
    /// 最多检查 `batch_max_urls` 个URL，以 `batch_concurrency` 的并发度执行，
    /// 结果顺序与输入一致。无法解析的URL记为失败结果。
    pub async fn batch_check(
        &self,
        dto: BatchCheckRequestDto,
    ) -> Result<BatchCheckResponse, CheckUseCaseError> {
        let started = Instant::now();
        let lines = dto.urls.into_lines();
        if lines.is_empty() {
            return Err(RequestError::MissingUrls.into());
        }

        let total = lines.len();
        let limits = self.limits();
        let concurrency = self.settings.batch_concurrency.max(1);

        let results: Vec<ResourceResult> = stream::iter(
            lines.into_iter().take(self.settings.batch_max_urls),
        )
        .map(|line| {
            let limits = &limits;
            async move {
                match normalize_http_url(&line) {
                    Some(url) => self.service.check_resource(&url, limits).await,
                    None => ResourceResult::failure(
                        ResourceRef::new(line.clone(), ResourceKind::Page),
                        &ResourceError::Fetch(FetchError::InvalidUrl(line)),
                        ResourceMeta::default(),
                    ),
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

        let run_id = Uuid::new_v4();
        let duration_ms = started.elapsed().as_millis() as u64;
        let items_error = results.iter().filter(|r| !r.is_success()).count();
        let violations_total = results.iter().filter(|r| r.has_violations()).count();

        counter!(RUNS_TOTAL, "endpoint" => BATCH_ENDPOINT).increment(1);
        histogram!(RUN_DURATION, "endpoint" => BATCH_ENDPOINT).record(duration_ms as f64 / 1000.0);
        self.events
            .record(RunEvent {
                run_id,
                endpoint: BATCH_ENDPOINT.to_string(),
                success: true,
                duration_ms,
                items_total: results.len(),
                items_error,
                violations_total,
            })
            .await;
        info!(run_id = %run_id, total, checked = results.len(), items_error, "Batch check finished");

        Ok(BatchCheckResponse {
            success: true,
            run_id,
            total,
            checked: results.len(),
            timestamp: Utc::now(),
            results,
        })
    }

    pub fn stats(&self) -> StatsResponse {
        StatsResponse {
            dictionary: self.classifier.dictionary().stats(),
            morph_available: self.classifier.morph_available(),
        }
    }
}

#[cfg(test)]
#[path = "check_use_case_test.rs"]
mod tests;
