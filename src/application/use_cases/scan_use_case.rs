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
        scan_request::MultiscanRequestDto,
        scan_response::{MultiscanResponse, TimingsMs},
    },
    config::settings::CrawlSettings,
    domain::{
        models::{crawl::CrawlLimits, crawl::CrawlMode, report::CrawlReport},
        repositories::run_event_sink::{RunEvent, RunEventSink},
        services::{
            crawl_service::CrawlService, extractors::ImageExtractor,
            lexical_classifier::LexicalClassifier,
        },
    },
    engines::{
        ocr::{OcrProvider, OcrRouter},
        traits::ResourceFetcher,
    },
    infrastructure::metrics::{RUNS_TOTAL, RUN_DURATION},
    utils::{errors::RequestError, url_utils::normalize_http_url},
};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const ENDPOINT: &str = "multiscan";

#[derive(Error, Debug)]
pub enum ScanUseCaseError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("OCR provider {0} is not configured")]
    ProviderUnavailable(OcrProvider),
}

/// 扫描目标，请求校验通过后才会构造
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanTarget {
    Site(url::Url),
    Urls(Vec<url::Url>),
}

impl ScanTarget {
    fn from_request(dto: &MultiscanRequestDto) -> Result<Self, RequestError> {
        match dto.mode {
            CrawlMode::Site => {
                let raw = dto
                    .site_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(RequestError::MissingUrls)?;
                normalize_http_url(raw)
                    .map(ScanTarget::Site)
                    .ok_or_else(|| RequestError::InvalidUrl(raw.to_string()))
            }
            CrawlMode::Urls => {
                let lines = dto.urls.clone().unwrap_or_default().into_lines();
                if lines.is_empty() {
                    return Err(RequestError::MissingUrls);
                }
                lines
                    .iter()
                    .map(|line| {
                        normalize_http_url(line).ok_or_else(|| RequestError::InvalidUrl(line.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(ScanTarget::Urls)
            }
        }
    }
}

/// 取值截断到 `[1, hard]`
fn bounded(value: usize, hard: usize) -> usize {
    value.min(hard).max(1)
}

/// 将请求中的限制与配置合并
///
/// 缺省取配置默认值，超出硬上限时截断到硬上限
pub fn resolve_limits(dto: &MultiscanRequestDto, settings: &CrawlSettings) -> CrawlLimits {
    CrawlLimits {
        max_urls: bounded(
            dto.max_urls.unwrap_or(settings.default_max_urls),
            settings.max_urls_hard,
        ),
        max_pages: bounded(
            dto.max_pages.unwrap_or(settings.default_max_pages),
            settings.max_pages_hard,
        ),
        max_resources: dto
            .max_resources
            .unwrap_or(settings.default_max_resources)
            .min(settings.max_resources_hard),
        max_text_chars: bounded(
            dto.max_text_chars.unwrap_or(settings.max_text_chars),
            settings.max_text_chars,
        ),
        timeout: Duration::from_secs(dto.timeout_sec.unwrap_or(settings.default_timeout_sec)),
        inter_request_delay_ms: dto.delay_ms.unwrap_or(settings.default_delay_ms),
        include_external: dto.include_external.unwrap_or(false),
        max_download_bytes: settings.max_download_bytes,
    }
}

/// 多资源扫描用例
///
/// 校验请求、组装一次性的爬取服务并执行，最后发出运行事件
pub struct ScanUseCase<F: ResourceFetcher> {
    fetcher: Arc<F>,
    classifier: LexicalClassifier,
    ocr: OcrRouter,
    settings: CrawlSettings,
    default_api_key: Option<String>,
    events: Arc<dyn RunEventSink>,
}

impl<F: ResourceFetcher + 'static> ScanUseCase<F> {
    pub fn new(
        fetcher: Arc<F>,
        classifier: LexicalClassifier,
        ocr: OcrRouter,
        settings: CrawlSettings,
        default_api_key: Option<String>,
        events: Arc<dyn RunEventSink>,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            ocr,
            settings,
            default_api_key,
            events,
        }
    }

    pub async fn multiscan(
        &self,
        dto: MultiscanRequestDto,
    ) -> Result<MultiscanResponse, ScanUseCaseError> {
        let started = Instant::now();

        // 1. Validate request before any network activity
        dto.validate()
            .map_err(|e| ScanUseCaseError::ValidationError(e.to_string()))?;

        let provider_name = dto
            .provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ScanUseCaseError::ValidationError("provider is required".to_string()))?;
        let provider: OcrProvider = provider_name
            .parse()
            .map_err(|_| RequestError::UnknownProvider(provider_name.to_string()))?;
        let engine = self
            .ocr
            .get(provider)
            .ok_or(ScanUseCaseError::ProviderUnavailable(provider))?;

        let target = ScanTarget::from_request(&dto)?;
        let limits = resolve_limits(&dto, &self.settings);
        let validate_ms = started.elapsed().as_millis() as u64;

        // 2. Assemble a crawl service for this run
        let api_key = dto
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.default_api_key.clone())
            .unwrap_or_default();
        let images = ImageExtractor::new(engine, dto.model.clone(), api_key);
        let service = CrawlService::new(self.fetcher.clone(), self.classifier.clone())
            .with_image_extractor(images);

        // 3. Crawl
        let crawl_started = Instant::now();
        let report = match &target {
            ScanTarget::Site(seed) => service.run_site(seed, &limits).await,
            ScanTarget::Urls(urls) => service.run_urls(urls, &limits).await,
        };
        let crawl_ms = crawl_started.elapsed().as_millis() as u64;

        let run_id = Uuid::new_v4();
        let total_ms = started.elapsed().as_millis() as u64;
        self.emit(run_id, &report, total_ms).await;

        info!(
            run_id = %run_id,
            provider = %provider,
            state = %report.state,
            total = report.summary.total,
            "Multiscan finished in {}ms",
            total_ms
        );

        Ok(MultiscanResponse {
            success: true,
            run_id,
            provider: provider.to_string(),
            model: dto.model,
            report,
            timings_ms: TimingsMs {
                validate: validate_ms,
                crawl: crawl_ms,
                total: total_ms,
            },
        })
    }

    async fn emit(&self, run_id: Uuid, report: &CrawlReport, duration_ms: u64) {
        counter!(RUNS_TOTAL, "endpoint" => ENDPOINT).increment(1);
        histogram!(RUN_DURATION, "endpoint" => ENDPOINT).record(duration_ms as f64 / 1000.0);

        self.events
            .record(RunEvent {
                run_id,
                endpoint: ENDPOINT.to_string(),
                success: true,
                duration_ms,
                items_total: report.summary.total,
                items_error: report.summary.processed_error,
                violations_total: report.summary.with_violations,
            })
            .await;
    }
}

#[cfg(test)]
#[path = "scan_use_case_test.rs"]
mod tests;
