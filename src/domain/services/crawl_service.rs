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

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::crawl::{
    CrawlLimits, CrawlMode, CrawlState, ResourceMeta, ResourceResult,
};
use crate::domain::models::report::CrawlReport;
use crate::domain::models::resource::{ResourceKind, ResourceRef};
use crate::domain::services::extractors::{
    extract_page, extract_pdf_text, truncate_chars, ImageExtractor,
};
use crate::domain::services::frontier::{EnqueueOutcome, Frontier};
use crate::domain::services::lexical_classifier::LexicalClassifier;
use crate::domain::services::resource_classifier::{classify_kind, is_textual_content_type};
use crate::domain::services::result_aggregator::ResultAggregator;
use crate::engines::ocr::OcrInput;
use crate::engines::traits::{FetchedResource, ResourceFetcher};
use crate::infrastructure::metrics::{CRAWL_ABORTS, RESOURCES_PROCESSED};
use crate::utils::errors::{CrawlLimitExceeded, ResourceError};
use crate::utils::text_encoding::{decode_text, looks_binary};
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// 单次爬取的可变状态，只属于一次调用
struct CrawlRun<'a> {
    limits: &'a CrawlLimits,
    mode: CrawlMode,
    state: CrawlState,
    frontier: Frontier,
    aggregator: ResultAggregator,
    pages_scanned: usize,
    items_started: usize,
    /// 页面阶段已获取、按内容类型改入图片/PDF队列的资源
    prefetched: HashMap<String, FetchedResource>,
}

impl<'a> CrawlRun<'a> {
    fn new(mode: CrawlMode, limits: &'a CrawlLimits, frontier: Frontier) -> Self {
        Self {
            limits,
            mode,
            state: CrawlState::Idle,
            frontier,
            aggregator: ResultAggregator::new(),
            pages_scanned: 0,
            items_started: 0,
            prefetched: HashMap::new(),
        }
    }

    fn transition(&mut self, next: CrawlState) {
        info!(mode = %self.mode, from = %self.state, to = %next, "crawl state transition");
        self.state = next;
    }

    /// 下一个资源开始前检查结果数上限
    fn ensure_capacity(&self) -> Result<(), CrawlLimitExceeded> {
        if self.aggregator.recorded() >= self.limits.max_urls {
            return Err(CrawlLimitExceeded {
                max_urls: self.limits.max_urls,
            });
        }
        Ok(())
    }

    /// 两次获取之间的固定间隔
    async fn throttle(&mut self) {
        if self.items_started > 0 && self.limits.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.limits.inter_request_delay_ms)).await;
        }
        self.items_started += 1;
    }

    fn record(&mut self, result: ResourceResult) {
        let outcome = if result.is_success() { "success" } else { "error" };
        counter!(RESOURCES_PROCESSED, "kind" => result.kind().as_str(), "outcome" => outcome)
            .increment(1);

        if let Some(error) = result.error() {
            warn!(
                url = %result.resource().url(),
                kind = %result.kind(),
                error_kind = result.error_kind().unwrap_or_default(),
                "Resource failed: {}",
                error
            );
        }

        self.aggregator.push(result);
    }

    fn finish(mut self, outcome: Result<(), CrawlLimitExceeded>) -> CrawlReport {
        let abort_reason = match outcome {
            Ok(()) => {
                self.transition(CrawlState::Completed);
                None
            }
            Err(limit) => {
                warn!(max_urls = limit.max_urls, "Crawl aborted: {}", limit);
                counter!(CRAWL_ABORTS).increment(1);
                self.transition(CrawlState::Aborted);
                Some(limit.to_string())
            }
        };

        let crawl_stats = self.frontier.stats(self.pages_scanned);
        let (results, summary) = self.aggregator.into_parts();
        info!(
            mode = %self.mode,
            state = %self.state,
            total = summary.total,
            errors = summary.processed_error,
            with_violations = summary.with_violations,
            "Crawl finished"
        );

        CrawlReport {
            mode: self.mode,
            state: self.state,
            abort_reason,
            crawl_stats,
            summary,
            results,
        }
    }
}

/// 爬取编排服务
///
/// 驱动边界队列、提取器和分类器。站点模式严格顺序执行：
/// 一个资源完成获取、提取、分类和记录后才开始下一个。
/// 单个资源的失败记录为失败结果，只有结果数上限会终止任务。
pub struct CrawlService<F: ResourceFetcher> {
    fetcher: Arc<F>,
    classifier: LexicalClassifier,
    images: Option<ImageExtractor>,
}

impl<F: ResourceFetcher> CrawlService<F> {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - 资源获取器
    /// * `classifier` - 词法分类器
    pub fn new(fetcher: Arc<F>, classifier: LexicalClassifier) -> Self {
        Self {
            fetcher,
            classifier,
            images: None,
        }
    }

    /// 配置图片 OCR；未配置时图片资源记录为不支持
    pub fn with_image_extractor(mut self, extractor: ImageExtractor) -> Self {
        self.images = Some(extractor);
        self
    }

    /// 站点模式爬取
    ///
    /// 页面 → 图片 → PDF 依次处理，结果数达到 `max_urls` 后再有待处理资源即终止
    ///
    /// # 参数
    ///
    /// * `seed` - 起始页面
    /// * `limits` - 本次任务的限制
    ///
    /// # 返回值
    ///
    /// 完成或终止时的报告
    pub async fn run_site(&self, seed: &Url, limits: &CrawlLimits) -> CrawlReport {
        let frontier = Frontier::for_site(seed, limits);
        let mut run = CrawlRun::new(CrawlMode::Site, limits, frontier);
        info!(seed = %seed, max_urls = limits.max_urls, max_pages = limits.max_pages, "Starting site crawl");

        let outcome = self.drive_site(&mut run).await;
        run.finish(outcome)
    }

    /// URL列表模式：不跟随链接，保持输入顺序
    pub async fn run_urls(&self, urls: &[Url], limits: &CrawlLimits) -> CrawlReport {
        let frontier = Frontier::explicit(urls);
        let mut run = CrawlRun::new(CrawlMode::Urls, limits, frontier);
        info!(count = urls.len(), max_urls = limits.max_urls, "Starting URL list crawl");

        let outcome = self.drive_urls(&mut run).await;
        run.finish(outcome)
    }

    /// 检查单个URL，不跟随链接
    pub async fn check_resource(&self, url: &Url, limits: &CrawlLimits) -> ResourceResult {
        let resource = ResourceRef::new(url.as_str(), ResourceKind::Page);
        self.process(resource, limits, None).await
    }

    async fn drive_site(&self, run: &mut CrawlRun<'_>) -> Result<(), CrawlLimitExceeded> {
        run.transition(CrawlState::CrawlingPages);
        while run.pages_scanned < run.limits.max_pages {
            let Some(page) = run.frontier.next_page() else {
                break;
            };
            run.ensure_capacity()?;
            run.throttle().await;

            let fetched = match self.fetch(&page, run.limits).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    run.pages_scanned += 1;
                    run.record(ResourceResult::failure(page, &e, ResourceMeta::default()));
                    continue;
                }
            };

            // Links that turn out to be images or PDFs wait for their own phase
            let kind = classify_kind(page.url(), fetched.content_type.as_deref());
            if kind != ResourceKind::Page {
                let outcome = run.frontier.requeue_as(&page, kind);
                debug!(url = %page.url(), kind = %kind, ?outcome, "Page link deferred by content type");
                if outcome == EnqueueOutcome::Queued {
                    run.prefetched.insert(page.url().to_string(), fetched);
                }
                continue;
            }

            run.pages_scanned += 1;
            let result = self
                .process_fetched(page, fetched, run.limits, Some(&mut run.frontier))
                .await;
            run.record(result);
        }

        run.transition(CrawlState::CrawlingImages);
        while let Some(image) = run.frontier.next_image() {
            run.ensure_capacity()?;
            let result = self.process_queued(run, image).await;
            run.record(result);
        }

        run.transition(CrawlState::CrawlingPdfs);
        while let Some(pdf) = run.frontier.next_pdf() {
            run.ensure_capacity()?;
            let result = self.process_queued(run, pdf).await;
            run.record(result);
        }

        Ok(())
    }

    /// 处理图片/PDF队列中的资源；页面阶段已获取过的直接使用已获取的内容
    async fn process_queued(&self, run: &mut CrawlRun<'_>, resource: ResourceRef) -> ResourceResult {
        match run.prefetched.remove(resource.url()) {
            Some(fetched) => self.process_fetched(resource, fetched, run.limits, None).await,
            None => {
                run.throttle().await;
                self.process(resource, run.limits, None).await
            }
        }
    }

    async fn drive_urls(&self, run: &mut CrawlRun<'_>) -> Result<(), CrawlLimitExceeded> {
        run.transition(CrawlState::ProcessingUrls);
        while let Some(resource) = run.frontier.next_explicit() {
            run.ensure_capacity()?;
            run.throttle().await;
            if resource.kind() == ResourceKind::Page {
                run.pages_scanned += 1;
            }
            let result = self.process(resource, run.limits, None).await;
            run.record(result);
        }
        Ok(())
    }

    async fn fetch(
        &self,
        resource: &ResourceRef,
        limits: &CrawlLimits,
    ) -> Result<FetchedResource, ResourceError> {
        let fetched = self
            .fetcher
            .fetch(resource.url(), limits.timeout, limits.max_download_bytes)
            .await?;
        debug!(
            url = %resource.url(),
            fetcher = self.fetcher.name(),
            bytes = fetched.body.len(),
            response_time_ms = fetched.response_time_ms,
            "Resource fetched"
        );
        Ok(fetched)
    }

    /// 处理单个资源
    ///
    /// 已按URL识别为图片的资源直接按URL识别文字；其余先获取，
    /// 再按内容类型修正资源类型并分发到对应的提取器
    async fn process(
        &self,
        resource: ResourceRef,
        limits: &CrawlLimits,
        frontier: Option<&mut Frontier>,
    ) -> ResourceResult {
        debug!(url = %resource.url(), kind = %resource.kind(), "Processing resource");

        if resource.kind() == ResourceKind::Image {
            let outcome = self
                .recognize(OcrInput::Url(resource.url().to_string()))
                .await
                .and_then(|text| self.classify_text(&text, limits));
            return match outcome {
                Ok((classification, text_length)) => ResourceResult::success(
                    resource,
                    classification,
                    ResourceMeta {
                        text_length: Some(text_length),
                        ..Default::default()
                    },
                ),
                Err(e) => ResourceResult::failure(resource, &e, ResourceMeta::default()),
            };
        }

        match self.fetch(&resource, limits).await {
            Ok(fetched) => self.process_fetched(resource, fetched, limits, frontier).await,
            Err(e) => ResourceResult::failure(resource, &e, ResourceMeta::default()),
        }
    }

    /// 对已获取的内容提取文本并分类
    async fn process_fetched(
        &self,
        resource: ResourceRef,
        fetched: FetchedResource,
        limits: &CrawlLimits,
        frontier: Option<&mut Frontier>,
    ) -> ResourceResult {
        let kind = classify_kind(resource.url(), fetched.content_type.as_deref());
        let resource = if kind == resource.kind() {
            resource
        } else {
            debug!(url = %resource.url(), from = %resource.kind(), to = %kind, "Resource kind corrected by content type");
            resource.with_kind(kind)
        };

        let mut meta = ResourceMeta {
            content_type: fetched.content_type.clone(),
            ..Default::default()
        };

        let extracted: Result<String, ResourceError> = match kind {
            ResourceKind::Page => self
                .extract_page_text(&resource, &fetched, frontier)
                .map(|(title, text)| {
                    meta.title = title;
                    text
                }),
            ResourceKind::Pdf => extract_pdf_text(&fetched.body, limits.max_text_chars),
            ResourceKind::Image => {
                let declared = fetched
                    .content_type
                    .as_deref()
                    .and_then(|ct| ct.split(';').next())
                    .map(str::trim)
                    .filter(|ct| ct.starts_with("image/"));
                let mime = match declared {
                    Some(mime) => mime.to_string(),
                    None => {
                        debug!(
                            url = %resource.url(),
                            content_type = fetched.content_type.as_deref().unwrap_or_default(),
                            "No image content type, assuming {}",
                            DEFAULT_IMAGE_MIME
                        );
                        DEFAULT_IMAGE_MIME.to_string()
                    }
                };
                self.recognize(OcrInput::Bytes {
                    data: fetched.body.clone(),
                    mime,
                })
                .await
            }
        };

        match extracted.and_then(|text| self.classify_text(&text, limits)) {
            Ok((classification, text_length)) => {
                meta.text_length = Some(text_length);
                ResourceResult::success(resource, classification, meta)
            }
            Err(e) => ResourceResult::failure(resource, &e, meta),
        }
    }

    fn extract_page_text(
        &self,
        resource: &ResourceRef,
        fetched: &FetchedResource,
        frontier: Option<&mut Frontier>,
    ) -> Result<(Option<String>, String), ResourceError> {
        let content_type = fetched.content_type.as_deref();
        if !is_textual_content_type(content_type) {
            return Err(ResourceError::UnsupportedResourceKind(
                content_type.unwrap_or_default().to_string(),
            ));
        }

        let html = decode_text(&fetched.body, content_type);
        let base = Url::parse(&fetched.url)
            .or_else(|_| Url::parse(resource.url()))
            .map_err(|e| ResourceError::ClassificationInputInvalid(e.to_string()))?;
        let page = extract_page(&html, &base);

        if let Some(frontier) = frontier {
            let mut queued = 0usize;
            for (link, kind) in page.links() {
                if frontier.offer(link, kind, resource.url()) == EnqueueOutcome::Queued {
                    queued += 1;
                }
            }
            debug!(url = %resource.url(), queued, "Links offered to frontier");
        }

        Ok((page.title, page.text))
    }

    async fn recognize(&self, input: OcrInput) -> Result<String, ResourceError> {
        match &self.images {
            Some(extractor) => extractor.extract(input).await,
            None => Err(ResourceError::UnsupportedResourceKind(
                "image (OCR provider not configured)".to_string(),
            )),
        }
    }

    /// 截断到字符上限后分类
    ///
    /// # 返回值
    ///
    /// 分类结果和参与分类的文本字符数
    fn classify_text(
        &self,
        text: &str,
        limits: &CrawlLimits,
    ) -> Result<(ClassificationResult, usize), ResourceError> {
        if looks_binary(text) {
            return Err(ResourceError::ClassificationInputInvalid(
                "extracted text contains binary data".to_string(),
            ));
        }

        let text = truncate_chars(text, limits.max_text_chars);
        Ok((self.classifier.classify(text), text.chars().count()))
    }
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
