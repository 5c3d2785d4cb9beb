// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::resource::{ResourceKind, ResourceRef};
use crate::utils::errors::ResourceError;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// 爬取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    /// 从种子页面出发按广度优先发现资源
    #[default]
    Site,
    /// 只处理显式给出的URL列表，不跟随链接
    Urls,
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrawlMode::Site => write!(f, "site"),
            CrawlMode::Urls => write!(f, "urls"),
        }
    }
}

/// 爬取限制
///
/// 每个任务设置一次。超过 `max_urls` 是终止条件，其余是软上限：
/// 达到后停止发现新资源，但继续处理已入队的资源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlLimits {
    /// 结果总数上限（终止）
    pub max_urls: usize,
    /// 页面入队上限（软）
    pub max_pages: usize,
    /// 图片和PDF合计入队上限（软）
    pub max_resources: usize,
    /// 单个资源文本的最大字符数
    pub max_text_chars: usize,
    /// 单次获取/识别的超时
    pub timeout: Duration,
    /// 两次获取之间的固定间隔（毫秒）
    pub inter_request_delay_ms: u64,
    /// 是否跟随外部域名的链接
    pub include_external: bool,
    /// 单个资源的最大下载字节数
    pub max_download_bytes: u64,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_urls: 500,
            max_pages: 500,
            max_resources: 2500,
            max_text_chars: 200_000,
            timeout: Duration::from_secs(20),
            inter_request_delay_ms: 150,
            include_external: false,
            max_download_bytes: 8 * 1024 * 1024,
        }
    }
}

/// 爬取状态机
///
/// Idle → CrawlingPages → CrawlingImages → CrawlingPdfs → Completed，
/// URL列表模式为 Idle → ProcessingUrls → Completed；
/// 任意状态都可能因结果数达到上限进入 Aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlState {
    #[default]
    Idle,
    CrawlingPages,
    CrawlingImages,
    CrawlingPdfs,
    ProcessingUrls,
    Completed,
    Aborted,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CrawlState::Idle => "idle",
            CrawlState::CrawlingPages => "crawling_pages",
            CrawlState::CrawlingImages => "crawling_images",
            CrawlState::CrawlingPdfs => "crawling_pdfs",
            CrawlState::ProcessingUrls => "processing_urls",
            CrawlState::Completed => "completed",
            CrawlState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// 爬取统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// 已处理的页面数
    pub pages_scanned: usize,
    /// 已入队的图片数
    pub images_discovered: usize,
    /// 已入队的PDF数
    pub pdf_discovered: usize,
    /// 因软上限被丢弃的不同URL数
    pub queue_dropped_by_limits: usize,
    /// 因域名范围被跳过的不同URL数
    pub external_skipped: usize,
}

/// 资源元信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceMeta {
    pub title: Option<String>,
    pub content_type: Option<String>,
    pub text_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Success(ClassificationResult),
    Failure { error: String, kind: &'static str },
}

/// 单个资源的处理结果
///
/// 要么成功并带有分类结果，要么失败并带有错误，二者恰有其一
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResult {
    resource: ResourceRef,
    outcome: Outcome,
    meta: ResourceMeta,
}

impl ResourceResult {
    pub fn success(
        resource: ResourceRef,
        classification: ClassificationResult,
        meta: ResourceMeta,
    ) -> Self {
        Self {
            resource,
            outcome: Outcome::Success(classification),
            meta,
        }
    }

    pub fn failure(resource: ResourceRef, error: &ResourceError, meta: ResourceMeta) -> Self {
        Self {
            resource,
            outcome: Outcome::Failure {
                error: error.to_string(),
                kind: error.code(),
            },
            meta,
        }
    }

    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn classification(&self) -> Option<&ClassificationResult> {
        match &self.outcome {
            Outcome::Success(classification) => Some(classification),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }

    pub fn error_kind(&self) -> Option<&'static str> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure { kind, .. } => Some(kind),
        }
    }

    pub fn meta(&self) -> &ResourceMeta {
        &self.meta
    }

    pub fn has_violations(&self) -> bool {
        self.classification()
            .is_some_and(|c| c.violations_count() > 0)
    }
}

#[derive(Serialize)]
struct ResourceResultWire<'a> {
    url: &'a str,
    resource_type: ResourceKind,
    discovered_from: Option<&'a str>,
    success: bool,
    result: Option<&'a ClassificationResult>,
    error: Option<&'a str>,
    error_kind: Option<&'static str>,
    meta: &'a ResourceMeta,
    violations_count: usize,
    law_compliant: Option<bool>,
    forbidden_words: BTreeSet<String>,
}

impl Serialize for ResourceResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let classification = self.classification();
        ResourceResultWire {
            url: self.resource.url(),
            resource_type: self.resource.kind(),
            discovered_from: self.resource.discovered_from(),
            success: self.is_success(),
            result: classification,
            error: self.error(),
            error_kind: self.error_kind(),
            meta: &self.meta,
            violations_count: classification.map_or(0, ClassificationResult::violations_count),
            law_compliant: classification.map(ClassificationResult::law_compliant),
            forbidden_words: classification
                .map(ClassificationResult::forbidden_words)
                .unwrap_or_default(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::traits::FetchError;

    fn pdf_ref() -> ResourceRef {
        ResourceRef::new("https://example.com/doc.pdf", ResourceKind::Pdf)
    }

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let ok = ResourceResult::success(
            pdf_ref(),
            ClassificationResult::empty(),
            ResourceMeta::default(),
        );
        assert!(ok.is_success());
        assert!(ok.classification().is_some());
        assert!(ok.error().is_none());

        let failed = ResourceResult::failure(
            pdf_ref(),
            &ResourceError::PdfParseError("bad xref".to_string()),
            ResourceMeta::default(),
        );
        assert!(!failed.is_success());
        assert!(failed.classification().is_none());
        assert!(failed.error().is_some());
        assert_eq!(failed.error_kind(), Some("pdf_parse_error"));
    }

    #[test]
    fn test_failure_serialization() {
        let failed = ResourceResult::failure(
            pdf_ref(),
            &ResourceError::Fetch(FetchError::HttpStatus { status: 404 }),
            ResourceMeta::default(),
        );
        let value = serde_json::to_value(&failed).unwrap();

        assert_eq!(value["resource_type"], "pdf");
        assert_eq!(value["success"], false);
        assert!(value["result"].is_null());
        assert_eq!(value["error_kind"], "fetch_error");
        assert_eq!(value["violations_count"], 0);
        assert!(value["law_compliant"].is_null());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(CrawlState::CrawlingPdfs.to_string(), "crawling_pdfs");
        assert_eq!(
            serde_json::to_value(CrawlState::Aborted).unwrap(),
            "aborted"
        );
        assert_eq!(CrawlMode::Urls.to_string(), "urls");
    }
}
