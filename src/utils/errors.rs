// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::ocr::OcrError;
use crate::engines::traits::FetchError;
use thiserror::Error;

/// 单个资源处理错误类型
///
/// 在编排器边界被捕获并转换为失败的 `ResourceResult`，
/// 不会越过一次爬取迭代向外传播。
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Fetch failed: {0}")]
    Fetch(FetchError),

    #[error("Resource exceeds download limit of {limit} bytes")]
    ResourceTooLarge { limit: u64 },

    #[error("Unsupported resource kind: {0}")]
    UnsupportedResourceKind(String),

    #[error("OCR returned empty text")]
    OcrEmptyResult,

    #[error("OCR provider error: {0}")]
    OcrProviderError(String),

    #[error("PDF parse error: {0}")]
    PdfParseError(String),

    #[error("Classification input invalid: {0}")]
    ClassificationInputInvalid(String),
}

impl ResourceError {
    /// 稳定的错误代码，序列化到失败结果的 `error_kind` 字段
    pub fn code(&self) -> &'static str {
        match self {
            ResourceError::Fetch(_) => "fetch_error",
            ResourceError::ResourceTooLarge { .. } => "resource_too_large",
            ResourceError::UnsupportedResourceKind(_) => "unsupported_resource_kind",
            ResourceError::OcrEmptyResult => "ocr_empty_result",
            ResourceError::OcrProviderError(_) => "ocr_provider_error",
            ResourceError::PdfParseError(_) => "pdf_parse_error",
            ResourceError::ClassificationInputInvalid(_) => "classification_input_invalid",
        }
    }
}

impl From<FetchError> for ResourceError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::ResourceTooLarge { limit } => ResourceError::ResourceTooLarge { limit },
            other => ResourceError::Fetch(other),
        }
    }
}

impl From<OcrError> for ResourceError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::EmptyResult => ResourceError::OcrEmptyResult,
            other => ResourceError::OcrProviderError(other.to_string()),
        }
    }
}

/// 全局URL数量上限被突破
///
/// 唯一允许传播出爬取循环的错误，终止任务并返回部分报告。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("URL limit of {max_urls} exceeded")]
pub struct CrawlLimitExceeded {
    pub max_urls: usize,
}

/// 请求校验错误
///
/// 在开始爬取前快速失败，映射为 400 响应
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("at least one URL is required")]
    MissingUrls,

    #[error("unknown OCR provider: {0}")]
    UnknownProvider(String),

    #[error("validation failed: {0}")]
    Validation(String),
}
