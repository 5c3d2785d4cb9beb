// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 资源类型
///
/// 排序即站点模式下的处理顺序：页面 → 图片 → PDF
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// HTML 页面
    Page,
    /// 图片
    Image,
    /// PDF 文档
    Pdf,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Page => "page",
            ResourceKind::Image => "image",
            ResourceKind::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 资源引用
///
/// 以规范化URL（去掉片段）作为身份，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    url: String,
    #[serde(rename = "resource_type")]
    kind: ResourceKind,
    discovered_from: Option<String>,
}

impl ResourceRef {
    /// 显式提供的资源（种子或URL列表）
    pub fn new(url: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
            discovered_from: None,
        }
    }

    /// 通过链接发现的资源
    pub fn discovered(url: impl Into<String>, kind: ResourceKind, from: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            discovered_from: Some(from.into()),
        }
    }

    /// 获取后按内容类型修正资源类型
    pub fn with_kind(&self, kind: ResourceKind) -> Self {
        Self {
            kind,
            ..self.clone()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn discovered_from(&self) -> Option<&str> {
        self.discovered_from.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ordering_matches_processing_order() {
        assert!(ResourceKind::Page < ResourceKind::Image);
        assert!(ResourceKind::Image < ResourceKind::Pdf);
        assert_eq!(ResourceKind::Pdf.to_string(), "pdf");
    }

    #[test]
    fn test_serialized_shape() {
        let resource = ResourceRef::discovered(
            "https://example.com/a.pdf",
            ResourceKind::Pdf,
            "https://example.com/",
        );
        let value = serde_json::to_value(&resource).unwrap();

        assert_eq!(value["url"], "https://example.com/a.pdf");
        assert_eq!(value["resource_type"], "pdf");
        assert_eq!(value["discovered_from"], "https://example.com/");
    }

    #[test]
    fn test_with_kind_keeps_identity() {
        let page = ResourceRef::new("https://example.com/file", ResourceKind::Page);
        let pdf = page.with_kind(ResourceKind::Pdf);

        assert_eq!(pdf.url(), page.url());
        assert_eq!(pdf.kind(), ResourceKind::Pdf);
        assert!(pdf.discovered_from().is_none());
    }
}
