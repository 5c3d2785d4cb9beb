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

use crate::domain::models::resource::ResourceKind;
use crate::domain::services::resource_classifier::kind_from_url;
use crate::utils::url_utils::resolve_link;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// 不计入可见文本的元素
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static LINK_SOURCES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src], source[src], a[href]").expect("valid selector"));

/// 页面提取结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: Option<String>,
    /// 可见文本，文本节点之间以空格连接
    pub text: String,
    pub page_links: Vec<Url>,
    pub image_links: Vec<Url>,
    pub pdf_links: Vec<Url>,
}

impl ExtractedPage {
    /// 按类型遍历全部链接，保持文档顺序
    pub fn links(&self) -> impl Iterator<Item = (&Url, ResourceKind)> {
        self.page_links
            .iter()
            .map(|u| (u, ResourceKind::Page))
            .chain(self.image_links.iter().map(|u| (u, ResourceKind::Image)))
            .chain(self.pdf_links.iter().map(|u| (u, ResourceKind::Pdf)))
    }
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Element(el) => {
                if HIDDEN_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible_text(child_el, out);
                }
            }
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            _ => {}
        }
    }
}

/// 解析HTML页面
///
/// # 参数
///
/// * `html` - 已解码的HTML文本
/// * `base_url` - 页面URL，用于解析相对链接
///
/// # 返回值
///
/// 可见文本、标题以及按类型分组并去重的绝对链接
pub fn extract_page(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let mut chunks = Vec::new();
    collect_visible_text(document.root_element(), &mut chunks);

    let mut page = ExtractedPage {
        title,
        text: chunks.join(" "),
        ..Default::default()
    };

    let mut seen = HashSet::new();
    for element in document.select(&LINK_SOURCES) {
        let is_anchor = element.value().name() == "a";
        let target = if is_anchor {
            element.value().attr("href")
        } else {
            element.value().attr("src")
        };
        let Some(url) = target.and_then(|t| resolve_link(base_url, t)) else {
            continue;
        };
        if !seen.insert(url.to_string()) {
            continue;
        }

        // img/source 没有已知后缀时仍按图片处理
        let kind = match (kind_from_url(url.as_str()), is_anchor) {
            (Some(kind), _) => kind,
            (None, true) => ResourceKind::Page,
            (None, false) => ResourceKind::Image,
        };
        match kind {
            ResourceKind::Page => page.page_links.push(url),
            ResourceKind::Image => page.image_links.push(url),
            ResourceKind::Pdf => page.pdf_links.push(url),
        }
    }

    page
}
