// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::crawl::{CrawlLimits, CrawlStats};
use crate::domain::models::resource::{ResourceKind, ResourceRef};
use crate::domain::services::resource_classifier::kind_from_url;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// 入队结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// 已入队
    Queued,
    /// 已见过（已入队、已处理、已丢弃或已跳过）
    Duplicate,
    /// 外部域名，按域名范围跳过
    External,
    /// 对应的软上限已满，丢弃
    DroppedByLimit,
}

/// 有容量上限的入队配额
#[derive(Debug, Clone, Copy)]
struct Budget {
    capacity: usize,
    used: usize,
}

impl Budget {
    fn new(capacity: usize) -> Self {
        Self { capacity, used: 0 }
    }

    fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    fn try_take(&mut self) -> bool {
        if self.used >= self.capacity {
            return false;
        }
        self.used += 1;
        true
    }
}

/// 爬取边界
///
/// 页面队列按广度优先（FIFO）处理；图片和PDF在页面爬取期间只入队，
/// 页面处理完后按发现顺序处理。每个URL至多出现在
/// `seen`（已入队或已处理）、`dropped`、`external` 之一中。
#[derive(Debug)]
pub struct Frontier {
    seed_host: Option<String>,
    include_external: bool,
    seen: HashSet<String>,
    dropped: HashSet<String>,
    external: HashSet<String>,
    pages: VecDeque<ResourceRef>,
    images: VecDeque<ResourceRef>,
    pdfs: VecDeque<ResourceRef>,
    explicit: VecDeque<ResourceRef>,
    page_budget: Budget,
    /// 图片和PDF共用
    resource_budget: Budget,
    images_enqueued: usize,
    pdfs_enqueued: usize,
}

impl Frontier {
    fn empty(seed_host: Option<String>, limits: Option<&CrawlLimits>) -> Self {
        let (page_budget, resource_budget, include_external) = match limits {
            Some(limits) => (
                Budget::new(limits.max_pages),
                Budget::new(limits.max_resources),
                limits.include_external,
            ),
            None => (Budget::unlimited(), Budget::unlimited(), true),
        };

        Self {
            seed_host,
            include_external,
            seen: HashSet::new(),
            dropped: HashSet::new(),
            external: HashSet::new(),
            pages: VecDeque::new(),
            images: VecDeque::new(),
            pdfs: VecDeque::new(),
            explicit: VecDeque::new(),
            page_budget,
            resource_budget,
            images_enqueued: 0,
            pdfs_enqueued: 0,
        }
    }

    /// 站点模式：以种子页面开始，种子计入页面配额
    pub fn for_site(seed: &Url, limits: &CrawlLimits) -> Self {
        let mut frontier = Self::empty(seed.host_str().map(str::to_ascii_lowercase), Some(limits));
        let key = seed.to_string();
        if frontier.page_budget.try_take() {
            frontier.seen.insert(key.clone());
            frontier.pages.push_back(ResourceRef::new(key, ResourceKind::Page));
        } else {
            frontier.dropped.insert(key);
        }
        frontier
    }

    /// URL列表模式：列表即全部边界，保持输入顺序，重复URL只保留第一次
    pub fn explicit<'a, I>(urls: I) -> Self
    where
        I: IntoIterator<Item = &'a Url>,
    {
        let mut frontier = Self::empty(None, None);
        for url in urls {
            let key = url.to_string();
            if !frontier.seen.insert(key.clone()) {
                continue;
            }
            let kind = kind_from_url(&key).unwrap_or(ResourceKind::Page);
            match kind {
                ResourceKind::Image => frontier.images_enqueued += 1,
                ResourceKind::Pdf => frontier.pdfs_enqueued += 1,
                ResourceKind::Page => {}
            }
            frontier.explicit.push_back(ResourceRef::new(key, kind));
        }
        frontier
    }

    fn in_scope(&self, url: &Url) -> bool {
        if self.include_external {
            return true;
        }
        match (&self.seed_host, url.host_str()) {
            (Some(seed), Some(host)) => seed.eq_ignore_ascii_case(host),
            _ => false,
        }
    }

    /// 提交一个发现的链接
    ///
    /// # 参数
    ///
    /// * `url` - 已规范化的绝对URL
    /// * `kind` - 按URL判断的资源类型
    /// * `discovered_from` - 发现该链接的页面
    pub fn offer(&mut self, url: &Url, kind: ResourceKind, discovered_from: &str) -> EnqueueOutcome {
        let key = url.to_string();
        if self.seen.contains(&key) || self.dropped.contains(&key) || self.external.contains(&key) {
            return EnqueueOutcome::Duplicate;
        }

        if !self.in_scope(url) {
            self.external.insert(key);
            return EnqueueOutcome::External;
        }

        let budget = match kind {
            ResourceKind::Page => &mut self.page_budget,
            ResourceKind::Image | ResourceKind::Pdf => &mut self.resource_budget,
        };
        if !budget.try_take() {
            self.dropped.insert(key);
            return EnqueueOutcome::DroppedByLimit;
        }

        self.seen.insert(key.clone());
        let resource = ResourceRef::discovered(key, kind, discovered_from);
        match kind {
            ResourceKind::Page => self.pages.push_back(resource),
            ResourceKind::Image => {
                self.images_enqueued += 1;
                self.images.push_back(resource);
            }
            ResourceKind::Pdf => {
                self.pdfs_enqueued += 1;
                self.pdfs.push_back(resource);
            }
        }
        EnqueueOutcome::Queued
    }

    /// 页面队列中的资源获取后按内容类型判定为图片或PDF时，改入对应队列
    ///
    /// 占用图片/PDF共用配额；配额已满时该URL计入丢弃数。
    /// `kind` 为页面时不做任何改动。
    pub fn requeue_as(&mut self, resource: &ResourceRef, kind: ResourceKind) -> EnqueueOutcome {
        if kind == ResourceKind::Page {
            return EnqueueOutcome::Duplicate;
        }

        if !self.resource_budget.try_take() {
            self.seen.remove(resource.url());
            self.dropped.insert(resource.url().to_string());
            return EnqueueOutcome::DroppedByLimit;
        }

        let moved = resource.with_kind(kind);
        if kind == ResourceKind::Image {
            self.images_enqueued += 1;
            self.images.push_back(moved);
        } else {
            self.pdfs_enqueued += 1;
            self.pdfs.push_back(moved);
        }
        EnqueueOutcome::Queued
    }

    pub fn next_page(&mut self) -> Option<ResourceRef> {
        self.pages.pop_front()
    }

    pub fn next_image(&mut self) -> Option<ResourceRef> {
        self.images.pop_front()
    }

    pub fn next_pdf(&mut self) -> Option<ResourceRef> {
        self.pdfs.pop_front()
    }

    pub fn next_explicit(&mut self) -> Option<ResourceRef> {
        self.explicit.pop_front()
    }

    /// 爬取统计（页面扫描数由编排器提供）
    pub fn stats(&self, pages_scanned: usize) -> CrawlStats {
        CrawlStats {
            pages_scanned,
            images_discovered: self.images_enqueued,
            pdf_discovered: self.pdfs_enqueued,
            queue_dropped_by_limits: self.dropped.len(),
            external_skipped: self.external.len(),
        }
    }
}
