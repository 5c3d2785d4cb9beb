// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心数据结构，包括：
/// - 资源（resource）：页面、图片、PDF 的引用
/// - 分类结果（classification）：一段文本的合规判定
/// - 词典（dictionary）：规范词、外来词、脏话和缩写集合
/// - 爬取（crawl）：爬取模式、限制、状态和单个资源结果
/// - 报告（report）：一次任务的汇总报告
pub mod classification;
pub mod crawl;
pub mod dictionary;
pub mod report;
pub mod resource;
