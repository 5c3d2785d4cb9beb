// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 爬取服务（crawl_service）：驱动站点/URL列表爬取的状态机
/// - 提取器（extractors）：页面、PDF、图片的文本提取
/// - 爬取边界（frontier）：去重、域名范围和软上限
/// - 词法分类器（lexical_classifier）：词级合规分类
/// - 资源分类（resource_classifier）：按URL和内容类型判定资源类型
/// - 结果汇总（result_aggregator）：增量累加报告摘要
/// - 文本分析（text_analytics）：可读性、词频、复杂度和替换建议
pub mod crawl_service;
pub mod extractors;
pub mod frontier;
pub mod lexical_classifier;
pub mod resource_classifier;
pub mod result_aggregator;
pub mod text_analytics;
