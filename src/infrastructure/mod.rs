// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节：
/// - 词典加载（dictionary_loader）：从目录读取词表文件
/// - 事件接收器（event_sink）：运行事件接收器的日志实现
/// - 指标（metrics）：Prometheus 导出器和指标名称
pub mod dictionary_loader;
pub mod event_sink;
pub mod metrics;
