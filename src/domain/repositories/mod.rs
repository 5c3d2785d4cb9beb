// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 协作者接口模块
///
/// 该模块定义了领域层依赖的外部能力接口，具体实现由基础设施层或调用方提供：
/// - 词法分析器（morph_analyzer）：给出词形置信度和原形
/// - 运行事件接收器（run_event_sink）：接收每次运行的结构化事件
pub mod morph_analyzer;
pub mod run_event_sink;
