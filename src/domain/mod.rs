// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：资源、分类结果、词典和报告
/// - 仓库接口（repositories）：形态分析和运行事件的抽象接口
/// - 服务（services）：爬取编排、提取和分类
///
/// 领域层不依赖具体的HTTP或OCR实现。
pub mod models;
pub mod repositories;
pub mod services;
