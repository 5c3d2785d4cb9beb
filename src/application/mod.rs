// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含请求/响应数据传输对象和用例实现
/// 用例负责请求校验、组装领域服务并发出运行事件
pub mod dto;
pub mod use_cases;
