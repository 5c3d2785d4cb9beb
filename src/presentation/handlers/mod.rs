// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 处理器只负责提取请求并调用用例，业务逻辑在应用层
pub mod check_handler;
pub mod scan_handler;
