// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 扫描用例（scan_use_case）：站点/URL列表的多资源扫描
/// - 检查用例（check_use_case）：文本、单个URL和批量URL检查
pub mod check_use_case;
pub mod scan_use_case;
