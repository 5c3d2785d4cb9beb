// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 词法分析器特质
///
/// 外部词法模型的接口。返回 `None` 表示该词无法分析，
/// 分类器此时只依赖词典规则，不视为错误。
pub trait MorphAnalyzer: Send + Sync {
    /// 词为已知词形的置信度，取值 `[0, 1]`（参数为小写）
    fn known_score(&self, word: &str) -> Option<f32>;

    /// 词的原形（参数为小写）
    fn normal_form(&self, word: &str) -> Option<String>;
}
