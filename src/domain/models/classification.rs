// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::BTreeSet;

/// 单个词的判定结果
///
/// 优先级：脏话 > 外文 > 未知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenVerdict {
    /// 脏话
    Profanity,
    /// 含拉丁字母
    Foreign,
    /// 词典和词法分析都不认识
    Unknown,
    /// 合规
    Compliant,
}

/// 文本分类结果
///
/// 每次分类新建，创建后不可修改。三个违规集合互不相交，
/// `violations_count` 恒等于三者大小之和。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    total_words: usize,
    unique_words: usize,
    latin_words: BTreeSet<String>,
    unknown_words: BTreeSet<String>,
    profanity_words: BTreeSet<String>,
    violations_count: usize,
    law_compliant: bool,
}

impl ClassificationResult {
    /// 空文本的结果
    pub fn empty() -> Self {
        Self::from_parts(0, 0, BTreeSet::new(), BTreeSet::new(), BTreeSet::new())
    }

    /// 由统计值和三个违规集合构造，计数和合规标志由集合推导
    pub fn from_parts(
        total_words: usize,
        unique_words: usize,
        latin_words: BTreeSet<String>,
        unknown_words: BTreeSet<String>,
        profanity_words: BTreeSet<String>,
    ) -> Self {
        let violations_count = latin_words.len() + unknown_words.len() + profanity_words.len();
        Self {
            total_words,
            unique_words,
            latin_words,
            unknown_words,
            profanity_words,
            violations_count,
            law_compliant: violations_count == 0,
        }
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn unique_words(&self) -> usize {
        self.unique_words
    }

    pub fn latin_words(&self) -> &BTreeSet<String> {
        &self.latin_words
    }

    pub fn unknown_words(&self) -> &BTreeSet<String> {
        &self.unknown_words
    }

    pub fn profanity_words(&self) -> &BTreeSet<String> {
        &self.profanity_words
    }

    pub fn violations_count(&self) -> usize {
        self.violations_count
    }

    pub fn law_compliant(&self) -> bool {
        self.law_compliant
    }

    /// 三个违规集合的并集，排序去重
    pub fn forbidden_words(&self) -> BTreeSet<String> {
        self.latin_words
            .iter()
            .chain(&self.unknown_words)
            .chain(&self.profanity_words)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_is_compliant() {
        let result = ClassificationResult::empty();
        assert_eq!(result.total_words(), 0);
        assert_eq!(result.violations_count(), 0);
        assert!(result.law_compliant());
    }

    #[test]
    fn test_counts_derive_from_sets() {
        let result = ClassificationResult::from_parts(
            10,
            8,
            set(&["hello", "world"]),
            set(&["кринж"]),
            BTreeSet::new(),
        );

        assert_eq!(result.violations_count(), 3);
        assert!(!result.law_compliant());
        assert_eq!(
            result.forbidden_words().into_iter().collect::<Vec<_>>(),
            vec!["hello", "world", "кринж"]
        );
    }
}
