// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dictionary::DictionaryStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// 常见外来词的俄语替换
const REPLACEMENTS: &[(&str, &str)] = &[
    ("hello", "привет"),
    ("world", "мир"),
    ("computer", "компьютер"),
    ("email", "электронная почта"),
    ("internet", "интернет"),
    ("software", "программное обеспечение"),
];

const TOP_WORDS: usize = 10;

/// 词频项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// 文本统计分析
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    /// 可读性指数，越小越易读
    pub readability: f64,
    /// 出现最多的长词（超过3个字符），按次数降序
    pub word_frequency: Vec<WordCount>,
    pub sentence_count: usize,
    pub avg_word_length: f64,
    /// 复杂度 0-100
    pub complexity_score: f64,
}

impl TextAnalysis {
    /// 计算文本的全部统计指标
    pub fn of(text: &str) -> Self {
        let words: Vec<&str> = text.split_whitespace().collect();
        Self {
            readability: readability(text),
            word_frequency: word_frequency(text),
            sentence_count: sentence_count(text),
            avg_word_length: avg_word_length(&words),
            complexity_score: complexity(text),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 以句点分隔的非空句子数
pub fn sentence_count(text: &str) -> usize {
    text.split('.').filter(|s| !s.trim().is_empty()).count()
}

fn avg_word_length(words: &[&str]) -> f64 {
    let chars: usize = words.iter().map(|w| w.chars().count()).sum();
    chars as f64 / words.len().max(1) as f64
}

/// 可读性指数
///
/// 平均句长 × 0.5 + 平均词长 × 2，保留两位小数；没有词或句子时为 0
pub fn readability(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentences = sentence_count(text);
    if words.is_empty() || sentences == 0 {
        return 0.0;
    }

    let avg_sentence_length = words.len() as f64 / sentences as f64;
    round2(avg_sentence_length * 0.5 + avg_word_length(&words) * 2.0)
}

/// 出现次数最多的前十个长词
///
/// 次数相同时保持首次出现的顺序
pub fn word_frequency(text: &str) -> Vec<WordCount> {
    let lower = text.to_lowercase();
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in lower.split_whitespace().filter(|w| w.chars().count() > 3) {
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut items: Vec<WordCount> = order
        .into_iter()
        .map(|word| WordCount {
            word: word.to_string(),
            count: counts[word],
        })
        .collect();
    items.sort_by(|a, b| b.count.cmp(&a.count));
    items.truncate(TOP_WORDS);
    items
}

/// 复杂度评分
///
/// 平均词长 × 10 + 词汇多样性 × 30，上限 100
pub fn complexity(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0.0;
    }

    let unique: HashSet<&str> = words.iter().copied().collect();
    let diversity = unique.len() as f64 / words.len() as f64;
    round2(avg_word_length(&words) * 10.0 + diversity * 30.0).min(100.0)
}

/// 违规数的改善百分比；原文本无违规时为 0
pub fn improvement_percent(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    round2((before as f64 - after as f64) / before as f64 * 100.0)
}

/// 单个词的替换建议
///
/// # 参数
///
/// * `word` - 待替换的词，大小写不敏感
/// * `dictionary` - 用于展开缩写
///
/// # 返回值
///
/// 替换建议列表，没有建议时为空
pub fn suggestions(word: &str, dictionary: &DictionaryStore) -> Vec<String> {
    let lower = word.trim().to_lowercase();
    let mut items: Vec<String> = REPLACEMENTS
        .iter()
        .filter(|(foreign, _)| *foreign == lower)
        .map(|(_, russian)| russian.to_string())
        .collect();

    if let Some(expansion) = dictionary.expand_abbreviation(&lower) {
        items.push(expansion.to_string());
    }
    items
}
