// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// 内置的常用词，在加载词典文件之前写入规范词集合
pub const BASE_LEXICON: &[&str] = &[
    "и", "в", "на", "по", "от", "до", "из", "к", "с", "у", "о", "об", "но", "да", "не", "за",
    "во", "а", "я", "ты", "он", "она", "оно", "это", "этот", "эта", "эти", "тот", "та", "те",
    "который", "которые", "которая", "которое", "весь", "вся", "все", "или", "если", "чтобы",
    "когда", "где", "так", "также", "очень", "более", "менее", "готовый", "готовая",
    "современный", "необходимый", "технический", "высокий", "широкий", "различный",
    "профессиональный",
];

/// 词典存储
///
/// 启动时加载一次，之后只读。所有词条在写入时转为小写。
#[derive(Debug, Clone, Default)]
pub struct DictionaryStore {
    normative: HashSet<String>,
    foreign_allowed: HashSet<String>,
    profanity: HashSet<String>,
    /// 缩写（小写）→ 全称
    abbreviations: HashMap<String, Option<String>>,
}

/// 词典统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStats {
    pub normative: usize,
    pub foreign_allowed: usize,
    pub profanity: usize,
    pub abbreviations: usize,
}

/// 词条规范化：去空白、小写；长度不超过1的词条丢弃
pub(crate) fn normalize_entry(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    (word.chars().count() > 1).then_some(word)
}

impl DictionaryStore {
    /// 空词典
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅包含内置常用词的词典
    pub fn with_base_lexicon() -> Self {
        let mut store = Self::new();
        store.extend_normative(BASE_LEXICON);
        store
    }

    pub fn with_normative<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend_normative(words);
        self
    }

    pub fn with_foreign<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend_foreign(words);
        self
    }

    pub fn with_profanity<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extend_profanity(words);
        self
    }

    pub fn with_abbreviations<I, K>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        self.extend_abbreviations(entries);
        self
    }

    pub(crate) fn extend_normative<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_set(&mut self.normative, words)
    }

    pub(crate) fn extend_foreign<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_set(&mut self.foreign_allowed, words)
    }

    pub(crate) fn extend_profanity<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_set(&mut self.profanity, words)
    }

    pub(crate) fn extend_abbreviations<I, K>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        let before = self.abbreviations.len();
        for (abbr, expansion) in entries {
            if let Some(key) = normalize_entry(abbr.as_ref()) {
                self.abbreviations.insert(key, expansion);
            }
        }
        self.abbreviations.len() - before
    }

    /// 词是否在规范词或允许的外来词集合中（参数须为小写）
    pub fn is_dictionary_word(&self, lower: &str) -> bool {
        self.normative.contains(lower) || self.foreign_allowed.contains(lower)
    }

    pub fn is_profanity(&self, lower: &str) -> bool {
        self.profanity.contains(lower)
    }

    pub fn is_abbreviation(&self, lower: &str) -> bool {
        self.abbreviations.contains_key(lower)
    }

    /// 缩写的全称
    pub fn expand_abbreviation(&self, lower: &str) -> Option<&str> {
        self.abbreviations.get(lower).and_then(|e| e.as_deref())
    }

    pub fn stats(&self) -> DictionaryStats {
        DictionaryStats {
            normative: self.normative.len(),
            foreign_allowed: self.foreign_allowed.len(),
            profanity: self.profanity.len(),
            abbreviations: self.abbreviations.len(),
        }
    }
}

fn extend_set<I, S>(target: &mut HashSet<String>, words: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let before = target.len();
    target.extend(words.into_iter().filter_map(|w| normalize_entry(w.as_ref())));
    target.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_lexicon_is_normative() {
        let store = DictionaryStore::with_base_lexicon();
        assert!(store.is_dictionary_word("профессиональный"));
        assert!(store.is_dictionary_word("это"));
        // single-letter entries are dropped at ingest
        assert!(!store.is_dictionary_word("и"));
    }

    #[test]
    fn test_entries_are_case_folded() {
        let store = DictionaryStore::new()
            .with_foreign(["  Бизнес "])
            .with_profanity(["ПЛОХОЕ"])
            .with_abbreviations([("МВД", Some("министерство внутренних дел".to_string()))]);

        assert!(store.is_dictionary_word("бизнес"));
        assert!(store.is_profanity("плохое"));
        assert!(store.is_abbreviation("мвд"));
        assert_eq!(
            store.expand_abbreviation("мвд"),
            Some("министерство внутренних дел")
        );
    }

    #[test]
    fn test_stats() {
        let store = DictionaryStore::new()
            .with_normative(["дом", "кот", "дом"])
            .with_profanity(["x"]);

        assert_eq!(
            store.stats(),
            DictionaryStats {
                normative: 2,
                foreign_allowed: 0,
                profanity: 0,
                abbreviations: 0,
            }
        );
    }
}
