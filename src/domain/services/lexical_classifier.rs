// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::classification::{ClassificationResult, TokenVerdict};
use crate::domain::models::dictionary::DictionaryStore;
use crate::domain::repositories::morph_analyzer::MorphAnalyzer;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s]+").expect("valid url regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s\-\(\)]{7,}").expect("valid phone regex"));

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[а-яёА-ЯЁa-zA-Z][а-яёА-ЯЁa-zA-Z\-]*\b").expect("valid word regex")
});

/// 不参与判定的介词和连词
const STOP_WORDS: &[&str] = &[
    "и", "в", "на", "по", "от", "до", "из", "к", "с", "у", "о", "но", "да", "не", "за", "об",
    "во", "а", "я",
];

/// 词法分析置信度不低于该值时视为已知词
const MORPH_KNOWN_THRESHOLD: f32 = 0.1;

/// 全大写且不超过该长度的词视为缩写
const MAX_ABBREVIATION_CHARS: usize = 6;

/// 词法合规分类器
///
/// 纯函数：同一文本在同一词典下总是得到相同结果。
/// 词法分析器缺失时退化为仅依赖词典的规则。
#[derive(Clone)]
pub struct LexicalClassifier {
    dictionary: Arc<DictionaryStore>,
    morph: Option<Arc<dyn MorphAnalyzer>>,
}

impl LexicalClassifier {
    /// 创建仅依赖词典的分类器
    pub fn new(dictionary: Arc<DictionaryStore>) -> Self {
        Self {
            dictionary,
            morph: None,
        }
    }

    /// 附加词法分析器
    pub fn with_morphology(mut self, morph: Arc<dyn MorphAnalyzer>) -> Self {
        self.morph = Some(morph);
        self
    }

    pub fn dictionary(&self) -> &DictionaryStore {
        &self.dictionary
    }

    pub fn morph_available(&self) -> bool {
        self.morph.is_some()
    }

    /// 对文本分类
    ///
    /// # 参数
    ///
    /// * `text` - 待检查的文本
    ///
    /// # 返回值
    ///
    /// 分类结果；空文本或纯空白文本返回零值的合规结果
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult::empty();
        }

        let cleaned = URL_RE.replace_all(text, " ");
        let cleaned = PHONE_RE.replace_all(&cleaned, " ");

        let tokens: Vec<&str> = WORD_RE.find_iter(&cleaned).map(|m| m.as_str()).collect();
        let unique: HashSet<&str> = tokens.iter().copied().collect();

        let mut latin = BTreeSet::new();
        let mut unknown = BTreeSet::new();
        let mut profanity = BTreeSet::new();

        for token in &tokens {
            let bucket = match self.verdict(token) {
                TokenVerdict::Profanity => &mut profanity,
                TokenVerdict::Foreign => &mut latin,
                TokenVerdict::Unknown => &mut unknown,
                TokenVerdict::Compliant => continue,
            };
            bucket.insert(token.to_string());
        }

        ClassificationResult::from_parts(tokens.len(), unique.len(), latin, unknown, profanity)
    }

    /// 单个词的判定
    ///
    /// 单字符词和停用词总是合规
    pub fn verdict(&self, token: &str) -> TokenVerdict {
        let lower = token.to_lowercase();
        if token.chars().count() <= 1 || STOP_WORDS.contains(&lower.as_str()) {
            return TokenVerdict::Compliant;
        }

        if self.is_profanity(&lower) {
            TokenVerdict::Profanity
        } else if token.chars().any(|c| c.is_ascii_alphabetic()) {
            TokenVerdict::Foreign
        } else if !self.is_known(token, &lower) {
            TokenVerdict::Unknown
        } else {
            TokenVerdict::Compliant
        }
    }

    fn is_profanity(&self, lower: &str) -> bool {
        if self.dictionary.is_profanity(lower) {
            return true;
        }

        self.morph
            .as_ref()
            .and_then(|morph| morph.normal_form(lower))
            .is_some_and(|normal| self.dictionary.is_profanity(&normal))
    }

    fn is_known(&self, token: &str, lower: &str) -> bool {
        if self.dictionary.is_dictionary_word(lower) || self.dictionary.is_abbreviation(lower) {
            return true;
        }

        let morph_known = self
            .morph
            .as_ref()
            .and_then(|morph| morph.known_score(lower))
            .is_some_and(|score| score >= MORPH_KNOWN_THRESHOLD);
        if morph_known {
            return true;
        }

        is_all_caps(token) && token.chars().count() <= MAX_ABBREVIATION_CHARS
    }
}

fn is_all_caps(token: &str) -> bool {
    let mut letters = token.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

#[cfg(test)]
#[path = "lexical_classifier_test.rs"]
mod tests;
