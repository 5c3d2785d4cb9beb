// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::dictionary::DictionaryStore;
use std::path::Path;
use tracing::{info, warn};

const NORMATIVE_FILES: &[&str] = &["orfograf_words.txt", "orfoep_words.txt"];
const FOREIGN_FILE: &str = "foreign_words.txt";
const PROFANITY_FILE: &str = "Nenormativnye_slova.txt";
const ABBREVIATIONS_FILE: &str = "abbreviations.txt";

/// 读取词表文件的有效行（忽略空行和 `#` 注释）
///
/// 文件缺失或读取失败时返回 `None` 并记录警告
fn read_lines(dir: &Path, file_name: &str) -> Option<Vec<String>> {
    let path = dir.join(file_name);
    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(file = %path.display(), "Dictionary file not loaded: {}", e);
            return None;
        }
    };

    let lines = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect();
    Some(lines)
}

/// `ABBR=expansion` 或单独的 `ABBR`
fn parse_abbreviation(line: &str) -> (String, Option<String>) {
    match line.split_once('=') {
        Some((abbr, expansion)) => {
            let expansion = expansion.trim();
            (
                abbr.trim().to_string(),
                (!expansion.is_empty()).then(|| expansion.to_string()),
            )
        }
        None => (line.to_string(), None),
    }
}

/// 从目录加载词典
///
/// 先写入内置常用词，再加载各词表文件。任何文件缺失都不会失败，
/// 对应类别保持为空并记录警告。
///
/// # 参数
///
/// * `dir` - 词典目录
///
/// # 返回值
///
/// 加载完成的词典
pub fn load_from_dir(dir: impl AsRef<Path>) -> DictionaryStore {
    let dir = dir.as_ref();
    let mut store = DictionaryStore::with_base_lexicon();

    if !dir.is_dir() {
        warn!(path = %dir.display(), "Dictionary directory not found, using base lexicon only");
        return store;
    }

    for file_name in NORMATIVE_FILES {
        if let Some(lines) = read_lines(dir, file_name) {
            let added = store.extend_normative(&lines);
            info!(file = *file_name, lines = lines.len(), added, "Loaded normative words");
        }
    }

    if let Some(lines) = read_lines(dir, FOREIGN_FILE) {
        let added = store.extend_foreign(&lines);
        info!(file = FOREIGN_FILE, added, "Loaded allowed foreign words");
    }

    if let Some(lines) = read_lines(dir, PROFANITY_FILE) {
        let added = store.extend_profanity(&lines);
        info!(file = PROFANITY_FILE, added, "Loaded profanity words");
    }

    if let Some(lines) = read_lines(dir, ABBREVIATIONS_FILE) {
        let added = store.extend_abbreviations(lines.iter().map(|l| parse_abbreviation(l)));
        info!(file = ABBREVIATIONS_FILE, added, "Loaded abbreviations");
    }

    let stats = store.stats();
    info!(
        normative = stats.normative,
        foreign_allowed = stats.foreign_allowed,
        profanity = stats.profanity,
        abbreviations = stats.abbreviations,
        "词典加载完成"
    );

    store
}
