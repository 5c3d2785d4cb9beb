// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::truncate_chars;
use crate::utils::errors::ResourceError;
use lopdf::Document;
use tracing::{debug, warn};

/// 从PDF字节中按页提取文本
///
/// 文本累计达到 `max_chars` 后不再解析后续页面。单页提取失败只记录警告，
/// 全部页面都失败时返回 [`ResourceError::PdfParseError`]。
///
/// # 参数
///
/// * `bytes` - PDF文件内容
/// * `max_chars` - 最多保留的字符数
pub fn extract_pdf_text(bytes: &[u8], max_chars: usize) -> Result<String, ResourceError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ResourceError::PdfParseError(e.to_string()))?;

    let pages = document.get_pages();
    let mut text = String::new();
    let mut chars = 0usize;
    let mut extracted_pages = 0usize;
    let mut last_error = None;

    for page_number in pages.keys() {
        if chars >= max_chars {
            debug!(page_number, max_chars, "PDF text limit reached, skipping remaining pages");
            break;
        }

        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                extracted_pages += 1;
                let page_text = page_text.trim();
                if page_text.is_empty() {
                    continue;
                }
                if !text.is_empty() {
                    text.push('\n');
                    chars += 1;
                }
                chars += page_text.chars().count();
                text.push_str(page_text);
            }
            Err(e) => {
                warn!(page_number, "Failed to extract PDF page text: {}", e);
                last_error = Some(e.to_string());
            }
        }
    }

    if extracted_pages == 0 {
        if let Some(error) = last_error {
            return Err(ResourceError::PdfParseError(error));
        }
    }

    Ok(truncate_chars(&text, max_chars).to_string())
}
