// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 内容提取器
//!
//! - HTML：可见文本、标题和外链
//! - PDF：按页顺序提取文本
//! - 图片：委托给 OCR 引擎

pub mod html;
pub mod image;
pub mod pdf;

pub use html::{extract_page, ExtractedPage};
pub use image::ImageExtractor;
pub use pdf::extract_pdf_text;

/// 按字符数截断文本
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
