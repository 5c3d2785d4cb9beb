// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::ResourceKind;
use url::Url;

/// 按URL后缀识别为图片的扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

fn path_extension(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // 相对路径或无法解析时去掉查询和片段再取后缀
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let file_name = path.rsplit('/').next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// 仅根据URL后缀猜测资源类型
///
/// 无法判断时返回 `None`
pub fn kind_from_url(url: &str) -> Option<ResourceKind> {
    let ext = path_extension(url)?;
    if ext == "pdf" {
        Some(ResourceKind::Pdf)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(ResourceKind::Image)
    } else {
        None
    }
}

/// 根据内容类型判断资源类型
pub fn kind_from_content_type(content_type: &str) -> Option<ResourceKind> {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        Some(ResourceKind::Pdf)
    } else if content_type.contains("image/") {
        Some(ResourceKind::Image)
    } else {
        None
    }
}

/// 判定资源类型
///
/// URL后缀命中图片扩展名或 `.pdf` 时以后缀为准；后缀无法判断时，
/// 内容类型包含 `pdf` 或 `image/` 则以内容类型为准；否则为页面
///
/// # 参数
///
/// * `url` - 资源URL
/// * `content_type` - 获取后得到的内容类型（可选）
pub fn classify_kind(url: &str, content_type: Option<&str>) -> ResourceKind {
    kind_from_url(url)
        .or_else(|| content_type.and_then(kind_from_content_type))
        .unwrap_or(ResourceKind::Page)
}

/// 内容类型是否可以作为文本页面处理
///
/// 缺失的内容类型按页面处理
pub fn is_textual_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.starts_with("text/") || ct.contains("html") || ct.contains("xml")
        }
    }
}
