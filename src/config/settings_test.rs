// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{CrawlSettings, OcrSettings, Settings};

#[test]
fn test_settings_load_with_defaults() {
    let settings = Settings::new().expect("defaults should always deserialize");

    assert!(!settings.dictionary.path.is_empty());
    assert!(settings.crawl.max_urls_hard >= settings.crawl.default_max_urls);
    assert!(settings.crawl.max_pages_hard >= settings.crawl.default_max_pages);
    assert!(settings.crawl.batch_concurrency > 0);
    assert!(settings.ocr.timeout_sec > 0);
}

#[test]
fn test_crawl_defaults() {
    let crawl = CrawlSettings::default();

    assert_eq!(crawl.max_download_bytes, 8 * 1024 * 1024);
    assert_eq!(crawl.user_agent, "LawScan-MultiScan/1.0");
    assert_eq!(crawl.default_delay_ms, 150);
    assert!(crawl.block_private_hosts);
    assert!(crawl.trusted_hosts.is_empty());
}

#[test]
fn test_ocr_defaults() {
    let ocr = OcrSettings::default();

    assert_eq!(ocr.openai_base_url, "https://api.openai.com/v1");
    assert_eq!(ocr.ocrspace_base_url, "https://api.ocr.space");
    assert!(ocr.api_key.is_none());
}
