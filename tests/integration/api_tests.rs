// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, create_test_app_with};
use axum::http::StatusCode;
use serde_json::{json, Value};

fn words(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w.as_str().unwrap())
        .collect()
}

/// 文本检查返回分类结果和建议
#[tokio::test]
async fn test_check_text() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/v1/check", json!({ "text": "Главная страница sale" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(words(&body["result"]["latin_words"]), vec!["sale"]);
    assert_eq!(body["result"]["violations_count"], 1);
    assert_eq!(body["result"]["law_compliant"], false);
    assert_eq!(body["recommendations"][0]["level"], "warning");
}

/// 空文本返回400
#[tokio::test]
async fn test_check_blank_text_returns_400() {
    let app = create_test_app().await;

    let (status, body) = app.post("/v1/check", json!({ "text": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

/// 详细分析附带文本统计
#[tokio::test]
async fn test_analyze_text() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/v1/analyze", json!({ "text": "Главная страница sale. Магазин" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(words(&body["result"]["latin_words"]), vec!["sale"]);
    assert_eq!(body["analysis"]["sentence_count"], 2);
    assert!(body["analysis"]["readability"].as_f64().unwrap() > 0.0);
    assert!(body["analysis"]["complexity_score"].as_f64().unwrap() <= 100.0);
    assert_eq!(body["analysis"]["word_frequency"][0]["count"], 1);
    assert_eq!(body["recommendations"][0]["level"], "warning");

    let (status, _) = app.post("/v1/analyze", json!({ "text": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// 对比两段文本的违规数
#[tokio::test]
async fn test_compare_texts() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/compare",
            json!({ "text1": "Магазин sale", "text2": "Магазин" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let comparison = &body["comparison"];
    assert_eq!(comparison["text1"]["violations_count"], 1);
    assert_eq!(comparison["text2"]["violations_count"], 0);
    assert_eq!(comparison["difference"]["violations_delta"], -1);
    assert_eq!(comparison["difference"]["improved"], true);
    assert_eq!(comparison["difference"]["improvement_percent"], 100.0);
}

/// 替换建议包含固定替换和缩写全称
#[tokio::test]
async fn test_suggest_fixes() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/suggest-fixes",
            json!({ "words": ["email", "мвд", "cashback"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(words(&body["suggestions"]["email"]), vec!["электронная почта"]);
    assert_eq!(
        words(&body["suggestions"]["мвд"]),
        vec!["министерство внутренних дел"]
    );
    assert!(body["suggestions"]["cashback"].as_array().unwrap().is_empty());
}

/// 词典统计来自加载的词表文件
#[tokio::test]
async fn test_stats() {
    let app = create_test_app().await;

    let (status, body) = app.get("/v1/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profanity"], 1);
    assert!(body["normative"].as_u64().unwrap() >= 8);
    assert_eq!(body["morph_available"], false);
}

/// 单个URL检查
#[tokio::test]
async fn test_check_url() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/v1/check-url", json!({ "url": format!("{}/about#contacts", app.site) }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["url"], format!("{}/about", app.site));
    assert_eq!(body["result"]["resource_type"], "page");
    assert_eq!(body["result"]["meta"]["title"], "О нас");
    assert_eq!(words(&body["result"]["forbidden_words"]), vec!["sale"]);
}

/// 获取失败体现在结果中，仍返回200
#[tokio::test]
async fn test_check_url_missing_page() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/v1/check-url", json!({ "url": format!("{}/missing", app.site) }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"]["success"], false);
    assert_eq!(body["result"]["error_kind"], "fetch_error");
    assert!(body["result"]["result"].is_null());
}

/// 无效URL返回400
#[tokio::test]
async fn test_check_url_rejects_invalid_url() {
    let app = create_test_app().await;

    let (status, body) = app
        .post("/v1/check-url", json!({ "url": "ftp://example.com/file" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

/// 开启私有地址拦截时本地站点被拒绝
#[tokio::test]
async fn test_private_hosts_are_blocked() {
    let app = create_test_app_with(true).await;

    let (status, body) = app
        .post("/v1/check-url", json!({ "url": format!("{}/about", app.site) }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["result"]["error_kind"], "fetch_error");
}

/// 批量检查保持输入顺序，无效行记为失败
#[tokio::test]
async fn test_batch_check() {
    let app = create_test_app().await;

    let urls = format!("{}/\nnot a url\n{}/about", app.site, app.site);
    let (status, body) = app.post("/v1/batch-check", json!({ "urls": urls })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 3);
    assert_eq!(body["checked"], 3);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["url"], format!("{}/", app.site));
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["url"], "not a url");
    assert_eq!(results[1]["error_kind"], "fetch_error");
    assert_eq!(results[2]["url"], format!("{}/about", app.site));
    assert_eq!(results[2]["law_compliant"], false);
}

/// 空的批量请求返回400
#[tokio::test]
async fn test_batch_check_rejects_empty_list() {
    let app = create_test_app().await;

    let (status, _) = app.post("/v1/batch-check", json!({ "urls": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// 站点扫描：页面按广度优先，随后图片和PDF；损坏的PDF不影响任务成功
#[tokio::test]
async fn test_multiscan_site() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({ "mode": "site", "siteUrl": app.site, "provider": "openai" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["mode"], "site");
    assert_eq!(body["state"], "completed");
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["total"], 4);
    assert_eq!(body["processed_success"], 3);
    assert_eq!(body["processed_error"], 1);
    assert_eq!(body["crawl_stats"]["pages_scanned"], 2);
    assert_eq!(body["crawl_stats"]["images_discovered"], 1);
    assert_eq!(body["crawl_stats"]["pdf_discovered"], 1);
    assert!(words(&body["forbidden_words"]).contains(&"sale"));

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["url"], format!("{}/", app.site));
    assert_eq!(results[1]["url"], format!("{}/about", app.site));
    assert_eq!(results[1]["discovered_from"], format!("{}/", app.site));
    assert_eq!(results[2]["resource_type"], "image");
    assert_eq!(results[2]["success"], true);
    assert_eq!(results[2]["law_compliant"], true);
    assert_eq!(results[3]["resource_type"], "pdf");
    assert_eq!(results[3]["success"], false);
    assert_eq!(results[3]["error_kind"], "pdf_parse_error");
}

/// 页面配额用完后，剩余页面链接计入丢弃数
#[tokio::test]
async fn test_multiscan_site_page_limit() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({ "site_url": app.site, "provider": "openai", "max_pages": 1 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["crawl_stats"]["pages_scanned"], 1);
    assert_eq!(body["crawl_stats"]["queue_dropped_by_limits"], 1);
    assert_eq!(body["total"], 3);
}

/// 结果数达到上限时任务中止，已有结果仍然返回
#[tokio::test]
async fn test_multiscan_aborts_at_max_urls() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({ "site_url": app.site, "provider": "openai", "maxUrls": 2 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["state"], "aborted");
    assert!(body["abort_reason"].is_string());
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

/// URL列表模式按输入顺序处理，不跟随链接
#[tokio::test]
async fn test_multiscan_urls() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({
                "mode": "urls",
                "urls": [format!("{}/price.pdf", app.site), format!("{}/", app.site)],
                "provider": "openai"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "urls");
    assert_eq!(body["state"], "completed");
    assert_eq!(body["total"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["resource_type"], "pdf");
    assert_eq!(results[0]["error_kind"], "pdf_parse_error");
    assert_eq!(results[1]["resource_type"], "page");
    assert_eq!(results[1]["success"], true);
}

/// 请求级错误在任何网络访问前返回400
#[tokio::test]
async fn test_multiscan_request_errors() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({ "site_url": app.site, "provider": "tesseract" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .post("/v1/multiscan", json!({ "site_url": app.site }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/v1/multiscan",
            json!({ "site_url": "not a url", "provider": "openai" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// 未配置的提供商返回503
#[tokio::test]
async fn test_multiscan_unconfigured_provider() {
    let app = create_test_app().await;

    let (status, body) = app
        .post(
            "/v1/multiscan",
            json!({ "site_url": app.site, "provider": "ocrspace" }),
        )
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
}
