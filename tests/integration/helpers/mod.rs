// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use lawscan::application::use_cases::{check_use_case::CheckUseCase, scan_use_case::ScanUseCase};
use lawscan::config::settings::CrawlSettings;
use lawscan::domain::services::lexical_classifier::LexicalClassifier;
use lawscan::engines::ocr::{OcrEngine, OcrError, OcrInput, OcrOutput, OcrProvider, OcrRequest, OcrRouter};
use lawscan::engines::reqwest_engine::ReqwestFetcher;
use lawscan::infrastructure::dictionary_loader::load_from_dir;
use lawscan::infrastructure::event_sink::TracingRunEventSink;
use lawscan::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const HOME_PAGE: &str = r#"<html>
<head><title>Главная</title></head>
<body>
  <h1>Главная страница магазина</h1>
  <a href="/about">О нас</a>
  <a href="/price.pdf">Прайс</a>
  <img src="/banner.png" alt="">
</body>
</html>"#;

const ABOUT_PAGE: &str = r#"<html>
<head><title>О нас</title></head>
<body><p>Магазин sale</p></body>
</html>"#;

const NORMATIVE_WORDS: &str = "# test dictionary\nглавная\nстраница\nмагазина\nмагазин\nо\nнас\nпрайс\nскидки\n";

/// 本地测试站点
///
/// 首页链接到一个同站页面、一个损坏的PDF和一张图片
pub async fn spawn_site() -> String {
    let site = Router::new()
        .route("/", get(|| async { html(HOME_PAGE) }))
        .route("/about", get(|| async { html(ABOUT_PAGE) }))
        .route(
            "/price.pdf",
            get(|| async { ([(header::CONTENT_TYPE, "application/pdf")], "not a pdf at all") }),
        )
        .route(
            "/banner.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], vec![0x89u8, b'P', b'N', b'G']) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, site).await.unwrap();
    });

    format!("http://{}", addr)
}

fn html(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body)
}

/// 固定返回“Скидки”的 OCR
pub struct StubOcr;

#[async_trait]
impl OcrEngine for StubOcr {
    async fn recognize(&self, request: &OcrRequest) -> Result<OcrOutput, OcrError> {
        if request.api_key.is_empty() {
            return Err(OcrError::MissingCredential);
        }
        assert!(matches!(request.input, OcrInput::Url(_)));
        Ok(OcrOutput {
            text: "Скидки".to_string(),
            raw: json!({ "usage": { "total_tokens": 1 } }),
        })
    }

    fn provider(&self) -> OcrProvider {
        OcrProvider::OpenAi
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub site: String,
    _dictionaries: TempDir,
}

impl TestApp {
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

/// 创建测试应用
///
/// 词典从临时目录加载，获取器允许访问本地地址，OCR 使用桩实现
pub async fn create_test_app() -> TestApp {
    create_test_app_with(false).await
}

/// 创建开启私有地址拦截的测试应用
pub async fn create_test_app_with(block_private_hosts: bool) -> TestApp {
    let site = spawn_site().await;

    let dictionaries = TempDir::new().unwrap();
    std::fs::write(dictionaries.path().join("orfograf_words.txt"), NORMATIVE_WORDS).unwrap();
    std::fs::write(dictionaries.path().join("Nenormativnye_slova.txt"), "дрянь\n").unwrap();
    std::fs::write(
        dictionaries.path().join("abbreviations.txt"),
        "МВД=министерство внутренних дел\n",
    )
    .unwrap();
    let classifier = LexicalClassifier::new(Arc::new(load_from_dir(dictionaries.path())));

    let fetcher = Arc::new(ReqwestFetcher::new("lawscan-test", block_private_hosts).unwrap());
    let settings = CrawlSettings {
        default_delay_ms: 0,
        default_timeout_sec: 5,
        ..CrawlSettings::default()
    };
    let events = Arc::new(TracingRunEventSink);

    let scan = Arc::new(ScanUseCase::new(
        fetcher.clone(),
        classifier.clone(),
        OcrRouter::new().register(Arc::new(StubOcr)),
        settings.clone(),
        Some("test-key".to_string()),
        events.clone(),
    ));
    let check = Arc::new(CheckUseCase::new(fetcher, classifier, settings, events));

    TestApp {
        router: routes::app(scan, check),
        site,
        _dictionaries: dictionaries,
    }
}
