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

use lawscan::application::use_cases::check_use_case::CheckUseCase;
use lawscan::application::use_cases::scan_use_case::ScanUseCase;
use lawscan::config::settings::Settings;
use lawscan::domain::repositories::run_event_sink::RunEventSink;
use lawscan::domain::services::lexical_classifier::LexicalClassifier;
use lawscan::engines::ocr::OcrRouter;
use lawscan::engines::reqwest_engine::ReqwestFetcher;
use lawscan::infrastructure::dictionary_loader;
use lawscan::infrastructure::event_sink::TracingRunEventSink;
use lawscan::presentation::routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use lawscan::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting lawscan...");

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    if settings.metrics.enabled {
        lawscan::infrastructure::metrics::init_metrics(&settings.metrics.listen);
    }

    // 3. Load dictionaries
    let dictionary = Arc::new(dictionary_loader::load_from_dir(&settings.dictionary.path));
    let classifier = LexicalClassifier::new(dictionary);
    info!("Morphology analyzer not configured, unknown words are checked against dictionaries only");

    // 4. Initialize engines
    let fetcher = Arc::new(
        ReqwestFetcher::new(
            &settings.crawl.user_agent,
            settings.crawl.block_private_hosts,
        )?
        .with_trusted_hosts(settings.crawl.trusted_hosts.clone()),
    );
    let ocr = OcrRouter::from_settings(&settings.ocr)?;
    info!("Fetcher and OCR providers initialized");

    let events: Arc<dyn RunEventSink> = Arc::new(TracingRunEventSink);
    let scan = Arc::new(ScanUseCase::new(
        fetcher.clone(),
        classifier.clone(),
        ocr,
        settings.crawl.clone(),
        settings.ocr.api_key.clone(),
        events.clone(),
    ));
    let check = Arc::new(CheckUseCase::new(
        fetcher,
        classifier,
        settings.crawl.clone(),
        events,
    ));

    // 5. Start HTTP server
    let app = routes::app(scan, check);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
