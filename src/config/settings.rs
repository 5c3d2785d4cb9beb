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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_USER_AGENT: &str = "LawScan-MultiScan/1.0";

/// 应用程序配置设置
///
/// 包含服务器、词典、爬取限制、OCR和指标等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 词典配置
    pub dictionary: DictionarySettings,
    /// 爬取限制配置
    pub crawl: CrawlSettings,
    /// OCR 提供商配置
    pub ocr: OcrSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 词典配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DictionarySettings {
    /// 词典文件目录
    pub path: String,
}

/// 爬取配置设置
///
/// `*_hard` 为请求参数的硬上限，`default_*` 为请求未指定时的默认值
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    pub max_urls_hard: usize,
    pub max_pages_hard: usize,
    pub max_resources_hard: usize,
    /// 单个资源文本的最大字符数
    pub max_text_chars: usize,
    /// 单个资源的最大下载字节数
    pub max_download_bytes: u64,
    pub user_agent: String,
    pub default_max_urls: usize,
    pub default_max_pages: usize,
    pub default_max_resources: usize,
    /// 默认请求间隔（毫秒）
    pub default_delay_ms: u64,
    /// 默认单次请求超时（秒）
    pub default_timeout_sec: u64,
    /// 是否拒绝解析到私有地址的URL
    pub block_private_hosts: bool,
    /// 不受私有地址拦截的主机（例如内网预发布站点）
    #[serde(default)]
    pub trusted_hosts: Vec<String>,
    /// 批量检查的最大URL数
    pub batch_max_urls: usize,
    /// 批量检查的并发数
    pub batch_concurrency: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_urls_hard: 2000,
            max_pages_hard: 2000,
            max_resources_hard: 8000,
            max_text_chars: 200_000,
            max_download_bytes: 8 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_max_urls: 500,
            default_max_pages: 500,
            default_max_resources: 2500,
            default_delay_ms: 150,
            default_timeout_sec: 20,
            block_private_hosts: true,
            trusted_hosts: Vec::new(),
            batch_max_urls: 50,
            batch_concurrency: 5,
        }
    }
}

/// OCR 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSettings {
    /// 单次识别请求超时（秒）
    pub timeout_sec: u64,
    pub openai_base_url: String,
    pub google_base_url: String,
    pub ocrspace_base_url: String,
    /// 请求未携带凭证时使用的默认凭证
    pub api_key: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            timeout_sec: 30,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            google_base_url: "https://vision.googleapis.com/v1".to_string(),
            ocrspace_base_url: "https://api.ocr.space".to_string(),
            api_key: None,
        }
    }
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用 Prometheus 导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `LAWSCAN__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let crawl = CrawlSettings::default();
        let ocr = OcrSettings::default();

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("dictionary.path", "dictionaries")?
            // Crawl limits
            .set_default("crawl.max_urls_hard", crawl.max_urls_hard as u64)?
            .set_default("crawl.max_pages_hard", crawl.max_pages_hard as u64)?
            .set_default("crawl.max_resources_hard", crawl.max_resources_hard as u64)?
            .set_default("crawl.max_text_chars", crawl.max_text_chars as u64)?
            .set_default("crawl.max_download_bytes", crawl.max_download_bytes)?
            .set_default("crawl.user_agent", crawl.user_agent)?
            .set_default("crawl.default_max_urls", crawl.default_max_urls as u64)?
            .set_default("crawl.default_max_pages", crawl.default_max_pages as u64)?
            .set_default("crawl.default_max_resources", crawl.default_max_resources as u64)?
            .set_default("crawl.default_delay_ms", crawl.default_delay_ms)?
            .set_default("crawl.default_timeout_sec", crawl.default_timeout_sec)?
            .set_default("crawl.block_private_hosts", crawl.block_private_hosts)?
            .set_default("crawl.batch_max_urls", crawl.batch_max_urls as u64)?
            .set_default("crawl.batch_concurrency", crawl.batch_concurrency as u64)?
            // OCR providers
            .set_default("ocr.timeout_sec", ocr.timeout_sec)?
            .set_default("ocr.openai_base_url", ocr.openai_base_url)?
            .set_default("ocr.google_base_url", ocr.google_base_url)?
            .set_default("ocr.ocrspace_base_url", ocr.ocrspace_base_url)?
            // Metrics exporter
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen", "0.0.0.0:9000")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("LAWSCAN").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
