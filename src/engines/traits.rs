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

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

/// 资源获取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// 超时
    #[error("Timeout after {0:?}")]
    Timeout(Duration),
    /// 连接失败（含DNS解析失败）
    #[error("Connection failed: {0}")]
    Connect(String),
    /// 非2xx状态码
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },
    /// URL无效
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// 被SSRF防护拒绝
    #[error("Blocked by SSRF protection: {0}")]
    Blocked(String),
    /// 响应体超过字节上限
    #[error("Resource exceeds {limit} bytes")]
    ResourceTooLarge { limit: u64 },
    /// 其他请求错误
    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// 将reqwest错误映射为类型化的获取错误
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// 获取到的资源
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// 重定向后的最终URL
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 内容类型（响应头中缺失时为 None）
    pub content_type: Option<String>,
    /// 响应体
    pub body: Bytes,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 资源获取器特质
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// 流式获取资源，累计字节超过 `max_bytes` 时立即中止
    async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
        max_bytes: u64,
    ) -> Result<FetchedResource, FetchError>;

    /// 获取器名称
    fn name(&self) -> &'static str;
}
