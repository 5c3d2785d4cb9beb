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

use axum::{extract::Extension, Json};
use std::sync::Arc;

use crate::{
    application::{
        dto::{scan_request::MultiscanRequestDto, scan_response::MultiscanResponse},
        use_cases::scan_use_case::ScanUseCase,
    },
    engines::traits::ResourceFetcher,
    presentation::errors::AppError,
};

/// 站点或URL列表的多资源扫描
///
/// 资源级失败嵌入在响应结果中，只有请求校验失败返回错误状态码
pub async fn multiscan<F>(
    Extension(use_case): Extension<Arc<ScanUseCase<F>>>,
    Json(payload): Json<MultiscanRequestDto>,
) -> Result<Json<MultiscanResponse>, AppError>
where
    F: ResourceFetcher + 'static,
{
    let response = use_case.multiscan(payload).await?;
    Ok(Json(response))
}
