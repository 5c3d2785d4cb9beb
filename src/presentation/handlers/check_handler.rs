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
        dto::{
            scan_request::{
                AnalyzeTextRequestDto, BatchCheckRequestDto, CheckTextRequestDto,
                CheckUrlRequestDto, CompareTextsRequestDto, SuggestFixesRequestDto,
            },
            scan_response::{
                AnalyzeTextResponse, BatchCheckResponse, CheckTextResponse, CheckUrlResponse,
                CompareTextsResponse, StatsResponse, SuggestFixesResponse,
            },
        },
        use_cases::check_use_case::CheckUseCase,
    },
    engines::traits::ResourceFetcher,
    presentation::errors::AppError,
};

/// 检查一段文本
pub async fn check_text<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<CheckTextRequestDto>,
) -> Result<Json<CheckTextResponse>, AppError>
where
    F: ResourceFetcher + 'static,
{
    Ok(Json(use_case.check_text(payload)?))
}

/// 检查文本并返回统计分析
pub async fn analyze<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<AnalyzeTextRequestDto>,
) -> Result<Json<AnalyzeTextResponse>, AppError>
where
    F: ResourceFetcher + 'static,
{
    Ok(Json(use_case.analyze(payload)?))
}

/// 对比两段文本
pub async fn compare<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<CompareTextsRequestDto>,
) -> Json<CompareTextsResponse>
where
    F: ResourceFetcher + 'static,
{
    Json(use_case.compare(payload))
}

pub async fn suggest_fixes<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<SuggestFixesRequestDto>,
) -> Json<SuggestFixesResponse>
where
    F: ResourceFetcher + 'static,
{
    Json(use_case.suggest_fixes(payload))
}

/// 检查单个页面
pub async fn check_url<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<CheckUrlRequestDto>,
) -> Result<Json<CheckUrlResponse>, AppError>
where
    F: ResourceFetcher + 'static,
{
    Ok(Json(use_case.check_url(payload).await?))
}

/// 批量检查页面
pub async fn batch_check<F>(
    Extension(use_case): Extension<Arc<CheckUseCase<F>>>,
    Json(payload): Json<BatchCheckRequestDto>,
) -> Result<Json<BatchCheckResponse>, AppError>
where
    F: ResourceFetcher + 'static,
{
    Ok(Json(use_case.batch_check(payload).await?))
}

/// 词典统计
pub async fn stats<F>(Extension(use_case): Extension<Arc<CheckUseCase<F>>>) -> Json<StatsResponse>
where
    F: ResourceFetcher + 'static,
{
    Json(use_case.stats())
}
