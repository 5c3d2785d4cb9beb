// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::application::use_cases::{
    check_use_case::CheckUseCaseError, scan_use_case::ScanUseCaseError,
};
use crate::utils::errors::RequestError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口。
/// 请求校验错误映射为 400，提供商未配置为 503，其余为 500。
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<ScanUseCaseError>() {
            return match err {
                ScanUseCaseError::ValidationError(_) | ScanUseCaseError::Request(_) => {
                    StatusCode::BAD_REQUEST
                }
                ScanUseCaseError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
        }
        if self.0.downcast_ref::<CheckUseCaseError>().is_some()
            || self.0.downcast_ref::<RequestError>().is_some()
        {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "success": false, "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::ocr::OcrProvider;

    #[test]
    fn test_status_mapping() {
        let err: AppError = ScanUseCaseError::from(RequestError::MissingUrls).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = ScanUseCaseError::ProviderUnavailable(OcrProvider::Google).into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err: AppError = CheckUseCaseError::ValidationError("text".to_string()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: AppError = anyhow::anyhow!("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
