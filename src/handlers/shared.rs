use actix_web::{HttpResponse, error::JsonPayloadError, web};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    // 200 with data
    pub fn success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: Some(data),
            message: None,
        })
    }

    // 201 with data and message
    pub fn created(data: T, message: &str) -> HttpResponse {
        HttpResponse::Created().json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
        })
    }

    // 200 with data and message
    pub fn success_with_message(data: T, message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: Some(data),
            message: Some(message.to_string()),
        })
    }
}

impl ApiResponse<()> {
    // 200 without data
    pub fn ok_with_message(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
        })
    }

    // Error body (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// Malformed or mistyped JSON bodies become 422 envelopes instead of actix's
/// plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req| {
        AppError::validation(format!("invalid request body: {}", err)).into()
    })
}
