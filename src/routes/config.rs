use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub api_key: String,
    pub subjects: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub subjects: Option<Vec<String>>,
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let settings = state.settings.lock().await;
    Json(ConfigResponse {
        api_key: settings.api_key.clone(),
        subjects: settings.subjects.clone(),
    })
}

pub async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<UpdateConfigRequest>,
) -> Result<Json<ConfigResponse>, AppError> {
    let mut settings = state.settings.lock().await;

    if let Some(api_key) = payload.api_key {
        if api_key.trim().is_empty() {
            return Err(AppError::Validation("API key cannot be empty".to_string()));
        }
        settings.api_key = api_key.trim().to_string();
    }

    if let Some(subjects) = payload.subjects {
        let subjects: Vec<String> = subjects
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if subjects.is_empty() {
            return Err(AppError::Validation(
                "Subject list cannot be empty".to_string(),
            ));
        }
        settings.subjects = subjects;
    }

    Ok(Json(ConfigResponse {
        api_key: settings.api_key.clone(),
        subjects: settings.subjects.clone(),
    }))
}
