use serde::{Deserialize, Serialize};

use crate::models::Turn;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub give_final: bool,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: String,
    pub history: Vec<Turn>,
}
