use serde::Serialize;

use crate::models::DocumentMeta;

#[derive(Debug, Serialize)]
pub struct DocumentsResponse {
    pub docs_meta: Vec<DocumentMeta>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
}
