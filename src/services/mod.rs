pub mod llm;
pub mod pdf;
pub mod prompt;
pub mod snapshot;
pub mod storage;
