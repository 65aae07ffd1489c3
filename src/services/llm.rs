use anyhow::{Context, Result};
use rig::client::completion::CompletionClientDyn;
use rig::client::embeddings::EmbeddingsClientDyn;
use rig::client::{ProviderClient, ProviderValue};
use rig::completion::Prompt;
use rig::providers::{cohere, gemini, mistral, ollama, openai};

// Embedding requests are batched to stay under provider payload limits.
const EMBED_BATCH_SIZE: usize = 100;

fn create_provider_boxed(provider: &str, api_key: &str) -> Result<Box<dyn ProviderClient>> {
    let value = ProviderValue::Simple(api_key.to_string());

    let boxed: Box<dyn ProviderClient> = match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let c: gemini::Client<reqwest::Client> = gemini::Client::from_val(value);
            c.boxed()
        }
        "openai" => {
            let c: openai::Client<reqwest::Client> = openai::Client::from_val(value);
            c.boxed()
        }
        "cohere" => {
            let c: cohere::Client<reqwest::Client> = cohere::Client::from_val(value);
            c.boxed()
        }
        "mistral" => {
            let c: mistral::Client<reqwest::Client> = mistral::Client::from_val(value);
            c.boxed()
        }
        "ollama" => {
            let c: ollama::Client<reqwest::Client> = ollama::Client::from_val(value);
            c.boxed()
        }
        other => return Err(anyhow::anyhow!("Unsupported provider: {other}")),
    };

    Ok(boxed)
}

pub fn create_completion_client(
    provider: &str,
    api_key: &str,
) -> Result<Box<dyn CompletionClientDyn>> {
    let boxed = create_provider_boxed(provider, api_key)?;
    boxed
        .as_completion()
        .context(format!("Provider '{provider}' does not support completions"))
}

pub fn create_embeddings_client(
    provider: &str,
    api_key: &str,
) -> Result<Box<dyn EmbeddingsClientDyn>> {
    let boxed = create_provider_boxed(provider, api_key)?;
    boxed
        .as_embeddings()
        .context(format!("Provider '{provider}' does not support embeddings"))
}

/// Embeds a batch of chunk texts, preserving order. Provider vectors come
/// back as f64; the index stores f32.
pub async fn embed_texts(
    provider: &str,
    api_key: &str,
    model_name: &str,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let client = create_embeddings_client(provider, api_key)?;
    let model = EmbeddingsClientDyn::embedding_model(client.as_ref(), model_name);

    let mut vectors = Vec::with_capacity(texts.len());
    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        let embeddings = model
            .embed_texts(batch.to_vec())
            .await
            .map_err(|e| anyhow::anyhow!("Embedding error: {e}"))?;

        vectors.extend(
            embeddings
                .into_iter()
                .map(|e| e.vec.into_iter().map(|v| v as f32).collect::<Vec<f32>>()),
        );
    }

    Ok(vectors)
}

pub async fn embed_query(
    provider: &str,
    api_key: &str,
    model_name: &str,
    query: &str,
) -> Result<Vec<f32>> {
    let client = create_embeddings_client(provider, api_key)?;
    let model = EmbeddingsClientDyn::embedding_model(client.as_ref(), model_name);

    let embedding = model
        .embed_text(query)
        .await
        .map_err(|e| anyhow::anyhow!("Embedding error: {e}"))?;

    Ok(embedding.vec.into_iter().map(|v| v as f32).collect())
}

/// Single-turn completion: the tutor instruction and retrieved context ride
/// in the preamble, the student's question is the message.
pub async fn complete(
    provider: &str,
    api_key: &str,
    model_name: &str,
    preamble: &str,
    message: &str,
) -> Result<String> {
    let client = create_completion_client(provider, api_key)?;

    let agent = client.agent(model_name).preamble(preamble).build();

    agent
        .prompt(message)
        .await
        .map_err(|e| anyhow::anyhow!("LLM error: {e}"))
}
