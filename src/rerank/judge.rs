//! Judge-score reranking: each document is scored individually by asking
//! the LLM for a 1-10 relevance rating. One bad score degrades ranking to 0
//! for that document; it never fails the whole request.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{AdvisorError, Result};

/// Concurrent judge calls per rerank request.
const SCORE_CONCURRENCY: usize = 4;

/// Score every document against the query, one LLM call per document with
/// bounded concurrency. Returns scores aligned with `documents`.
///
/// Transport failures propagate as retrieval errors; an answer that parses
/// to nothing becomes 0.0.
pub async fn score_documents(
    client: &reqwest::Client,
    config: &LlmConfig,
    query: &str,
    documents: &[String],
) -> Result<Vec<f32>> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(SCORE_CONCURRENCY));
    let mut handles = Vec::with_capacity(documents.len());

    for document in documents {
        let client = client.clone();
        let config = config.clone();
        let prompt = build_judge_prompt(query, document);
        let sem = semaphore.clone();

        let handle = tokio::spawn(async move {
            let _permit = sem.acquire().await;
            score_single(&client, &config, &prompt).await
        });
        handles.push(handle);
    }

    let mut scores = Vec::with_capacity(documents.len());
    for handle in handles {
        let score = handle
            .await
            .map_err(|e| AdvisorError::retrieval(format!("judge task panicked: {e}")))??;
        scores.push(score);
    }

    Ok(scores)
}

async fn score_single(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
) -> Result<f32> {
    let response = match config.provider.as_str() {
        "ollama" => call_ollama(client, config, prompt).await?,
        "openai" => call_openai(client, config, prompt).await?,
        other => {
            return Err(AdvisorError::configuration(format!(
                "unknown LLM provider: {other}"
            )))
        }
    };

    Ok(parse_relevance_score(&response))
}

fn build_judge_prompt(query: &str, document: &str) -> String {
    format!(
        "On a scale of 1-10, rate the relevance of the following document to the query. \
         Consider the specific context and intent of the query, not just keyword matches.\n\
         Query: {query}\n\
         Document: {document}\n\
         Respond with ONLY a JSON object: {{\"relevance_score\": <number>}}"
    )
}

/// Parse a relevance score out of an LLM answer. Defaults to 0 on anything
/// unparseable so that one bad answer degrades ranking, not the request.
fn parse_relevance_score(content: &str) -> f32 {
    // Structured answer first
    if let Ok(v) = serde_json::from_str::<RelevanceAnswer>(content) {
        return v.relevance_score;
    }

    // JSON object embedded in prose
    if let Some(start) = content.find('{') {
        if let Some(end) = content.rfind('}') {
            if let Ok(v) = serde_json::from_str::<RelevanceAnswer>(&content[start..=end]) {
                return v.relevance_score;
            }
        }
    }

    // Bare number
    if let Ok(v) = content.trim().parse::<f32>() {
        return v;
    }

    // Number following "score" ("Relevance Score: 7")
    let lower = content.to_lowercase();
    if let Some(pos) = lower.rfind("score") {
        if let Some(v) = first_number(&lower[pos + "score".len()..]) {
            return v;
        }
    }

    // Last number in the answer: replies often restate the 1-10 scale
    // before giving the actual rating.
    numbers(&lower).last().unwrap_or(0.0)
}

fn first_number(s: &str) -> Option<f32> {
    numbers(s).next()
}

fn numbers(s: &str) -> impl Iterator<Item = f32> + '_ {
    s.split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<f32>().ok())
}

#[derive(Deserialize)]
struct RelevanceAnswer {
    relevance_score: f32,
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

async fn call_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: config.chat_model.clone(),
        messages: vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        stream: false,
    };

    let resp = client
        .post(&url)
        .json(&req)
        .send()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("failed to reach Ollama for judging: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AdvisorError::retrieval(format!(
            "Ollama judge call returned {status}: {body}"
        )));
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("malformed Ollama judge response: {e}")))?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

async fn call_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    prompt: &str,
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: config.chat_model.clone(),
        messages: vec![OpenAiMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        temperature: 0.0,
        max_tokens: 50,
    };

    let resp = client
        .post(&url)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&req)
        .send()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("failed to reach OpenAI for judging: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(AdvisorError::retrieval(format!(
            "OpenAI judge call returned {status}: {body}"
        )));
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .map_err(|e| AdvisorError::retrieval(format!("malformed OpenAI judge response: {e}")))?;
    Ok(body
        .choices
        .first()
        .map(|c| c.message.content.clone())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_json() {
        assert_eq!(parse_relevance_score(r#"{"relevance_score": 8.5}"#), 8.5);
    }

    #[test]
    fn test_parse_json_embedded_in_text() {
        let input = "Sure! Here is my rating: {\"relevance_score\": 7} Hope that helps.";
        assert_eq!(parse_relevance_score(input), 7.0);
    }

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_relevance_score(" 6 "), 6.0);
        assert_eq!(parse_relevance_score("9.5"), 9.5);
    }

    #[test]
    fn test_parse_number_with_label() {
        assert_eq!(parse_relevance_score("Relevance Score: 4"), 4.0);
    }

    #[test]
    fn test_parse_reply_restating_the_scale() {
        // The leading "1-10" must not win over the actual rating
        assert_eq!(
            parse_relevance_score("On a scale of 1-10, I rate it 8"),
            8.0
        );
        assert_eq!(
            parse_relevance_score("Out of 10, this gets a relevance score of 6."),
            6.0
        );
    }

    #[test]
    fn test_parse_garbage_defaults_to_zero() {
        assert_eq!(parse_relevance_score("I cannot rate this document."), 0.0);
        assert_eq!(parse_relevance_score(""), 0.0);
    }

    #[test]
    fn test_parse_malformed_json_falls_back_to_number() {
        // Broken JSON but a digit is still present
        assert_eq!(parse_relevance_score("{relevance_score: 3"), 3.0);
    }

    #[test]
    fn test_judge_prompt_mentions_scale_and_inputs() {
        let prompt = build_judge_prompt("best gpu for gaming", "RTX 4070 Ti, 12GB");
        assert!(prompt.contains("1-10"));
        assert!(prompt.contains("best gpu for gaming"));
        assert!(prompt.contains("RTX 4070 Ti"));
    }
}
