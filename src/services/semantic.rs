use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::similarity::{SimilarityError, SkillSimilarity};

const SYSTEM_PROMPT: &str = "You are a skill matching expert. Return only a decimal number.";

impl From<reqwest::Error> for SimilarityError {
    fn from(e: reqwest::Error) -> Self {
        SimilarityError::Transport(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Remote skill-similarity backend over an OpenAI-compatible chat-completions API
///
/// Makes exactly one request per call; retries and fallback are left to
/// `ResilientSimilarity`.
#[derive(Clone)]
pub struct SemanticSimilarityClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_skills: usize,
}

impl SemanticSimilarityClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
        max_skills: usize,
    ) -> Result<Self, SimilarityError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
            max_skills: max_skills.max(1),
        })
    }

    fn prompt(&self, candidate: &[String], target: &[String]) -> String {
        let head = |skills: &[String]| {
            skills
                .iter()
                .take(self.max_skills)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Compare these two skill lists and return a similarity score from 0 to 1.\n\n\
             Candidate skills: {}\n\
             Target skills: {}\n\n\
             Consider semantic similarity (e.g., \"Python programming\" matches \"Python\", \
             \"stakeholder management\" matches \"stakeholder communication\").\n\n\
             Return ONLY a number between 0 and 1.",
            head(candidate),
            head(target)
        )
    }
}

/// Parse the model reply as a bare number and clamp it into [0, 1]
pub fn parse_score(reply: &str) -> Result<f64, SimilarityError> {
    let trimmed = reply.trim();
    let score: f64 = trimmed
        .parse()
        .map_err(|_| SimilarityError::Malformed(format!("not a number: {trimmed:?}")))?;

    if !score.is_finite() {
        return Err(SimilarityError::Malformed(format!(
            "non-finite score: {trimmed}"
        )));
    }

    Ok(score.clamp(0.0, 1.0))
}

#[async_trait]
impl SkillSimilarity for SemanticSimilarityClient {
    async fn similarity(
        &self,
        candidate: &[String],
        target: &[String],
    ) -> Result<f64, SimilarityError> {
        let prompt = self.prompt(candidate, target);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        tracing::debug!(
            "Requesting similarity for {} vs {} skills",
            candidate.len(),
            target.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SimilarityError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SimilarityError::Malformed(e.to_string()))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SimilarityError::Malformed("response had no content".to_string()))?;

        parse_score(&reply)
    }

    fn backend(&self) -> &'static str {
        "semantic"
    }
}

impl std::fmt::Debug for SemanticSimilarityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticSimilarityClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_skills", &self.max_skills)
            .finish()
    }
}
