use crate::config::GEMINI_API_KEY_VAR;
use crate::models::Strategy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

/// Client for the Gemini generateContent API.
///
/// Two operations: turning a plain-English description into a
/// structured Strategy, and producing free-text optimization
/// suggestions for an existing one. Failures never leak a partially
/// populated Strategy; there is deliberately no retry here - the
/// caller decides whether to ask again.
pub struct StrategyAssistant {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl StrategyAssistant {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the environment, failing fast when the
    /// credential is absent.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(GEMINI_API_KEY_VAR)
            .map_err(|_| Error::MissingConfiguration(GEMINI_API_KEY_VAR))?;
        Ok(Self::new(api_key))
    }

    /// Override the API base URL (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse a plain-English description into a structured Strategy
    /// using the model's JSON schema mode.
    pub async fn generate_strategy(&self, description: &str) -> Result<Strategy> {
        let prompt = format!(
            "Parse the following user request into a structured trading strategy. \
             Be creative but stick to the user's core logic. If they mention a \
             specific stock, ignore it and make the rule generic.\n\n\
             User Request: \"{}\"",
            description
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(json!({
                "responseMimeType": "application/json",
                "responseSchema": strategy_schema(),
            })),
        };

        let text = self.generate_content(&request).await?;

        let strategy: Strategy = serde_json::from_str(&text)
            .map_err(|e| Error::ExternalService(format!("malformed strategy JSON: {}", e)))?;
        validate_strategy(&strategy)?;

        tracing::info!("Generated strategy '{}' from description", strategy.name);
        Ok(strategy)
    }

    /// Ask for one or two concise improvement suggestions
    pub async fn optimize_strategy(&self, strategy: &Strategy) -> Result<String> {
        let prompt = format!(
            "Analyze the following trading strategy and provide one or two concise, \
             actionable suggestions for improvement. Focus on parameter tuning, \
             complementary indicators, or risk management. Keep the suggestions \
             brief and to the point.\n\n\
             Strategy Name: {}\n\
             Description: {}\n\
             Entry Rule: {}\n\
             Exit Rule: {}\n\
             Stop-Loss: {}",
            strategy.name,
            strategy.description,
            strategy.rules.entry,
            strategy.rules.exit,
            strategy.rules.stop_loss.as_deref().unwrap_or("Not specified"),
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: None,
        };

        self.generate_content(&request).await
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, MODEL)
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::ExternalService(format!("network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let decoded: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("JSON decode error: {}", e)))?;

        let text = decoded
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| Error::ExternalService("empty response from model".to_string()))?;

        Ok(strip_code_fences(text))
    }
}

/// Response schema for structured strategy output
fn strategy_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": {
                "type": "STRING",
                "description": "A creative and descriptive name for the trading strategy."
            },
            "description": {
                "type": "STRING",
                "description": "A one-sentence summary of what the strategy does."
            },
            "rules": {
                "type": "OBJECT",
                "properties": {
                    "entry": {
                        "type": "STRING",
                        "description": "The specific condition(s) for entering a trade."
                    },
                    "exit": {
                        "type": "STRING",
                        "description": "The specific condition(s) for exiting a trade."
                    },
                    "stopLoss": {
                        "type": "STRING",
                        "description": "An optional rule for a stop-loss to manage risk."
                    }
                },
                "required": ["entry", "exit"]
            }
        },
        "required": ["name", "description", "rules"]
    })
}

/// Models sometimes wrap JSON in markdown code blocks despite the MIME
/// type hint
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
            .to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_strategy(strategy: &Strategy) -> Result<()> {
    if strategy.name.trim().is_empty()
        || strategy.description.trim().is_empty()
        || strategy.rules.entry.trim().is_empty()
    {
        return Err(Error::ExternalService(
            "generated strategy is missing required fields".to_string(),
        ));
    }
    Ok(())
}
