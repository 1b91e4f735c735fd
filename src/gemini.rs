//! Gemini API client
//!
//! Implements `ChatModel` over the `generateContent` endpoint, including
//! function declarations and function-call round trips.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::error::StudioError;
use crate::llm::{ChatModel, ModelReply, ModelRequest, ToolCall, ToolSpec, Turn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: impl Into<String>) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ModelRequest) -> crate::Result<ModelReply> {
        if self.api_key.is_empty() {
            return Err(StudioError::Config(
                "GOOGLE_API_KEY not configured".to_string(),
            ));
        }

        let body = build_request(request);

        debug!(
            model = %self.model,
            turns = request.turns.len(),
            tools = request.tools.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                StudioError::LlmError(format!("Gemini API request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "Gemini API error response");
            return Err(StudioError::Upstream {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            StudioError::LlmError(format!("Gemini parse error: {}", e))
        })?;

        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                model = %self.model,
                prompt_tokens = usage.prompt_token_count,
                output_tokens = usage.candidates_token_count,
                "Gemini response received"
            );
        }

        into_reply(gemini_response)
    }
}

fn build_request(request: &ModelRequest) -> GeminiRequest {
    let contents = request.turns.iter().map(convert_turn).collect();

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(vec![GeminiTools {
            function_declarations: request.tools.iter().map(convert_tool).collect(),
        }])
    };

    GeminiRequest {
        contents,
        system_instruction: Some(SystemInstruction {
            parts: vec![Part::Text {
                text: request.system.clone(),
            }],
        }),
        tools,
        generation_config: GenerationConfig {
            temperature: 0.7,
            top_p: 0.95,
            max_output_tokens: 8192,
        },
    }
}

fn convert_turn(turn: &Turn) -> Content {
    match turn {
        Turn::User(text) => Content {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.clone() }],
        },
        Turn::Model(reply) => {
            let mut parts = Vec::with_capacity(reply.tool_calls.len() + 1);
            if !reply.text.is_empty() {
                parts.push(Part::Text {
                    text: reply.text.clone(),
                });
            }
            parts.extend(reply.tool_calls.iter().map(|call| Part::FunctionCall {
                function_call: FunctionCall {
                    name: call.name.clone(),
                    args: call.args.clone(),
                },
                thought_signature: call.thought_signature.clone(),
            }));
            Content {
                role: "model".to_string(),
                parts,
            }
        }
        Turn::ToolResults(results) => Content {
            role: "user".to_string(),
            parts: results
                .iter()
                .map(|result| Part::FunctionResponse {
                    function_response: FunctionResponse {
                        name: result.name.clone(),
                        response: result.response.clone(),
                    },
                })
                .collect(),
        },
    }
}

fn convert_tool(tool: &ToolSpec) -> FunctionDeclaration {
    FunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.parameters.clone(),
    }
}

fn into_reply(response: GeminiResponse) -> crate::Result<ModelReply> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| StudioError::LlmError("No response from Gemini API".to_string()))?;

    let mut reply = ModelReply::default();
    for part in candidate.content.parts {
        match part {
            Part::Text { text } => reply.text.push_str(&text),
            Part::FunctionCall {
                function_call,
                thought_signature,
            } => reply.tool_calls.push(ToolCall {
                name: function_call.name,
                args: function_call.args,
                thought_signature,
            }),
            Part::FunctionResponse { .. } => {}
        }
    }

    if reply.text.trim().is_empty() && !reply.wants_tools() {
        return Err(StudioError::LlmError(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(reply)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTools>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: FunctionCall,
        // Thinking models require the signature echoed back with the call.
        #[serde(
            rename = "thoughtSignature",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        thought_signature: Option<String>,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: FunctionResponse,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTools {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Content,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: i32,
    #[serde(default)]
    candidates_token_count: i32,
}
