use serde::Serialize;

/// A selectable LLM option exposed to the client.
#[derive(Debug, Clone, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    /// Typical cost in USD for one analysis (~6k in + ~4k out tokens).
    #[serde(rename = "estimatedCost", skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
}

/// The static model catalog served by `/api/analyze/models`.
pub const AVAILABLE_MODELS: &[ModelOption] = &[
    ModelOption {
        id: "google/gemini-3.1-pro-preview",
        name: "Gemini 3.1 Pro",
        estimated_cost: Some(0.06),
    },
    ModelOption {
        id: "anthropic/claude-sonnet-4.6",
        name: "Claude Sonnet 4.6",
        estimated_cost: Some(0.08),
    },
    ModelOption {
        id: "anthropic/claude-opus-4.6",
        name: "Claude Opus 4.6",
        estimated_cost: Some(0.13),
    },
    ModelOption {
        id: "deepseek/deepseek-v3.2",
        name: "DeepSeek V3.2",
        estimated_cost: Some(0.003),
    },
    ModelOption {
        id: "openai/gpt-5.1",
        name: "GPT-5.1",
        estimated_cost: Some(0.05),
    },
    ModelOption {
        id: "qwen/qwen3.5-plus-02-15",
        name: "Qwen 3.5 Plus",
        estimated_cost: Some(0.01),
    },
    ModelOption {
        id: "meta-llama/llama-4-maverick",
        name: "Llama 4 Maverick",
        estimated_cost: Some(0.003),
    },
    ModelOption {
        id: "mistralai/mistral-large-2512",
        name: "Mistral Large 3",
        estimated_cost: Some(0.01),
    },
    ModelOption {
        id: "x-ai/grok-4.1-fast",
        name: "Grok 4.1 Fast",
        estimated_cost: Some(0.003),
    },
    ModelOption {
        id: "google/gemini-3-flash-preview",
        name: "Gemini 3 Flash",
        estimated_cost: Some(0.02),
    },
];

/// The fallback model used when the client does not pick one.
pub fn default_model() -> &'static str {
    AVAILABLE_MODELS[0].id
}
