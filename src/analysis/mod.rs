//! Content repurposing analysis
//!
//! Turns a finished transcript into a structured analysis: a prompt goes
//! to an LLM through a retrying invoker, the response survives extraction
//! and truncation repair, and normalization coerces it into the strict
//! schema. The orchestrator streams progress and commits results to the
//! session store.

mod llm;
mod models;
mod normalize;
mod pipeline;
mod prompt;
mod repair;
mod types;

pub use llm::LlmClient;
pub use models::{default_model, ModelOption, AVAILABLE_MODELS};
pub use normalize::normalize_analysis;
pub use pipeline::{AnalysisPipeline, AnalyzeEvent, LlmInvoker};
pub use prompt::{build_analysis_prompt, format_transcript_with_timecodes};
pub use repair::parse_analysis_json;
pub use types::*;
