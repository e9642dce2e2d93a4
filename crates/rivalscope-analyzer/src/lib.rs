//! Turns a scraped page into a [`CompetitorAnalysis`] via a hosted language
//! model.
//!
//! The stages are exposed individually ([`build_prompt`],
//! [`CompletionClient::complete`], [`parse_analysis`]) so the server can put
//! its own deadline and retry policy around the model call, and bundled in
//! [`Analyzer`] for one-shot use.

pub mod error;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod response;

pub use error::AnalyzerError;
pub use model::{ChatCompletionsClient, CompletionClient};
pub use pipeline::Analyzer;
pub use prompt::{build_prompt, build_prompt_with_schema, AnalysisSchema, PromptPair};
pub use response::parse_analysis;
pub use rivalscope_core::CompetitorAnalysis;
