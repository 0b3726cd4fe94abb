//! AI integration for task management.
//!
//! This module provides:
//! - AI provider abstraction (Anthropic, OpenAI)
//! - Prompt template system with Handlebars
//! - Structured, validated request/response schemas
//! - The [`PromptService`] seam the domain layer talks to

pub mod prompts;
pub mod provider;
pub mod schemas;
pub mod service;

// Provider implementations
pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAIProvider;
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{
    parse_ai_response, AIMessage, AIProvider, AIResponse, AIRole, GenerateOptions, TokenUsage,
};
pub use schemas::{PrioritizedTask, SuggestTitlesInput, SuggestTitlesOutput, TaskToPrioritize};
pub use service::{PromptService, ProviderPromptService};
