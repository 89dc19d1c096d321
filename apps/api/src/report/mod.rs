// ROI report engine.
// Implements: prompt building, the normalizer/validator for model output, and orchestration.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod normalizer;
pub mod prompt_builder;
pub mod prompts;
pub mod service;
