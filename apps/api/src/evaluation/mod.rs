// Resume evaluation pipeline.
// Implements: rubric group grading with retries, concurrent dispatch and merge,
// local scoring, overview synthesis, usage and cost accounting.
// All reasoning-service calls go through the ReasoningService trait in llm_client.

pub mod coordinator;
pub mod cost;
pub mod engine;
pub mod group_evaluator;
pub mod handlers;
pub mod models;
pub mod overview;
pub mod progress;
pub mod prompt_builder;
pub mod prompts;
pub mod scoring;
pub mod verdicts;

#[cfg(test)]
pub(crate) mod testing;
