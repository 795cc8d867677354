// Scheduling analysis operations.
// Each request type composes its own prompt and fallback; the shared service
// sends it through the completion gateway and salvages the answer.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod requests;
pub mod schemas;
pub mod service;

use serde_json::Value;

use crate::llm_client::prompts::{json_expert_system, ComposedPrompt};
use crate::llm_client::{ChatMessage, CompletionOptions, MAX_TOKENS};
use crate::recovery::schema::ResultSchema;
use crate::recovery::scrape::Scraper;
use crate::recovery::{Contract, FallbackReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AnalyzeConstraints,
    AnalyzeConflicts,
    ExplainSchedule,
    OptimizeParameters,
}

impl Operation {
    pub fn name(self) -> &'static str {
        self.schema().name
    }

    pub fn schema(self) -> &'static ResultSchema {
        match self {
            Operation::AnalyzeConstraints => &schemas::CONSTRAINT_ANALYSIS,
            Operation::AnalyzeConflicts => &schemas::CONFLICT_ANALYSIS,
            Operation::ExplainSchedule => &schemas::SCHEDULE_EXPLANATION,
            Operation::OptimizeParameters => &schemas::PARAMETER_OPTIMIZATION,
        }
    }

    pub fn options(self) -> CompletionOptions {
        let temperature = match self {
            Operation::AnalyzeConstraints | Operation::OptimizeParameters => 0.3,
            Operation::AnalyzeConflicts | Operation::ExplainSchedule => 0.4,
        };
        CompletionOptions {
            temperature,
            max_tokens: MAX_TOKENS,
            json_response: true,
        }
    }

    /// Only the two answer shapes that break most often get a scraper.
    pub fn scraper(self) -> Option<Scraper> {
        match self {
            Operation::AnalyzeConstraints => Some(Scraper::Constraints),
            Operation::ExplainSchedule => Some(Scraper::ScheduleRationale),
            Operation::AnalyzeConflicts | Operation::OptimizeParameters => None,
        }
    }

    pub fn system_prompt(self) -> String {
        json_expert_system(match self {
            Operation::AnalyzeConstraints => prompts::CONSTRAINT_EXPERT,
            Operation::AnalyzeConflicts => prompts::CONFLICT_EXPERT,
            Operation::ExplainSchedule => prompts::EXPLANATION_EXPERT,
            Operation::OptimizeParameters => prompts::OPTIMIZATION_EXPERT,
        })
    }
}

/// A request body for one of the analysis operations.
pub trait AnalysisRequest {
    const OPERATION: Operation;

    fn user_prompt(&self) -> String;

    /// Canned answer for this request; must validate against the schema.
    fn fallback(&self) -> Value;

    /// Some requests are answered from the fallback without a model call.
    fn skip_reason(&self) -> Option<FallbackReason> {
        None
    }

    fn compose(&self) -> ComposedPrompt {
        ComposedPrompt {
            system: Self::OPERATION.system_prompt(),
            messages: vec![ChatMessage::user(self.user_prompt())],
            options: Self::OPERATION.options(),
        }
    }

    fn contract(&self) -> Contract {
        Contract {
            schema: Self::OPERATION.schema(),
            fallback: self.fallback(),
            scraper: Self::OPERATION.scraper(),
        }
    }
}
