//! Prompt and fallback wiring for each analysis request body.

use serde_json::Value;

use super::models::{
    ConflictAnalysisRequest, ConstraintAnalysisRequest, ParameterOptimizationRequest,
    ScheduleExplanationRequest,
};
use super::prompts::{
    CONFLICT_ANALYSIS_PROMPT, CONSTRAINT_ANALYSIS_PROMPT, MIN_CONSTRAINT_INPUT_CHARS,
    NO_HISTORICAL_DATA, PARAMETER_OPTIMIZATION_PROMPT, SCHEDULE_EXPLANATION_PROMPT,
};
use super::{fallback, AnalysisRequest, Operation};
use crate::llm_client::prompts::{fill_template, pretty_json};
use crate::recovery::FallbackReason;

impl AnalysisRequest for ConstraintAnalysisRequest {
    const OPERATION: Operation = Operation::AnalyzeConstraints;

    fn user_prompt(&self) -> String {
        fill_template(CONSTRAINT_ANALYSIS_PROMPT, &[("input", self.input.as_str())])
    }

    fn fallback(&self) -> Value {
        fallback::constraint_analysis()
    }

    fn skip_reason(&self) -> Option<FallbackReason> {
        (self.input.trim().chars().count() < MIN_CONSTRAINT_INPUT_CHARS)
            .then_some(FallbackReason::InputTooShort)
    }
}

impl AnalysisRequest for ConflictAnalysisRequest {
    const OPERATION: Operation = Operation::AnalyzeConflicts;

    fn user_prompt(&self) -> String {
        let conflict_json = pretty_json(&self.conflict);
        fill_template(
            CONFLICT_ANALYSIS_PROMPT,
            &[("conflict_json", conflict_json.as_str())],
        )
    }

    fn fallback(&self) -> Value {
        fallback::conflict_analysis(&self.conflict)
    }
}

impl AnalysisRequest for ScheduleExplanationRequest {
    const OPERATION: Operation = Operation::ExplainSchedule;

    fn user_prompt(&self) -> String {
        let schedule_json = pretty_json(&self.schedule_item);
        fill_template(
            SCHEDULE_EXPLANATION_PROMPT,
            &[("schedule_json", schedule_json.as_str())],
        )
    }

    fn fallback(&self) -> Value {
        fallback::schedule_explanation(&self.schedule_item)
    }
}

impl AnalysisRequest for ParameterOptimizationRequest {
    const OPERATION: Operation = Operation::OptimizeParameters;

    fn user_prompt(&self) -> String {
        let current_parameters = pretty_json(&self.current_parameters);
        let historical_data = self
            .historical_data
            .as_ref()
            .filter(|data| !data.is_empty())
            .map(pretty_json)
            .unwrap_or_else(|| NO_HISTORICAL_DATA.to_string());

        fill_template(
            PARAMETER_OPTIMIZATION_PROMPT,
            &[
                ("current_parameters", current_parameters.as_str()),
                ("historical_data", historical_data.as_str()),
            ],
        )
    }

    fn fallback(&self) -> Value {
        fallback::parameter_optimization()
    }
}
