// LLM prompt constants for the analysis operations.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Expert roles used to build the JSON-only system prompts.
pub const CONSTRAINT_EXPERT: &str = "scheduling system analysis expert";
pub const CONFLICT_EXPERT: &str = "scheduling conflict resolution expert";
pub const EXPLANATION_EXPERT: &str = "scheduling decision explanation expert";
pub const OPTIMIZATION_EXPERT: &str = "scheduling parameter optimization expert";

/// Constraint analysis prompt. Replace: {input}, {json_only}
pub const CONSTRAINT_ANALYSIS_PROMPT: &str = r#"Analyze the following course scheduling requirement description and extract all explicit or implicit constraints.

Requirement description:
{input}

Please return the results in JSON format, including two arrays:
1. explicitConstraints - clearly expressed requirements
2. implicitConstraints - constraints that are not explicitly expressed but can be inferred

Each constraint should include:
- id: unique identifier (explicit constraints start from 101, implicit constraints start from 201)
- name: short name of the constraint (in English)
- description: detailed description of the constraint (in English)
- type: constraint type ("Hard" for non-negotiable requirements, "Soft" for flexible preferences)
- weight: constraint weight (1.0 indicates highest priority, 0 indicates unimportance)

Notes:
- Explicit constraints can be either Hard or Soft type, depending on the wording and importance in the requirement description
- All implicit constraints must be set to "Soft" type as they are inferred by the system, not explicitly required by the user
- The weights of implicit constraints should be between 0.5 and 0.9, indicating they are flexible preferences rather than hard requirements

{json_only}"#;

/// Conflict analysis prompt. Replace: {conflict_json}, {json_only}
pub const CONFLICT_ANALYSIS_PROMPT: &str = r#"Analyze the following course scheduling conflict and identify its root cause and potential solutions.

Conflict details:
{conflict_json}

Please return your analysis as a JSON object with this structure:
{
  "rootCause": "A clear explanation of why the conflict happens",
  "solutions": [
    {
      "id": 1,
      "description": "Detailed description of the solution",
      "compatibility": 85,
      "impacts": ["Each effect the change has on the rest of the schedule"]
    }
  ]
}

Rules:
- Provide between one and three solutions, ordered from most to least recommended
- compatibility is a number from 0 to 100 describing how well the solution fits the existing schedule
- impacts is always an array of strings, even when there is a single impact

{json_only}"#;

/// Schedule explanation prompt. Replace: {schedule_json}, {json_only}
pub const SCHEDULE_EXPLANATION_PROMPT: &str = r#"Explain the rationale behind the following course scheduling decision.

Schedule item:
{schedule_json}

Please return your explanation in JSON format with the following structure:
1. timeRationale: Explanation of why this time slot was chosen
2. classroomRationale: Explanation of why this classroom was selected
3. teacherRationale: Explanation of why this teacher was assigned
4. overallRationale: Overall explanation of the scheduling decision
5. alternativesConsidered: Array of alternatives that were considered but not chosen, each with:
   - type: Type of alternative ("Time", "Classroom", "Teacher")
   - alternative: Description of the alternative
   - whyNotChosen: Explanation of why this alternative was not chosen

Ensure all explanations are clear, logical, and focused on the specific scheduling decision.
{json_only}"#;

/// Parameter optimization prompt. Replace: {current_parameters}, {historical_data}, {json_only}
pub const PARAMETER_OPTIMIZATION_PROMPT: &str = r#"Analyze the following current parameters and historical data, and suggest parameter optimizations to improve scheduling system performance.

Current parameters:
{current_parameters}

Historical data:
{historical_data}

Please return optimization suggestions in JSON format, including two parts:
1. optimizationSuggestions - array of optimization suggestions for existing parameters
2. newParameterSuggestions - array of suggestions for new parameters to add (optional)

Each optimization suggestion should include:
- parameterName: parameter name
- currentValue: current value (as string)
- suggestedValue: suggested value (as string)
- rationale: reason for the suggestion
- expectedEffect: expected effect

Each new parameter suggestion should include:
- parameterName: parameter name
- suggestedValue: suggested value (as string)
- rationale: reason for adding this parameter
- expectedEffect: expected effect

{json_only}"#;

/// Substituted for {historical_data} when the caller sends none.
pub const NO_HISTORICAL_DATA: &str = "No historical data available";

/// Requests shorter than this (in characters, trimmed) skip the model call.
pub const MIN_CONSTRAINT_INPUT_CHARS: usize = 10;
