use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct ConstraintAnalysisRequest {
    pub input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConflictAnalysisRequest {
    pub conflict: Conflict,
}

/// A scheduling conflict as reported by the scheduling system.
/// Unknown fields are kept so they reach the prompt too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub description: String,
    #[serde(rename = "type")]
    pub conflict_type: String,
    #[serde(default)]
    pub involved_courses: Vec<InvolvedCourse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Every field is optional. Callers label courses differently
/// (`courseName`, `courseCode`, ...), and those keys are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvolvedCourse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub teacher: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classroom: String,
    /// Free-form: a label like "Mon 09:00-11:00" or a structured slot.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub time_slot: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InvolvedCourse {
    /// The best human label: `name`, then `courseName`, then a course code.
    pub fn label(&self) -> Option<&str> {
        let extra = |key: &str| self.extra.get(key).and_then(Value::as_str);
        [
            Some(self.name.as_str()),
            extra("courseName"),
            Some(self.code.as_str()),
            extra("courseCode"),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleExplanationRequest {
    pub schedule_item: ScheduleItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub course_name: String,
    pub course_code: String,
    pub teacher_name: String,
    pub classroom: String,
    pub day_name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterOptimizationRequest {
    pub current_parameters: Map<String, Value>,
    #[serde(default)]
    pub historical_data: Option<Map<String, Value>>,
}
