//! Canned results returned when a completion cannot be salvaged.
//!
//! Each builder returns a valid instance of its operation's schema. The
//! conflict and schedule answers echo the request so the caller still sees
//! something about *their* data.

use serde_json::{json, Value};

use super::models::{Conflict, InvolvedCourse, ScheduleItem};

pub fn constraint_analysis() -> Value {
    json!({
        "explicitConstraints": [
            {
                "id": 101,
                "name": "Class Size Constraint",
                "description": "The classroom must accommodate 120 students",
                "type": "Hard",
                "weight": 1
            },
            {
                "id": 102,
                "name": "Teacher Availability Constraint",
                "description": "Professor Smith is only available on Wednesday mornings",
                "type": "Hard",
                "weight": 1
            },
            {
                "id": 103,
                "name": "Course Duration Constraint",
                "description": "Each class must be 2 hours long",
                "type": "Hard",
                "weight": 1
            },
            {
                "id": 104,
                "name": "Equipment Requirement Constraint",
                "description": "The classroom must have projection equipment",
                "type": "Hard",
                "weight": 1
            }
        ],
        "implicitConstraints": [
            {
                "id": 201,
                "name": "Course Conflict Avoidance",
                "description": "Data Structure should not be scheduled on the same day as Algorithm Design",
                "type": "Soft",
                "weight": 0.8
            },
            {
                "id": 202,
                "name": "Accessibility Preference",
                "description": "The classroom should be accessible for students with mobility issues",
                "type": "Soft",
                "weight": 0.9
            },
            {
                "id": 203,
                "name": "Location Preference",
                "description": "The classroom should be close to the Computer Science building",
                "type": "Soft",
                "weight": 0.6
            }
        ]
    })
}

pub fn conflict_analysis(conflict: &Conflict) -> Value {
    let courses = conflict
        .involved_courses
        .iter()
        .filter_map(InvolvedCourse::label)
        .collect::<Vec<_>>();
    let first = courses.first().copied().unwrap_or("the first course");
    let second = courses.get(1).copied().unwrap_or("one of the involved courses");

    let involved = if courses.is_empty() {
        "the involved courses".to_string()
    } else {
        courses.join(", ")
    };

    json!({
        "rootCause": format!(
            "{} ({}): {} compete for the same resource at the same time.",
            conflict.conflict_type.trim(),
            conflict.description.trim(),
            involved
        ),
        "solutions": [
            {
                "id": 1,
                "description": format!(
                    "Reschedule {second} to a free time slot in the same classroom."
                ),
                "compatibility": 90,
                "impacts": [
                    format!("Students and teacher of {second} get a new meeting time"),
                    "No classroom changes are required"
                ]
            },
            {
                "id": 2,
                "description": format!(
                    "Move {first} to another classroom with similar capacity and equipment."
                ),
                "compatibility": 75,
                "impacts": [
                    format!("{first} keeps its time slot but changes location"),
                    "Room equipment and capacity must be checked"
                ]
            },
            {
                "id": 3,
                "description": format!(
                    "Assign a different qualified teacher to {second}."
                ),
                "compatibility": 50,
                "impacts": [
                    "Teaching workload shifts to another faculty member",
                    "Course continuity for students may be affected"
                ]
            }
        ]
    })
}

pub fn schedule_explanation(item: &ScheduleItem) -> Value {
    let course = format!("{} ({})", item.course_name, item.course_code);
    let slot = format!("{} {}-{}", item.day_name, item.start_time, item.end_time);

    json!({
        "timeRationale": format!(
            "{slot} was chosen for {course} because it fits the teaching hours of {} and avoids clashes with other major courses for the same students.",
            item.teacher_name
        ),
        "classroomRationale": format!(
            "{} was selected for {course} because its capacity and equipment match the course requirements.",
            item.classroom
        ),
        "teacherRationale": format!(
            "{} was assigned to {course} based on subject expertise and a teaching load that leaves room for this course.",
            item.teacher_name
        ),
        "overallRationale": format!(
            "Placing {course} with {} in {} on {slot} balances resource utilization, teacher preferences and student schedules while keeping conflicts to a minimum.",
            item.teacher_name, item.classroom
        ),
        "alternativesConsidered": [
            {
                "type": "Time",
                "alternative": "Tuesday 2:00-4:00 PM",
                "whyNotChosen": "Would conflict with another core course that many of the same students take this semester"
            },
            {
                "type": "Classroom",
                "alternative": "Room 420",
                "whyNotChosen": "Has similar equipment but is far from the department and has poor acoustics"
            },
            {
                "type": "Teacher",
                "alternative": "Professor Johnson",
                "whyNotChosen": "Has the expertise but is already at maximum teaching load this semester"
            }
        ]
    })
}

pub fn parameter_optimization() -> Value {
    json!({
        "optimizationSuggestions": [
            {
                "parameterName": "Teacher Workload Balance Weight",
                "currentValue": "0.7",
                "suggestedValue": "0.8",
                "rationale": "Increasing the teacher workload balance weight distributes teaching tasks more evenly and prevents overload.",
                "expectedEffect": "More balanced teacher workload, improving teacher satisfaction and teaching quality."
            },
            {
                "parameterName": "Student Schedule Compactness Weight",
                "currentValue": "0.5",
                "suggestedValue": "0.6",
                "rationale": "Moderately increasing schedule compactness reduces idle waiting time on campus.",
                "expectedEffect": "Student schedules with fewer long gaps, improving learning efficiency."
            },
            {
                "parameterName": "Classroom Type Matching Weight",
                "currentValue": "0.8",
                "suggestedValue": "0.9",
                "rationale": "Matching courses with suitable classroom types makes better use of teaching facilities.",
                "expectedEffect": "Specialized classrooms are used where they matter most."
            }
        ],
        "newParameterSuggestions": [
            {
                "parameterName": "Course Continuity Weight",
                "suggestedValue": "0.7",
                "rationale": "A continuity parameter can order related courses sensibly within the week.",
                "expectedEffect": "Related courses follow each other at reasonable intervals, improving learning coherence."
            },
            {
                "parameterName": "Peak Period Balance Factor",
                "suggestedValue": "0.6",
                "rationale": "A peak period factor reduces overcrowding at popular times.",
                "expectedEffect": "More even use of campus resources and less congestion during peak periods."
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::super::schemas::{
        CONFLICT_ANALYSIS, CONSTRAINT_ANALYSIS, PARAMETER_OPTIMIZATION, SCHEDULE_EXPLANATION,
    };
    use super::*;
    use crate::recovery::schema::ResultSchema;

    fn conflict() -> Conflict {
        serde_json::from_value(json!({
            "description": "Both courses booked in Room 301",
            "type": "Classroom Conflict",
            "involvedCourses": [
                {"name": "Data Structures", "code": "CS201"},
                {"name": "Algorithms", "code": "CS301"}
            ]
        }))
        .unwrap()
    }

    fn schedule_item() -> ScheduleItem {
        serde_json::from_value(json!({
            "courseName": "Database Systems",
            "courseCode": "CS340",
            "teacherName": "Professor Smith",
            "classroom": "Room 301",
            "dayName": "Wednesday",
            "startTime": "09:00",
            "endTime": "11:00"
        }))
        .unwrap()
    }

    fn assert_conforms_untouched(schema: &ResultSchema, value: Value) {
        let conformed = schema.validate(value.clone()).unwrap();
        assert!(
            conformed.adjustments.is_empty(),
            "{} fallback needed adjustments: {:?}",
            schema.name,
            conformed.adjustments
        );
        assert_eq!(conformed.value, value);
    }

    #[test]
    fn test_fallbacks_are_valid_instances() {
        assert_conforms_untouched(&CONSTRAINT_ANALYSIS, constraint_analysis());
        assert_conforms_untouched(&CONFLICT_ANALYSIS, conflict_analysis(&conflict()));
        assert_conforms_untouched(&SCHEDULE_EXPLANATION, schedule_explanation(&schedule_item()));
        assert_conforms_untouched(&PARAMETER_OPTIMIZATION, parameter_optimization());
    }

    #[test]
    fn test_conflict_fallback_echoes_request() {
        let value = conflict_analysis(&conflict());
        let root_cause = value["rootCause"].as_str().unwrap();
        assert!(root_cause.contains("Classroom Conflict"));
        assert!(root_cause.contains("Both courses booked in Room 301"));
        assert!(root_cause.contains("Data Structures, Algorithms"));
        assert!(value["solutions"][0]["description"]
            .as_str()
            .unwrap()
            .contains("Algorithms"));
        assert!(value["solutions"][1]["description"]
            .as_str()
            .unwrap()
            .contains("Data Structures"));
    }

    #[test]
    fn test_conflict_fallback_names_courses_by_variant_keys() {
        let conflict: Conflict = serde_json::from_value(json!({
            "description": "Room 210 double-booked",
            "type": "Classroom Conflict",
            "involvedCourses": [
                {"courseName": "Operating Systems", "courseCode": "CS350"},
                {"courseCode": "CS360"}
            ]
        }))
        .unwrap();
        let value = conflict_analysis(&conflict);
        assert!(value["rootCause"]
            .as_str()
            .unwrap()
            .contains("Operating Systems, CS360"));
        assert_conforms_untouched(&CONFLICT_ANALYSIS, value);
    }

    #[test]
    fn test_conflict_fallback_without_courses() {
        let conflict: Conflict = serde_json::from_value(json!({
            "description": "Teacher double-booked",
            "type": "Teacher Conflict"
        }))
        .unwrap();
        let value = conflict_analysis(&conflict);
        assert!(value["rootCause"]
            .as_str()
            .unwrap()
            .contains("the involved courses"));
        assert!(value["solutions"][0]["description"]
            .as_str()
            .unwrap()
            .contains("one of the involved courses"));
        assert_conforms_untouched(&CONFLICT_ANALYSIS, value);
    }

    #[test]
    fn test_schedule_fallback_echoes_request() {
        let value = schedule_explanation(&schedule_item());
        let time = value["timeRationale"].as_str().unwrap();
        assert!(time.contains("Wednesday 09:00-11:00"));
        assert!(time.contains("Database Systems (CS340)"));
        assert!(value["classroomRationale"].as_str().unwrap().contains("Room 301"));
        assert!(value["teacherRationale"]
            .as_str()
            .unwrap()
            .contains("Professor Smith"));
    }

    #[test]
    fn test_fallbacks_are_deterministic() {
        assert_eq!(conflict_analysis(&conflict()), conflict_analysis(&conflict()));
        assert_eq!(
            schedule_explanation(&schedule_item()),
            schedule_explanation(&schedule_item())
        );
        assert_eq!(constraint_analysis(), constraint_analysis());
    }
}
