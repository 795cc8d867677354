//! Result schemas for the four analysis operations.

use crate::recovery::schema::{
    FieldKind, FieldSpec, ItemRule, ListRule, NumberRule, ResultSchema, FLEXIBLE_PREFERENCE,
};

const CONSTRAINT_TYPES: &[&str] = &["Hard", FLEXIBLE_PREFERENCE];

const ID: FieldKind = FieldKind::Identifier;

const EXPLICIT_CONSTRAINT: &[FieldSpec] = &[
    FieldSpec::required("id", ID),
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::required(
        "type",
        FieldKind::Choice {
            options: CONSTRAINT_TYPES,
            default: "Hard",
        },
    ),
    FieldSpec::required("weight", FieldKind::Number(NumberRule::within(0.0, 1.0, 1.0))),
];

// type and weight are optional: the flexible-preference rule settles both.
const IMPLICIT_CONSTRAINT: &[FieldSpec] = &[
    FieldSpec::required("id", ID),
    FieldSpec::required("name", FieldKind::Text),
    FieldSpec::required("description", FieldKind::Text),
    FieldSpec::optional(
        "type",
        FieldKind::Choice {
            options: CONSTRAINT_TYPES,
            default: FLEXIBLE_PREFERENCE,
        },
    ),
    FieldSpec::optional("weight", FieldKind::Number(NumberRule::within(0.5, 0.9, 0.7))),
];

pub static CONSTRAINT_ANALYSIS: ResultSchema = ResultSchema {
    name: "analyze-constraints",
    fields: &[
        FieldSpec::required(
            "explicitConstraints",
            FieldKind::ObjectList(ListRule {
                item: EXPLICIT_CONSTRAINT,
                min_items: 0,
                item_rule: ItemRule::Plain,
            }),
        ),
        FieldSpec::required(
            "implicitConstraints",
            FieldKind::ObjectList(ListRule {
                item: IMPLICIT_CONSTRAINT,
                min_items: 0,
                item_rule: ItemRule::FlexiblePreference,
            }),
        ),
    ],
};

const SOLUTION: &[FieldSpec] = &[
    FieldSpec::required("id", ID),
    FieldSpec::required("description", FieldKind::Text),
    // 0–100; 80 is the neutral score for an unreadable value.
    FieldSpec::required(
        "compatibility",
        FieldKind::Number(NumberRule::within(0.0, 100.0, 80.0)),
    ),
    FieldSpec::required("impacts", FieldKind::TextList),
];

pub static CONFLICT_ANALYSIS: ResultSchema = ResultSchema {
    name: "analyze-conflicts",
    fields: &[
        FieldSpec::required("rootCause", FieldKind::Text),
        FieldSpec::required(
            "solutions",
            FieldKind::ObjectList(ListRule {
                item: SOLUTION,
                min_items: 1,
                item_rule: ItemRule::Plain,
            }),
        ),
    ],
};

const ALTERNATIVE: &[FieldSpec] = &[
    FieldSpec::required("type", FieldKind::Text),
    FieldSpec::required("alternative", FieldKind::Text),
    FieldSpec::required("whyNotChosen", FieldKind::Text),
];

pub static SCHEDULE_EXPLANATION: ResultSchema = ResultSchema {
    name: "explain-schedule",
    fields: &[
        FieldSpec::required("timeRationale", FieldKind::Text),
        FieldSpec::required("classroomRationale", FieldKind::Text),
        FieldSpec::required("teacherRationale", FieldKind::Text),
        FieldSpec::required("overallRationale", FieldKind::Text),
        FieldSpec::required(
            "alternativesConsidered",
            FieldKind::ObjectList(ListRule {
                item: ALTERNATIVE,
                min_items: 1,
                item_rule: ItemRule::Plain,
            }),
        ),
    ],
};

const OPTIMIZATION_SUGGESTION: &[FieldSpec] = &[
    FieldSpec::required("parameterName", FieldKind::Text),
    FieldSpec::required("currentValue", FieldKind::Text),
    FieldSpec::required("suggestedValue", FieldKind::Text),
    FieldSpec::required("rationale", FieldKind::Text),
    FieldSpec::required("expectedEffect", FieldKind::Text),
];

const NEW_PARAMETER_SUGGESTION: &[FieldSpec] = &[
    FieldSpec::required("parameterName", FieldKind::Text),
    FieldSpec::required("suggestedValue", FieldKind::Text),
    FieldSpec::required("rationale", FieldKind::Text),
    FieldSpec::required("expectedEffect", FieldKind::Text),
];

pub static PARAMETER_OPTIMIZATION: ResultSchema = ResultSchema {
    name: "optimize-parameters",
    fields: &[
        FieldSpec::required(
            "optimizationSuggestions",
            FieldKind::ObjectList(ListRule {
                item: OPTIMIZATION_SUGGESTION,
                min_items: 1,
                item_rule: ItemRule::Plain,
            }),
        ),
        FieldSpec::optional(
            "newParameterSuggestions",
            FieldKind::ObjectList(ListRule {
                item: NEW_PARAMETER_SUGGESTION,
                min_items: 0,
                item_rule: ItemRule::Plain,
            }),
        ),
    ],
};
