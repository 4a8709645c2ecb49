//! Payload normalization.
//!
//! Coerces the LLM's decoded JSON, whatever shape it arrived in, toward the
//! report schema. Normalization never fails and never panics: every field
//! that cannot be sensibly coerced gets a safe default, so the strict
//! validation pass that follows either succeeds or fails only on structurally
//! unrecoverable input (for example a `scores` value that is not an object).

use serde_json::{json, Map, Value};

use crate::domain::evaluation::{EvaluationInput, GameFormat, NoteField};

/// Neutral midpoint substituted for any component score that fails coercion.
const DEFAULT_SCORE: i64 = 5;

/// Placeholder when the LLM omits the player evaluation.
pub(crate) const MISSING_EVALUATION_TEXT: &str =
    "AI response did not include an evaluation. Use coach notes until the AI summary is available.";

/// Placeholder when the LLM omits the course forward and the coach recorded
/// no improvements note.
pub(crate) const MISSING_COURSE_FORWARD_TEXT: &str =
    "Coach should provide follow-up plan based on session goals.";

/// Placeholder narrative for video payloads still missing text fields.
const ANALYSIS_IN_PROGRESS_TEXT: &str = "Analysis in progress";

const LIST_FIELDS: [&str; 5] = [
    "player_strengths",
    "player_weaknesses",
    "actions_strengths",
    "actions_weaknesses",
    "summary_bullets",
];

const PARTNER_LIST_FIELDS: [&str; 5] = [
    "partner_strengths",
    "partner_weaknesses",
    "partner_actions_strengths",
    "partner_actions_weaknesses",
    "partner_summary_bullets",
];

const NARRATIVE_SECTIONS: [&str; 3] =
    ["technical_analysis", "movement_footwork", "tactical_insights"];

/// Normalizes a decoded text-evaluation payload toward the report schema.
///
/// Applied rules, in order: score coercion with neutral defaults, list-field
/// shaping, then required-narrative placeholders. Idempotent: normalizing an
/// already-normalized payload returns it unchanged.
///
/// A payload that is not a JSON object is returned as-is; the later shape
/// validation rejects it and the caller falls back.
pub fn normalize_payload(payload: Value, evaluation: &EvaluationInput) -> Value {
    let Value::Object(mut obj) = payload else {
        return payload;
    };

    normalize_scores_field(&mut obj, "scores");

    for field in LIST_FIELDS {
        normalize_list_field(&mut obj, field);
    }

    if is_missing_text(obj.get("player_evaluation")) {
        obj.insert(
            "player_evaluation".to_string(),
            Value::String(MISSING_EVALUATION_TEXT.to_string()),
        );
    }
    if is_missing_text(obj.get("course_forward")) {
        let fallback = evaluation
            .note_if_present(NoteField::Improvements)
            .unwrap_or(MISSING_COURSE_FORWARD_TEXT);
        obj.insert(
            "course_forward".to_string(),
            Value::String(fallback.to_string()),
        );
    }

    Value::Object(obj)
}

/// Normalizes a decoded video-analysis payload.
///
/// Same algorithmic pattern as [`normalize_payload`] with the video-specific
/// additions: the three narrative sections default to empty maps, missing
/// narrative text defaults to an in-progress placeholder, and doubles
/// sessions get a team-performance object plus partner-field shaping.
pub fn normalize_video_payload(payload: Value, game_format: GameFormat) -> Value {
    let Value::Object(mut obj) = payload else {
        return payload;
    };

    if !obj.get("scores").is_some_and(Value::is_object) {
        obj.insert(
            "scores".to_string(),
            json!({"presence": 5, "skill": 5, "intent": 5, "psi": 5.0}),
        );
    }
    normalize_scores_field(&mut obj, "scores");
    if obj.contains_key("partner_scores") {
        normalize_scores_field(&mut obj, "partner_scores");
    }

    for field in LIST_FIELDS {
        normalize_list_field(&mut obj, field);
    }
    for field in PARTNER_LIST_FIELDS {
        if obj.contains_key(field) {
            normalize_list_field(&mut obj, field);
        }
    }

    for field in ["player_evaluation", "course_forward"] {
        if is_missing_text(obj.get(field)) {
            obj.insert(
                field.to_string(),
                Value::String(ANALYSIS_IN_PROGRESS_TEXT.to_string()),
            );
        }
    }

    for section in NARRATIVE_SECTIONS {
        normalize_narrative_section(&mut obj, section);
    }

    if game_format.is_doubles() {
        let team = match obj.remove("team_performance") {
            Some(Value::Object(team)) => normalize_team_performance(team),
            _ => Map::new(),
        };
        obj.insert("team_performance".to_string(), Value::Object(team));
    }

    Value::Object(obj)
}

/// Best-effort coercion of one component score.
///
/// Accepts integers, floats and numeric strings, rounding to the nearest
/// integer (ties away from zero, the same rule the PSI composite pins).
/// Anything else fails coercion. No clamping happens here: an out-of-range
/// integer survives so strict validation can flag it.
fn coerce_score(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f.round() as i64),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().map(|f| f.round() as i64)
        }
        _ => None,
    }
}

/// Coerces a supplied composite to a float, dropping it on failure.
fn coerce_psi(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn normalize_scores_field(obj: &mut Map<String, Value>, key: &str) {
    let mut scores = match obj.get(key) {
        Some(Value::Object(scores)) => scores.clone(),
        _ => Map::new(),
    };

    for component in ["presence", "skill", "intent"] {
        let coerced = scores
            .get(component)
            .and_then(coerce_score)
            .unwrap_or(DEFAULT_SCORE);
        scores.insert(component.to_string(), Value::from(coerced));
    }

    let psi = scores.get("psi").and_then(coerce_psi);
    scores.insert(
        "psi".to_string(),
        psi.map(Value::from).unwrap_or(Value::Null),
    );

    obj.insert(key.to_string(), Value::Object(scores));
}

/// Single string -> one-element list; any other non-list -> empty list.
fn normalize_list_field(obj: &mut Map<String, Value>, key: &str) {
    let normalized = match obj.get(key) {
        Some(Value::Array(items)) => Value::Array(items.clone()),
        Some(Value::String(s)) => Value::Array(vec![Value::String(s.clone())]),
        _ => Value::Array(Vec::new()),
    };
    obj.insert(key.to_string(), normalized);
}

/// Shapes a narrative section into a string->string map, stringifying scalar
/// values and dropping anything nested.
fn normalize_narrative_section(obj: &mut Map<String, Value>, key: &str) {
    let section = match obj.get(key) {
        Some(Value::Object(section)) => section
            .iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((k.clone(), Value::String(text)))
            })
            .collect(),
        _ => Map::new(),
    };
    obj.insert(key.to_string(), Value::Object(section));
}

fn normalize_team_performance(mut team: Map<String, Value>) -> Map<String, Value> {
    match team.get("synergy_score").and_then(coerce_score) {
        Some(synergy) => {
            team.insert("synergy_score".to_string(), Value::from(synergy));
        }
        None => {
            team.remove("synergy_score");
        }
    }
    team
}

/// True when a required narrative field is absent, null, or blank.
fn is_missing_text(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
