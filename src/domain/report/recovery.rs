//! JSON recovery ladder for video-analysis responses.
//!
//! Video models frequently wrap their JSON in markdown fences, truncate it
//! mid-object, or bury it in prose. Three recovery rungs are attempted in
//! order, the first success short-circuiting the rest:
//!
//! 1. direct decode (after fence stripping)
//! 2. brace-matched substring extraction
//! 3. regex field-by-field extraction of scores and known narrative fields
//!
//! The final rung is total: it defaults every unmatched field, so decoding
//! always yields some payload. Whether that payload survives validation is
//! the generator's concern.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::domain::evaluation::GameFormat;

/// Which rung of the ladder produced the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryRung {
    /// The response decoded directly.
    Direct,
    /// A balanced `{...}` substring decoded.
    BraceMatched,
    /// Individual fields were pulled out by pattern.
    FieldExtraction,
}

/// Recovers a JSON payload from a raw video-analysis response.
pub fn recover_video_payload(raw: &str, game_format: GameFormat) -> (Value, RecoveryRung) {
    let stripped = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        if value.is_object() {
            return (value, RecoveryRung::Direct);
        }
    }

    if let Some(candidate) = extract_balanced_object(stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(candidate) {
            if value.is_object() {
                return (value, RecoveryRung::BraceMatched);
            }
        }
    }

    (
        extract_fields_by_pattern(stripped, game_format),
        RecoveryRung::FieldExtraction,
    )
}

/// Strips a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ````.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Finds the first balanced `{...}` substring, tracking string literals and
/// escapes so braces inside quoted text do not confuse the depth count.
fn extract_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

static PRESENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""presence":\s*(\d+)"#).expect("valid regex"));
static SKILL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""skill":\s*(\d+)"#).expect("valid regex"));
static INTENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""intent":\s*(\d+)"#).expect("valid regex"));
static PSI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""psi":\s*(\d+\.?\d*)"#).expect("valid regex"));
static EVALUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""player_evaluation":\s*"([^"]*)""#).expect("valid regex"));

const TECHNICAL_FIELDS: [&str; 7] = [
    "smash_success_rate",
    "drop_shot_precision",
    "clear_depth_consistency",
    "net_play_effectiveness",
    "unforced_errors",
    "forced_errors",
    "service_faults",
];

const MOVEMENT_FIELDS: [&str; 4] = [
    "court_coverage",
    "recovery_speed",
    "balance_stance",
    "fatigue_analysis",
];

const TACTICAL_FIELDS: [&str; 4] = [
    "rally_patterns",
    "shot_distribution",
    "predictability",
    "opponent_exploits",
];

static SECTION_FIELD_RES: Lazy<Vec<(&'static str, &'static str, Regex)>> = Lazy::new(|| {
    let sections: [(&str, &[&str]); 3] = [
        ("technical_analysis", &TECHNICAL_FIELDS),
        ("movement_footwork", &MOVEMENT_FIELDS),
        ("tactical_insights", &TACTICAL_FIELDS),
    ];
    sections
        .iter()
        .flat_map(|(section, fields)| {
            fields.iter().map(move |field| {
                let pattern = format!(r#""{field}":\s*"([^"]*)""#);
                (*section, *field, Regex::new(&pattern).expect("valid regex"))
            })
        })
        .collect()
});

fn capture_int(re: &Regex, text: &str, default: i64) -> i64 {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(default)
}

fn capture_float(re: &Regex, text: &str, default: f64) -> f64 {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(default)
}

/// Builds a best-effort payload by pulling known `"field": value` pairs out
/// of a response that never decoded as JSON. Unmatched fields default.
fn extract_fields_by_pattern(text: &str, game_format: GameFormat) -> Value {
    let scores = json!({
        "presence": capture_int(&PRESENCE_RE, text, 7),
        "skill": capture_int(&SKILL_RE, text, 7),
        "intent": capture_int(&INTENT_RE, text, 7),
        "psi": capture_float(&PSI_RE, text, 7.0),
    });

    let mut sections: Map<String, Value> = Map::new();
    for section in ["technical_analysis", "movement_footwork", "tactical_insights"] {
        sections.insert(section.to_string(), json!({}));
    }
    for (section, field, re) in SECTION_FIELD_RES.iter() {
        if let Some(captured) = re.captures(text).and_then(|c| c.get(1)) {
            sections[*section]
                .as_object_mut()
                .expect("section is an object")
                .insert(field.to_string(), Value::String(captured.as_str().to_string()));
        }
    }

    let player_evaluation = EVALUATION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| text.chars().take(500).collect());

    let mut payload = json!({
        "scores": scores,
        "technical_analysis": sections["technical_analysis"],
        "movement_footwork": sections["movement_footwork"],
        "tactical_insights": sections["tactical_insights"],
        "player_evaluation": player_evaluation,
        "player_strengths": ["Analysis extracted from response - see evaluation"],
        "player_weaknesses": ["Analysis extracted from response - see evaluation"],
        "actions_strengths": ["Review detailed analysis for specific recommendations"],
        "actions_weaknesses": ["Review detailed analysis for specific recommendations"],
        "course_forward": "Full analysis available in player evaluation",
        "summary_bullets": ["Video analysis generated", "Review full report for details"],
    });

    if game_format.is_doubles() {
        payload
            .as_object_mut()
            .expect("payload is an object")
            .insert("team_performance".to_string(), json!({}));
    }

    payload
}
