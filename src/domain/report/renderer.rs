//! Deterministic text rendering of a validated report.
//!
//! Given the same report, the renderer always produces byte-identical output.
//! Section order is fixed, narrative fields are word-truncated, and the
//! summary always renders exactly five bullets.

use crate::domain::scoring::{INTENT_WEIGHT, PRESENCE_WEIGHT, SKILL_WEIGHT};

use super::schema::PsiReport;

/// Word limit for the player evaluation section.
const EVALUATION_WORD_LIMIT: usize = 100;

/// Word limit for the course-forward section.
const COURSE_FORWARD_WORD_LIMIT: usize = 300;

/// Word limit for each summary bullet.
const BULLET_WORD_LIMIT: usize = 10;

/// Number of summary bullets in every rendered report.
const SUMMARY_BULLET_COUNT: usize = 5;

/// Bullet padded in when the summary holds fewer than five entries.
const MISSING_BULLET: &str = "No summary provided";

/// Bullet rendered when a list section is empty or all-blank.
const MISSING_ITEM: &str = "No items provided";

/// Truncates text to at most `limit` words, appending an ellipsis marker.
///
/// Text at or under the limit is returned trimmed but otherwise untouched;
/// internal whitespace collapses only when truncation actually happens.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.trim().to_string();
    }
    let mut truncated = words[..limit].join(" ");
    truncated.push('…');
    truncated
}

/// Trims items and drops blanks; an empty result becomes the placeholder
/// single-element list so no rendered section is ever empty.
pub fn ensure_items(items: &[String]) -> Vec<String> {
    let cleaned: Vec<String> = items
        .iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if cleaned.is_empty() {
        vec![MISSING_ITEM.to_string()]
    } else {
        cleaned
    }
}

fn push_bullets(lines: &mut Vec<String>, items: &[String]) {
    for item in ensure_items(items) {
        lines.push(format!("- {item}"));
    }
}

/// Renders a validated report as the fixed multi-line coach-facing text.
pub fn render_text(report: &PsiReport) -> String {
    let psi_value = report.psi_value();
    let mut lines: Vec<String> = vec![
        format!("Presence Score (P): {}/10", report.scores.presence),
        format!("Skill Score (S): {}/10", report.scores.skill),
        format!("Intent Score (I): {}/10", report.scores.intent),
        String::new(),
        format!(
            "PSI Evaluation: {psi_value:.1}/10 (A weighted average of the 3 where skill is given \
             {SKILL_WEIGHT}%, presence is given {PRESENCE_WEIGHT}%, and intent is given \
             {INTENT_WEIGHT}%.)"
        ),
        String::new(),
        "Player evaluation:".to_string(),
        truncate_words(&report.player_evaluation, EVALUATION_WORD_LIMIT),
        String::new(),
        "Player strengths:".to_string(),
    ];
    push_bullets(&mut lines, &report.player_strengths);

    lines.extend([String::new(), "Player weaknesses:".to_string()]);
    push_bullets(&mut lines, &report.player_weaknesses);

    lines.extend([String::new(), "Actions to be taken on Strengths:".to_string()]);
    push_bullets(&mut lines, &report.actions_strengths);

    lines.extend([String::new(), "Actions to be taken on Weaknesses:".to_string()]);
    push_bullets(&mut lines, &report.actions_weaknesses);

    lines.extend([String::new(), "The recommended course forward:".to_string()]);
    lines.push(truncate_words(&report.course_forward, COURSE_FORWARD_WORD_LIMIT));

    lines.extend([String::new(), "Summary:".to_string()]);
    let mut bullets = ensure_items(&report.summary_bullets);
    bullets.truncate(SUMMARY_BULLET_COUNT);
    while bullets.len() < SUMMARY_BULLET_COUNT {
        bullets.push(MISSING_BULLET.to_string());
    }
    for bullet in &bullets {
        lines.push(format!("- {}", truncate_words(bullet, BULLET_WORD_LIMIT)));
    }

    lines.join("\n").trim().to_string()
}
