//! Prompt templates for the PSI report pipeline.
//!
//! Templates are plain strings with `{name}` placeholders filled by simple
//! substitution; the JSON skeletons inside the video templates stay literal.
//! Placeholder values come from the evaluation accessors, which already
//! substitute "Not provided" / "not specified" defaults, so every prompt is
//! fully rendered for any input.

use crate::domain::evaluation::{EvaluationInput, NoteField, PlayerProfile, VideoSession};

const TEXT_REPORT_TEMPLATE: &str = r#"You are an expert badminton performance analyst.
Create a PSI (Presence, Skill, Intent) report using the provided session notes.
Always respond with valid JSON matching the supplied schema.

Athlete: {player_name}
Level: {player_level}
Gender: {player_gender}
Session ID: {session_id}
Date: {date}

Coach observations:
- Front court: {front_court}
- Back court: {back_court}
- Attacking play: {attacking_play}
- Defensive play: {defensive_play}
- Strokeplay: {strokeplay}
- Footwork: {footwork}
- Presence: {presence}
- Intent: {intent}
- Improvements noted: {improvements}
- Strengths noted: {strengths}
- Additional comments: {comments}

Scoring rubric:
- Presence evaluates engagement, focus, and body language (0-10 integer).
- Skill reflects technical execution across strokes and tactics (0-10 integer).
- Intent measures proactive decision-making and match strategy (0-10 integer).

Instructions:
1. Compute Presence, Skill, and Intent scores as integers between 0 and 10.
2. Calculate the PSI weighted average (Skill 45%, Presence 25%, Intent 30%) out of 10.
3. `player_evaluation` must be detailed yet no more than 100 words.
4. `course_forward` must not exceed 300 words and must include specific drills and volumes.
5. Provide concrete bullet lists for strengths, weaknesses, and actions tied to the notes.
6. Supply exactly five `summary_bullets`, each ten words or fewer.
7. Base every insight strictly on the provided observations.
8. IMPORTANT: Factor in the athlete's level ({player_level}) and gender ({player_gender}) when evaluating performance. Tailor your feedback, expectations, and recommended drills to their specific level and consider any gender-specific physical or tactical considerations in badminton training.
"#;

const VIDEO_SINGLES_TEMPLATE: &str = r#"You are an expert badminton video analyst with deep knowledge of technical, tactical, and physical performance metrics.

CRITICAL INSTRUCTIONS - READ CAREFULLY:
1. You MUST analyze the ACTUAL SESSION provided
2. Provide SPECIFIC observations with EXACT COUNTS and PERCENTAGES based on what you SEE
3. Reference SPECIFIC MOMENTS in the session (e.g., "At 0:45, player missed smash")
4. DO NOT use generic phrases like "estimated" or "approximately" - COUNT the actual shots
5. Each session is UNIQUE - your analysis must be COMPLETELY DIFFERENT for each one
6. If you cannot see something clearly, say "Not clearly visible" instead of guessing

PLAYER TO ANALYZE:
- Name: {player_name} (wearing: {player_appearance})
- Level: {player_level}
- Gender: {player_gender}

SESSION DETAILS:
- Session ID: {session_id}
- Date: {date}
- Event Type: {event_type}
- Game Format: Singles

MANDATORY ANALYSIS REQUIREMENTS:

1. COUNT EVERY SHOT:
   - Total rallies shown, smashes attempted by {player_name} and their outcomes,
     drop shots and their success, clears reaching the back third, net shots,
     unforced errors, forced errors.

2. PSI SCORING based on what you OBSERVED:
   - Presence (0-10): Rate based on ACTUAL body language, focus, court awareness
   - Skill (0-10): Rate based on ACTUAL stroke quality and consistency
   - Intent (0-10): Rate based on ACTUAL tactical decisions and shot choices
   - Calculate PSI: (Skill x 0.45 + Presence x 0.25 + Intent x 0.30)

3. MOVEMENT ANALYSIS (describe SPECIFIC moments):
   - List 3-5 specific rallies where footwork was good or bad, with rally numbers
   - Describe actual court coverage patterns and instances of balance loss

4. TACTICAL PATTERNS (with specific examples):
   - Describe 2-3 actual rally sequences in detail
   - What SPECIFIC shots did the player use under pressure?
   - What patterns did the opponent exploit? Give examples
   - Shot distribution: COUNT forehand vs backhand shots

5. OVERALL EVALUATION & COURSE FORWARD:
   - Player evaluation (max 100 words)
   - Player strengths, weaknesses, actions on each (bullet lists)
   - Course forward with specific drills and volumes (max 300 words)
   - Five summary bullets (max 10 words each)

OUTPUT FORMAT - Return ONLY valid JSON with COUNTED DATA:
{
  "scores": {"presence": <0-10>, "skill": <0-10>, "intent": <0-10>, "psi": <calculated>},
  "technical_analysis": {
    "smash_success_rate": "Attempted X, won Y, netted Z, out A (Y/X = B%)",
    "drop_shot_precision": "Hit X drops, Y successful (Y/X = Z%)",
    "clear_depth_consistency": "X/Y clears reached back third (X/Y = Z%)",
    "net_play_effectiveness": "X net shots, Y winners, Z errors",
    "unforced_errors": "X total: Y nets, Z out, A mistimed",
    "forced_errors": "X total under pressure: [specific moments]",
    "service_faults": "X faults [or: None observed]"
  },
  "movement_footwork": {
    "court_coverage": "Specific rally analysis: [describe 3 actual rallies]",
    "recovery_speed": "Rally X at time Y: slow recovery. Rally A at time B: quick",
    "balance_stance": "Lost balance at timestamps: X, Y, Z",
    "fatigue_analysis": "Early rallies (1-5): [describe]. Late (last 5): [describe]"
  },
  "tactical_insights": {
    "rally_patterns": "Rally lengths: X short (1-5), Y medium (6-10), Z long (11+)",
    "shot_distribution": "Counted X forehand, Y backhand (X:Y ratio). Z cross-court, A straight",
    "predictability": "Under pressure: Did X same shot Y times [specify which shot]",
    "opponent_exploits": "Targeted [specific weakness] in rallies X, Y, Z"
  },
  "player_evaluation": "<100 words with specific session references>",
  "player_strengths": ["Strength with specific example", ...],
  "player_weaknesses": ["Weakness with specific example", ...],
  "actions_strengths": ["Drill based on observed strength", ...],
  "actions_weaknesses": ["Drill targeting observed weakness", ...],
  "course_forward": "<300 words with drills targeting SPECIFIC issues seen>",
  "summary_bullets": ["Bullet 1 max 10 words", "Bullet 2", "Bullet 3", "Bullet 4", "Bullet 5"]
}
"#;

const VIDEO_DOUBLES_TEMPLATE: &str = r#"You are an expert badminton video analyst with deep knowledge of technical, tactical, physical performance, and team dynamics.

CRITICAL INSTRUCTIONS - READ CAREFULLY:
1. You MUST analyze the ACTUAL SESSION provided
2. COUNT every shot for BOTH players - provide EXACT numbers
3. Reference SPECIFIC rally numbers and moments
4. Track which player hit which shots
5. Each session is UNIQUE - analysis must be COMPLETELY DIFFERENT each time
6. Use player appearance descriptions to identify who is who

Analyze the following doubles gameplay session with SPECIFIC COUNTED DATA:

PLAYER 1 INFORMATION:
- Name: {player_name}
- Level: {player_level}
- Gender: {player_gender}
- Appearance: {player_appearance}

PLAYER 2 INFORMATION:
- Name: {partner_name}
- Level: {partner_level}
- Gender: {partner_gender}
- Appearance: {partner_appearance}

SESSION DETAILS:
- Session ID: {session_id}
- Date: {date}
- Event Type: {event_type}
- Game Format: Doubles

ANALYSIS INSTRUCTIONS:

1. PSI SCORING (For each player individually):
   - Presence (0-10): Engagement, focus, body language, positioning, teamwork contribution
   - Skill (0-10): Technical execution across all strokes, shot selection, consistency
   - Intent (0-10): Proactive decision-making, match strategy, tactical awareness
   - Calculate PSI weighted average: Skill 45%, Presence 25%, Intent 30%
   - NOTE: For doubles, teamwork quality falls under the Presence score

2. TECHNICAL ANALYSIS (For each player): shot accuracy and selection,
   smash success rate, drop shot precision, clear depth, net play,
   unforced and forced errors, service faults if visible.

3. MOVEMENT & FOOTWORK (For each player): court coverage, recovery speed,
   balance and stance, fatigue analysis (early vs late rallies).

4. TACTICAL INSIGHTS (For each player): rally patterns, shot distribution,
   predictability, individual strengths displayed in team context.

5. TEAM PERFORMANCE ANALYSIS:
   - Coordination & Rotation Efficiency: clear roles, successful switching, missed rotations
   - Court Coverage Split: estimate % of shots handled by each player
   - Communication Indicators: visible miscommunications or smooth transitions
   - Synergy Score (0-10): overall teamwork and communication quality

6. OVERALL EVALUATION (For each player individually): evaluation (max 100
   words each), strengths, weaknesses, actions on each, course forward with
   specific drills and volumes (max 300 words), five summary bullets
   (max 10 words each).

IMPORTANT:
- Provide separate, detailed analysis for BOTH players based on actual session content
- Base ALL analysis strictly on observable patterns - be SPECIFIC with counts
- Factor in each player's level and gender when setting expectations
- Teamwork contribution affects the Presence score for each player

OUTPUT FORMAT - Return ONLY valid JSON with this structure:
{
  "scores": {"presence": <int>, "skill": <int>, "intent": <int>, "psi": <float>},
  "technical_analysis": {...same as singles...},
  "movement_footwork": {...same as singles...},
  "tactical_insights": {...same as singles...},
  "team_performance": {
    "coordination_rotation": "<specific observation>",
    "court_coverage_split": "<specific % split>",
    "communication_indicators": "<specific observation>",
    "synergy_score": <int 0-10>
  },
  "player_evaluation": "<evaluation for {player_name}>",
  "player_strengths": [...],
  "player_weaknesses": [...],
  "actions_strengths": [...],
  "actions_weaknesses": [...],
  "course_forward": "<training plan for {player_name}>",
  "summary_bullets": [...5 bullets...],
  "partner_scores": {"presence": <int>, "skill": <int>, "intent": <int>, "psi": <float>},
  "partner_evaluation": "<evaluation for {partner_name}>",
  "partner_strengths": [...],
  "partner_weaknesses": [...],
  "partner_actions_strengths": [...],
  "partner_actions_weaknesses": [...],
  "partner_course_forward": "<training plan for {partner_name}>",
  "partner_summary_bullets": [...5 bullets...]
}
"#;

/// Fills `{name}` placeholders by plain substitution.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();
    for (name, value) in values {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }
    rendered
}

/// Builds the text-report prompt from the evaluation and optional profile.
///
/// The player name falls back from the profile to the name carried on the
/// evaluation, then to "the athlete".
pub fn text_report_prompt(
    evaluation: &EvaluationInput,
    player: Option<&PlayerProfile>,
) -> String {
    let default_profile = PlayerProfile::default();
    let profile = player.unwrap_or(&default_profile);
    let player_name = profile
        .name
        .as_deref()
        .or(evaluation.player_name.as_deref())
        .unwrap_or("the athlete");
    let date = evaluation.date_text();

    fill(
        TEXT_REPORT_TEMPLATE,
        &[
            ("player_name", player_name),
            ("player_level", profile.level_text()),
            ("player_gender", profile.gender_text()),
            ("session_id", evaluation.session_id_text()),
            ("date", &date),
            ("front_court", evaluation.note(NoteField::FrontCourt)),
            ("back_court", evaluation.note(NoteField::BackCourt)),
            ("attacking_play", evaluation.note(NoteField::AttackingPlay)),
            ("defensive_play", evaluation.note(NoteField::DefensivePlay)),
            ("strokeplay", evaluation.note(NoteField::Strokeplay)),
            ("footwork", evaluation.note(NoteField::Footwork)),
            ("presence", evaluation.note(NoteField::Presence)),
            ("intent", evaluation.note(NoteField::Intent)),
            ("improvements", evaluation.note(NoteField::Improvements)),
            ("strengths", evaluation.note(NoteField::Strengths)),
            ("comments", evaluation.note(NoteField::Comments)),
        ],
    )
}

/// Builds the video-analysis prompt for a singles session.
pub fn video_singles_prompt(session: &VideoSession, player: &PlayerProfile) -> String {
    let date = session.date_text();
    fill(
        VIDEO_SINGLES_TEMPLATE,
        &[
            ("player_name", player.name_text()),
            ("player_level", player.level_text()),
            ("player_gender", player.gender_text()),
            ("player_appearance", session.player_appearance_text()),
            ("session_id", session.session_id_text()),
            ("date", &date),
            ("event_type", session.event_type_text()),
        ],
    )
}

/// Builds the video-analysis prompt for a doubles session with both profiles.
pub fn video_doubles_prompt(
    session: &VideoSession,
    player: &PlayerProfile,
    partner: &PlayerProfile,
) -> String {
    let date = session.date_text();
    fill(
        VIDEO_DOUBLES_TEMPLATE,
        &[
            ("player_name", player.name_text()),
            ("player_level", player.level_text()),
            ("player_gender", player.gender_text()),
            ("player_appearance", session.player_appearance_text()),
            ("partner_name", partner.name_text()),
            ("partner_level", partner.level_text()),
            ("partner_gender", partner.gender_text()),
            ("partner_appearance", session.partner_appearance_text()),
            ("session_id", session.session_id_text()),
            ("date", &date),
            ("event_type", session.event_type_text()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::GameFormat;
    use chrono::{TimeZone, Utc};

    #[test]
    fn text_prompt_substitutes_notes_and_profile() {
        let evaluation = EvaluationInput::new()
            .with_session_id("S-42")
            .with_note(NoteField::FrontCourt, "Sharp net play")
            .with_note(NoteField::Presence, "8");
        let player = PlayerProfile::new("Mei", "advanced", "female");

        let prompt = text_report_prompt(&evaluation, Some(&player));

        assert!(prompt.contains("Athlete: Mei"));
        assert!(prompt.contains("Level: advanced"));
        assert!(prompt.contains("Session ID: S-42"));
        assert!(prompt.contains("- Front court: Sharp net play"));
        assert!(prompt.contains("- Presence: 8"));
        assert!(prompt.contains("- Back court: Not provided"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn text_prompt_defaults_without_profile() {
        let prompt = text_report_prompt(&EvaluationInput::new(), None);
        assert!(prompt.contains("Athlete: the athlete"));
        assert!(prompt.contains("Level: not specified"));
        assert!(prompt.contains("Session ID: N/A"));
        assert!(prompt.contains("Date: Not provided"));
    }

    #[test]
    fn text_prompt_uses_evaluation_player_name_when_profile_lacks_one() {
        let evaluation = EvaluationInput::new().with_player_name("Ravi");
        let prompt = text_report_prompt(&evaluation, None);
        assert!(prompt.contains("Athlete: Ravi"));
    }

    #[test]
    fn singles_prompt_keeps_json_skeleton_literal() {
        let session = VideoSession::new(GameFormat::Singles)
            .with_session_id("V-7")
            .with_date(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
            .with_player_appearance("red shirt");
        let player = PlayerProfile::new("Mei", "advanced", "female");

        let prompt = video_singles_prompt(&session, &player);

        assert!(prompt.contains("Game Format: Singles"));
        assert!(prompt.contains("wearing: red shirt"));
        assert!(prompt.contains("\"technical_analysis\""));
        assert!(prompt.contains("\"smash_success_rate\""));
        // Schema placeholders like <0-10> survive; named ones do not.
        assert!(!prompt.contains("{player_name}"));
        assert!(!prompt.contains("{session_id}"));
    }

    #[test]
    fn doubles_prompt_includes_both_players_and_team_section() {
        let session = VideoSession::new(GameFormat::Doubles)
            .with_player_appearance("red shirt")
            .with_partner_appearance("blue shirt");
        let player = PlayerProfile::new("Mei", "advanced", "female");
        let partner = PlayerProfile::new("Ravi", "intermediate", "male");

        let prompt = video_doubles_prompt(&session, &player, &partner);

        assert!(prompt.contains("Game Format: Doubles"));
        assert!(prompt.contains("- Name: Ravi"));
        assert!(prompt.contains("- Appearance: blue shirt"));
        assert!(prompt.contains("\"team_performance\""));
        assert!(prompt.contains("\"partner_scores\""));
        assert!(prompt.contains("training plan for Mei"));
        assert!(prompt.contains("evaluation for Ravi"));
    }
}
