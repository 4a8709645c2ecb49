//! Evaluation input - the coach's raw observation notes and session metadata.
//!
//! The report pipeline never reads caller objects through dynamic lookup.
//! Callers convert whatever shape they hold into these explicit structures,
//! so every defaulting rule lives here rather than being scattered through
//! the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder substituted for any note the coach did not fill in.
pub const NOT_PROVIDED: &str = "Not provided";

/// The free-text note categories a coach can fill in for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    FrontCourt,
    BackCourt,
    AttackingPlay,
    DefensivePlay,
    Strokeplay,
    Footwork,
    Presence,
    Intent,
    Improvements,
    Strengths,
    Comments,
}

impl NoteField {
    /// All note fields, in prompt order.
    pub const ALL: [NoteField; 11] = [
        NoteField::FrontCourt,
        NoteField::BackCourt,
        NoteField::AttackingPlay,
        NoteField::DefensivePlay,
        NoteField::Strokeplay,
        NoteField::Footwork,
        NoteField::Presence,
        NoteField::Intent,
        NoteField::Improvements,
        NoteField::Strengths,
        NoteField::Comments,
    ];

    /// The technique notes averaged by the fallback skill estimate.
    pub const SKILL_FIELDS: [NoteField; 6] = [
        NoteField::FrontCourt,
        NoteField::BackCourt,
        NoteField::AttackingPlay,
        NoteField::DefensivePlay,
        NoteField::Strokeplay,
        NoteField::Footwork,
    ];
}

/// A coach's evaluation notes for one session.
///
/// Every field is independently optional; readers go through [`note`] or
/// the other accessors, which substitute [`NOT_PROVIDED`] for missing values.
///
/// [`note`]: EvaluationInput::note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub session_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub front_court: Option<String>,
    pub back_court: Option<String>,
    pub attacking_play: Option<String>,
    pub defensive_play: Option<String>,
    pub strokeplay: Option<String>,
    pub footwork: Option<String>,
    pub presence: Option<String>,
    pub intent: Option<String>,
    pub improvements: Option<String>,
    pub strengths: Option<String>,
    pub comments: Option<String>,
    /// Player name carried on the evaluation itself, used when no separate
    /// player profile is supplied.
    pub player_name: Option<String>,
}

impl EvaluationInput {
    /// Creates an empty evaluation (every note unset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the session date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets one of the note fields.
    pub fn with_note(mut self, field: NoteField, value: impl Into<String>) -> Self {
        *self.note_slot(field) = Some(value.into());
        self
    }

    /// Sets the player name carried on the evaluation.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Returns the raw optional value of a note field.
    pub fn note_raw(&self, field: NoteField) -> Option<&str> {
        match field {
            NoteField::FrontCourt => self.front_court.as_deref(),
            NoteField::BackCourt => self.back_court.as_deref(),
            NoteField::AttackingPlay => self.attacking_play.as_deref(),
            NoteField::DefensivePlay => self.defensive_play.as_deref(),
            NoteField::Strokeplay => self.strokeplay.as_deref(),
            NoteField::Footwork => self.footwork.as_deref(),
            NoteField::Presence => self.presence.as_deref(),
            NoteField::Intent => self.intent.as_deref(),
            NoteField::Improvements => self.improvements.as_deref(),
            NoteField::Strengths => self.strengths.as_deref(),
            NoteField::Comments => self.comments.as_deref(),
        }
    }

    /// Returns the note text, or [`NOT_PROVIDED`] when unset.
    pub fn note(&self, field: NoteField) -> &str {
        self.note_raw(field).unwrap_or(NOT_PROVIDED)
    }

    /// Returns the note text only when it is set and non-blank.
    pub fn note_if_present(&self, field: NoteField) -> Option<&str> {
        self.note_raw(field)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Session id for prompt substitution, defaulting to "N/A".
    pub fn session_id_text(&self) -> &str {
        self.session_id.as_deref().unwrap_or("N/A")
    }

    /// Session date in RFC 3339, or [`NOT_PROVIDED`] when unset.
    pub fn date_text(&self) -> String {
        self.date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    fn note_slot(&mut self, field: NoteField) -> &mut Option<String> {
        match field {
            NoteField::FrontCourt => &mut self.front_court,
            NoteField::BackCourt => &mut self.back_court,
            NoteField::AttackingPlay => &mut self.attacking_play,
            NoteField::DefensivePlay => &mut self.defensive_play,
            NoteField::Strokeplay => &mut self.strokeplay,
            NoteField::Footwork => &mut self.footwork,
            NoteField::Presence => &mut self.presence,
            NoteField::Intent => &mut self.intent,
            NoteField::Improvements => &mut self.improvements,
            NoteField::Strengths => &mut self.strengths,
            NoteField::Comments => &mut self.comments,
        }
    }
}

/// Player identity and background, supplied by the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: Option<String>,
    pub level: Option<String>,
    pub gender: Option<String>,
}

impl PlayerProfile {
    /// Creates a fully specified profile.
    pub fn new(
        name: impl Into<String>,
        level: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            level: Some(level.into()),
            gender: Some(gender.into()),
        }
    }

    /// Player name, defaulting to a neutral reference.
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or("the athlete")
    }

    /// Player level, defaulting to "not specified".
    pub fn level_text(&self) -> &str {
        self.level.as_deref().unwrap_or("not specified")
    }

    /// Player gender, defaulting to "not specified".
    pub fn gender_text(&self) -> &str {
        self.gender.as_deref().unwrap_or("not specified")
    }
}

/// Whether a recorded session was played as singles or doubles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameFormat {
    #[default]
    Singles,
    Doubles,
}

impl GameFormat {
    /// Returns true for doubles sessions.
    pub fn is_doubles(&self) -> bool {
        matches!(self, GameFormat::Doubles)
    }

    /// Display label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            GameFormat::Singles => "Singles",
            GameFormat::Doubles => "Doubles",
        }
    }
}

/// Metadata for a recorded video session.
///
/// The upload and remote processing of the video itself belong to an external
/// collaborator; the pipeline only needs the descriptive fields that feed the
/// analysis prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSession {
    pub session_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub event_type: Option<String>,
    pub game_format: GameFormat,
    pub player_appearance: Option<String>,
    pub partner_appearance: Option<String>,
}

impl VideoSession {
    /// Creates a session with the given format and everything else unset.
    pub fn new(game_format: GameFormat) -> Self {
        Self {
            game_format,
            ..Self::default()
        }
    }

    /// Sets the session identifier.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the session date.
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the event type (tournament, practice match, drills, ...).
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the player appearance description used to identify them on video.
    pub fn with_player_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.player_appearance = Some(appearance.into());
        self
    }

    /// Sets the partner appearance description.
    pub fn with_partner_appearance(mut self, appearance: impl Into<String>) -> Self {
        self.partner_appearance = Some(appearance.into());
        self
    }

    /// Session id for prompt substitution, defaulting to "N/A".
    pub fn session_id_text(&self) -> &str {
        self.session_id.as_deref().unwrap_or("N/A")
    }

    /// Session date in RFC 3339, or [`NOT_PROVIDED`] when unset.
    pub fn date_text(&self) -> String {
        self.date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| NOT_PROVIDED.to_string())
    }

    /// Event type, defaulting to "practice_match".
    pub fn event_type_text(&self) -> &str {
        self.event_type.as_deref().unwrap_or("practice_match")
    }

    /// Player appearance, defaulting to empty.
    pub fn player_appearance_text(&self) -> &str {
        self.player_appearance.as_deref().unwrap_or("")
    }

    /// Partner appearance, defaulting to empty.
    pub fn partner_appearance_text(&self) -> &str {
        self.partner_appearance.as_deref().unwrap_or("")
    }
}
