use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("countdown must be between {min} and {max} seconds, got {got}")]
    InvalidCountdown { got: u32, min: u32, max: u32 },
}

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

/// How a participant answers and moves between questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// One option per question. Feedback is followed by a countdown that
    /// auto-advances to the next question.
    #[default]
    Timed,
    /// Any number of options per question, checked on demand. The participant
    /// navigates forward and backward.
    Manual,
}

impl SessionMode {
    /// Parses `timed` / `manual` (case-insensitive).
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "timed" | "single" => Some(Self::Timed),
            "manual" | "multi" => Some(Self::Manual),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Timed => "timed",
            SessionMode::Manual => "manual",
        }
    }

    /// The other mode.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            SessionMode::Timed => SessionMode::Manual,
            SessionMode::Manual => SessionMode::Timed,
        }
    }
}

/// Scoring rule for repeated checks of the same multi-select question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecheckScoring {
    /// Every check increments one of the counters.
    #[default]
    EveryCheck,
    /// Only the first check of a question is counted. Later checks still
    /// refresh classification and feedback.
    FirstCheckOnly,
}

impl RecheckScoring {
    /// Parses `every` / `first` (case-insensitive).
    #[must_use]
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "every" | "every-check" => Some(Self::EveryCheck),
            "first" | "first-check" => Some(Self::FirstCheckOnly),
            _ => None,
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for one quiz session.
///
/// Chosen before `start_session` and fixed for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    mode: SessionMode,
    countdown_secs: u32,
    recheck_scoring: RecheckScoring,
}

impl SessionSettings {
    pub const MIN_COUNTDOWN_SECS: u32 = 1;
    pub const MAX_COUNTDOWN_SECS: u32 = 600;
    pub const DEFAULT_COUNTDOWN_SECS: u32 = 6;

    /// Creates custom session settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidCountdown` if `countdown_secs` is outside
    /// `1..=600`.
    pub fn new(
        mode: SessionMode,
        countdown_secs: u32,
        recheck_scoring: RecheckScoring,
    ) -> Result<Self, SettingsError> {
        validate_countdown(countdown_secs)?;
        Ok(Self {
            mode,
            countdown_secs,
            recheck_scoring,
        })
    }

    /// Single-select settings with the default countdown.
    #[must_use]
    pub fn timed() -> Self {
        Self::default()
    }

    /// Multi-select settings with manual navigation.
    #[must_use]
    pub fn manual() -> Self {
        Self::default().with_mode(SessionMode::Manual)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SessionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_recheck_scoring(mut self, recheck_scoring: RecheckScoring) -> Self {
        self.recheck_scoring = recheck_scoring;
        self
    }

    /// Replace the countdown starting value.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidCountdown` if out of range.
    pub fn with_countdown_secs(mut self, countdown_secs: u32) -> Result<Self, SettingsError> {
        validate_countdown(countdown_secs)?;
        self.countdown_secs = countdown_secs;
        Ok(self)
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    #[must_use]
    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    #[must_use]
    pub fn recheck_scoring(&self) -> RecheckScoring {
        self.recheck_scoring
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: SessionMode::Timed,
            countdown_secs: Self::DEFAULT_COUNTDOWN_SECS,
            recheck_scoring: RecheckScoring::EveryCheck,
        }
    }
}

fn validate_countdown(secs: u32) -> Result<(), SettingsError> {
    let range = SessionSettings::MIN_COUNTDOWN_SECS..=SessionSettings::MAX_COUNTDOWN_SECS;
    if range.contains(&secs) {
        Ok(())
    } else {
        Err(SettingsError::InvalidCountdown {
            got: secs,
            min: SessionSettings::MIN_COUNTDOWN_SECS,
            max: SessionSettings::MAX_COUNTDOWN_SECS,
        })
    }
}
