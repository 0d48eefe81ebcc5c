use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

use quiz_core::model::{FeedbackMessage, Quiz, SessionId};
use quiz_core::{Clock, RecheckScoring, SessionMode, SessionSettings};

use super::countdown::{Countdown, CountdownHandle, Tick};
use super::policy::{Evaluation, EvaluationPolicy, policy_for};
use super::progress::SessionProgress;
use super::shuffle::shuffle_quiz;
use super::state::{Feedback, SessionPhase, SessionState};
use super::summary::SessionSummary;
use super::view::SessionSnapshot;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What an evaluation did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub question: usize,
    pub message: FeedbackMessage,
    /// Whether a score counter was incremented.
    pub counted: bool,
    /// Countdown started by this evaluation (timed mode only).
    pub countdown: Option<CountdownHandle>,
}

/// What a countdown tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Counting { remaining: u32 },
    Advanced { index: usize },
    Completed,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

struct ActiveSession {
    id: SessionId,
    quiz: Quiz,
    settings: SessionSettings,
    policy: Box<dyn EvaluationPolicy>,
    state: SessionState,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl ActiveSession {
    fn in_progress(&mut self) -> Result<&mut Self, SessionError> {
        if self.state.is_complete() {
            Err(SessionError::Completed)
        } else {
            Ok(self)
        }
    }

    /// Running session whose policy supports `operation`.
    fn allowing(
        &mut self,
        supported: impl FnOnce(&dyn EvaluationPolicy) -> bool,
        operation: &'static str,
    ) -> Result<&mut Self, SessionError> {
        if !supported(self.policy.as_ref()) {
            return Err(SessionError::UnsupportedInMode {
                operation,
                mode: self.policy.mode(),
            });
        }
        self.in_progress()
    }

    /// Evaluate the current question against `chosen`, or against the
    /// selection when `None`.
    fn evaluate(
        &mut self,
        chosen: Option<&BTreeSet<String>>,
    ) -> Result<EvaluationOutcome, SessionError> {
        let policy = self.policy.as_ref();
        let state = &mut self.state;
        let evaluation = evaluate_current(policy, state, chosen.unwrap_or(&state.selection))?;
        Ok(apply_evaluation(
            policy,
            self.settings.recheck_scoring(),
            state,
            evaluation,
        ))
    }

    fn mark_completed(&mut self, clock: &Clock) {
        if self.completed_at.is_some() {
            return;
        }
        self.completed_at = Some(clock.now());
        info!(
            session = %self.id,
            correct = self.state.correct_count(),
            incorrect = self.state.incorrect_count(),
            "session completed"
        );
    }

    fn summary(&self) -> Option<SessionSummary> {
        let completed_at = self.completed_at?;
        Some(SessionSummary {
            session_id: self.id,
            quiz_id: self.quiz.id().cloned(),
            title: self.quiz.title().to_owned(),
            total_questions: self.state.ordered_questions().len(),
            evaluated: self.state.evaluated_count(),
            correct: self.state.correct_count(),
            incorrect: self.state.incorrect_count(),
            started_at: self.started_at,
            completed_at,
        })
    }
}

/// Drives one quiz attempt at a time, from selection to completion.
///
/// Every operation either applies fully or returns a `SessionError` and leaves
/// the session untouched. Each session picks its `EvaluationPolicy` from the
/// settings in effect when it starts, so one controller can run timed and
/// manual sessions in turn.
pub struct SessionController {
    settings: SessionSettings,
    clock: Clock,
    active: Option<ActiveSession>,
}

impl SessionController {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            clock: Clock::default(),
            active: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Settings the next session will start with.
    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Replace the settings for sessions started from now on. A running
    /// session keeps the settings it started with.
    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    /// Mode of the running session, or of the next one if none is running.
    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.active
            .as_ref()
            .map_or(self.settings.mode(), |session| session.policy.mode())
    }

    /// Start a session for `quiz` with a thread-local random order.
    pub fn start_session(&mut self, quiz: Quiz) -> &SessionState {
        let mut rng = rand::rng();
        self.start_session_with_rng(quiz, &mut rng)
    }

    /// Start a session for `quiz`, replacing any current one.
    ///
    /// Questions and each question's options are permuted with `rng`. Counters,
    /// classifications and the countdown start fresh. A quiz without questions
    /// is completed immediately.
    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &mut self,
        quiz: Quiz,
        rng: &mut R,
    ) -> &SessionState {
        self.abandon();

        let settings = self.settings;
        let policy = policy_for(settings.mode());
        let timer = policy
            .uses_countdown()
            .then(|| Countdown::new(settings.countdown_secs()));
        let state = SessionState::new(shuffle_quiz(&quiz, rng), timer);
        let id = SessionId::random();

        info!(
            session = %id,
            quiz = quiz.title(),
            questions = state.ordered_questions().len(),
            mode = ?policy.mode(),
            "session started"
        );

        let session = self.active.insert(ActiveSession {
            id,
            quiz,
            settings,
            policy,
            state,
            started_at: self.clock.now(),
            completed_at: None,
        });
        if session.state.is_complete() {
            session.mark_completed(&self.clock);
        }
        &session.state
    }

    /// Answer the current question with a single option (timed mode).
    ///
    /// Starts the auto-advance countdown. A question is answered at most once;
    /// later calls return `SessionError::AlreadyAnswered`.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` describing why the call was ignored.
    pub fn submit_answer(&mut self, option: &str) -> Result<EvaluationOutcome, SessionError> {
        let session = current(&mut self.active)?
            .allowing(|policy| policy.is_single_select(), "submit_answer")?;
        let index = session.state.current_index;

        if session.state.answer_status.contains_key(&index) {
            return Err(SessionError::AlreadyAnswered { index });
        }
        ensure_offered(&session.state, option)?;

        let chosen = BTreeSet::from([option.to_owned()]);
        session.evaluate(Some(&chosen))
    }

    /// Add `option` to the selection, or remove it if already selected
    /// (manual mode). Returns whether the option is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` describing why the call was ignored.
    pub fn toggle_option(&mut self, option: &str) -> Result<bool, SessionError> {
        let state = &mut current(&mut self.active)?
            .allowing(|policy| !policy.is_single_select(), "toggle_option")?
            .state;
        ensure_offered(state, option)?;

        let selected = if state.selection.remove(option) {
            false
        } else {
            state.selection.insert(option.to_owned());
            true
        };
        debug!(question = state.current_index, option, selected, "option toggled");
        Ok(selected)
    }

    /// Compare the selection with the correct set (manual mode).
    ///
    /// May be repeated; each check overwrites the question's classification and
    /// feedback. Whether repeated checks are counted follows
    /// `RecheckScoring`.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` describing why the call was ignored.
    pub fn check_answer(&mut self) -> Result<EvaluationOutcome, SessionError> {
        let session = current(&mut self.active)?
            .allowing(|policy| !policy.is_single_select(), "check_answer")?;
        let index = session.state.current_index;

        if session.state.answer_status.contains_key(&index)
            && !session.policy.allows_reevaluation()
        {
            return Err(SessionError::AlreadyAnswered { index });
        }
        session.evaluate(None)
    }

    /// Move to the next question (manual mode), stopping at the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtBoundary` on the last question, or another
    /// `SessionError` describing why the call was ignored.
    pub fn advance(&mut self) -> Result<usize, SessionError> {
        let state = &mut current(&mut self.active)?
            .allowing(|policy| policy.allows_navigation(), "advance")?
            .state;
        let next = state.current_index + 1;
        if next >= state.ordered_questions.len() {
            return Err(SessionError::AtBoundary("last"));
        }
        Ok(move_to(state, next))
    }

    /// Move to the previous question (manual mode), stopping at the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtBoundary` on the first question, or another
    /// `SessionError` describing why the call was ignored.
    pub fn retreat(&mut self) -> Result<usize, SessionError> {
        let state = &mut current(&mut self.active)?
            .allowing(|policy| policy.allows_navigation(), "retreat")?
            .state;
        let Some(previous) = state.current_index.checked_sub(1) else {
            return Err(SessionError::AtBoundary("first"));
        };
        Ok(move_to(state, previous))
    }

    /// End a manual session; it becomes `Completed`.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` describing why the call was ignored.
    pub fn finish(&mut self) -> Result<SessionSummary, SessionError> {
        let session = current(&mut self.active)?
            .allowing(|policy| policy.allows_navigation(), "finish")?;
        let state = &mut session.state;
        state.hide_feedback();
        state.selection.clear();
        state.current_index = state.ordered_questions.len();
        session.mark_completed(&self.clock);
        session.summary().ok_or(SessionError::Completed)
    }

    /// Countdown currently running, if any. Tick it once per second.
    #[must_use]
    pub fn countdown_handle(&self) -> Option<CountdownHandle> {
        self.active
            .as_ref()
            .and_then(|session| session.state.timer())
            .and_then(Countdown::active)
    }

    /// Apply one countdown tick.
    ///
    /// The tick that exhausts the countdown hides feedback, resets the
    /// countdown and moves to the next question, completing the session after
    /// the last one. Ticks from a cancelled or superseded countdown are
    /// rejected with `SessionError::StaleTick`.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` describing why the tick was ignored.
    pub fn tick(&mut self, handle: CountdownHandle) -> Result<TickOutcome, SessionError> {
        let session = current(&mut self.active)?.in_progress()?;
        let state = &mut session.state;
        if handle.question() != state.current_index {
            return Err(SessionError::StaleTick);
        }
        let timer = state.timer.as_mut().ok_or(SessionError::NoCountdown)?;

        match timer.tick(handle) {
            Tick::Stale => Err(SessionError::StaleTick),
            Tick::Running { remaining } => Ok(TickOutcome::Counting { remaining }),
            Tick::Expired => {
                state.hide_feedback();
                state.selection.clear();
                state.current_index += 1;
                debug!(question = state.current_index, "auto-advanced");
                if state.is_complete() {
                    session.mark_completed(&self.clock);
                    Ok(TickOutcome::Completed)
                } else {
                    Ok(TickOutcome::Advanced {
                        index: state.current_index,
                    })
                }
            }
        }
    }

    /// Tear the session down and return to quiz selection.
    ///
    /// Cancels any pending countdown. Returns whether a session was active.
    pub fn abandon(&mut self) -> bool {
        let Some(mut session) = self.active.take() else {
            return false;
        };
        if let Some(timer) = session.state.timer.as_mut() {
            timer.cancel();
        }
        debug!(session = %session.id, "session abandoned");
        true
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.active
            .as_ref()
            .map_or(SessionPhase::Selecting, |session| session.state.phase())
    }

    #[must_use]
    pub fn state(&self) -> Option<&SessionState> {
        self.active.as_ref().map(|session| &session.state)
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        self.active.as_ref().map(|session| &session.quiz)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.active.as_ref().map(|session| session.id)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.active {
            Some(session) => {
                SessionSnapshot::from_state(session.quiz.title(), self.mode(), &session.state)
            }
            None => SessionSnapshot::selecting(self.mode()),
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.state().map_or_else(SessionProgress::default, |state| {
            let total = state.ordered_questions().len();
            SessionProgress {
                total,
                current_index: state.current_index(),
                answered: state.evaluated_count(),
                remaining: total.saturating_sub(state.current_index()),
                is_complete: state.is_complete(),
            }
        })
    }

    /// Final tally, once the session is completed.
    #[must_use]
    pub fn summary(&self) -> Option<SessionSummary> {
        self.active.as_ref().and_then(ActiveSession::summary)
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("session_id", &self.session_id())
            .field("phase", &self.phase())
            .field("current_index", &self.state().map(SessionState::current_index))
            .finish_non_exhaustive()
    }
}

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

fn current(active: &mut Option<ActiveSession>) -> Result<&mut ActiveSession, SessionError> {
    active.as_mut().ok_or(SessionError::NoActiveSession)
}

fn ensure_offered(state: &SessionState, option: &str) -> Result<(), SessionError> {
    match state.current_question() {
        Some(question) if question.offers(option) => Ok(()),
        Some(_) => Err(SessionError::UnknownOption(option.to_owned())),
        None => Err(SessionError::Completed),
    }
}

fn evaluate_current(
    policy: &dyn EvaluationPolicy,
    state: &SessionState,
    chosen: &BTreeSet<String>,
) -> Result<Evaluation, SessionError> {
    state
        .current_question()
        .map(|question| policy.evaluate(question, chosen))
        .ok_or(SessionError::Completed)
}

fn apply_evaluation(
    policy: &dyn EvaluationPolicy,
    recheck: RecheckScoring,
    state: &mut SessionState,
    evaluation: Evaluation,
) -> EvaluationOutcome {
    let index = state.current_index;

    let previously_evaluated = state
        .answer_status
        .insert(index, evaluation.classification)
        .is_some();
    let counted = match recheck {
        RecheckScoring::EveryCheck => true,
        RecheckScoring::FirstCheckOnly => !previously_evaluated,
    };
    if counted {
        state.record_verdict(evaluation.message.is_correct());
    }

    state.feedback = Some(Feedback {
        message: evaluation.message,
        visible: true,
    });
    let countdown = if policy.uses_countdown() {
        state.timer.as_mut().map(|timer| timer.start(index))
    } else {
        None
    };

    debug!(
        question = index,
        verdict = %evaluation.message,
        counted,
        correct = state.correct_count,
        incorrect = state.incorrect_count,
        "question evaluated"
    );

    EvaluationOutcome {
        question: index,
        message: evaluation.message,
        counted,
        countdown,
    }
}

fn move_to(state: &mut SessionState, index: usize) -> usize {
    state.hide_feedback();
    state.selection.clear();
    state.current_index = index;
    debug!(question = index, "moved to question");
    index
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
