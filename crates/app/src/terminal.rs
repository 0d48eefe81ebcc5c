//! Line-oriented terminal driver for a quiz session.
//!
//! Reads one command per line and ticks the countdown on a real-time interval.
//! Everything the participant sees goes to `out`; diagnostics go through
//! `tracing`.

use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use tokio::io::{AsyncBufRead, Lines};
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use quiz_core::SessionMode;
use quiz_core::model::{OptionStatus, Quiz, QuizId};
use services::{
    QuizCatalog, SessionController, SessionError, SessionPhase, SessionSnapshot, SessionSummary,
    TickOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// 0-based option index.
    Option(usize),
    Check,
    Next,
    Previous,
    Finish,
    Quit,
    Help,
}

impl Command {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(number) = raw.parse::<usize>() {
            return number.checked_sub(1).map(Self::Option);
        }
        match raw.to_ascii_lowercase().as_str() {
            "c" | "check" => Some(Self::Check),
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "f" | "finish" => Some(Self::Finish),
            "q" | "quit" | "home" => Some(Self::Quit),
            "h" | "help" | "?" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Pick the quiz to play.
///
/// Uses `preferred` when given, the only quiz when there is one, and otherwise
/// asks for a list number or id. While the list is shown, `m` switches
/// `mode` for the session about to start. Returns `None` if input ends first.
///
/// # Errors
///
/// Returns an error if `preferred` is not in the catalog or I/O fails.
pub async fn choose_quiz<R, W>(
    catalog: &QuizCatalog,
    preferred: Option<&QuizId>,
    mode: &mut SessionMode,
    lines: &mut Lines<R>,
    out: &mut W,
) -> Result<Option<Quiz>, Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Some(id) = preferred {
        return Ok(Some(catalog.get(id)?.clone()));
    }

    let items = catalog.list();
    if let [only] = items.as_slice() {
        return Ok(Some(catalog.get(&only.id)?.clone()));
    }

    writeln!(out, "Select Quiz")?;
    for (position, item) in items.iter().enumerate() {
        writeln!(
            out,
            "  {}) {} [{}] - {} questions",
            position + 1,
            item.title,
            item.id,
            item.question_count
        )?;
    }
    writeln!(out, "Mode: {} (m to switch)", mode.as_str())?;

    while let Some(line) = lines.next_line().await? {
        let choice = line.trim();
        if choice.eq_ignore_ascii_case("m") {
            *mode = mode.toggled();
            writeln!(out, "Mode: {}", mode.as_str())?;
            continue;
        }
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|number| number.checked_sub(1))
            .and_then(|index| items.get(index))
            .map(|item| item.id.clone())
            .or_else(|| {
                items
                    .iter()
                    .find(|item| item.id.as_str() == choice)
                    .map(|item| item.id.clone())
            });

        match picked {
            Some(id) => return Ok(Some(catalog.get(&id)?.clone())),
            None => writeln!(out, "Quiz not found")?,
        }
    }

    Ok(None)
}

/// Drive `controller` until its session completes, the participant quits, or
/// input ends with no countdown left to run.
///
/// Input is paused while a countdown runs. Returns the completion summary, or
/// `None` if the session was left unfinished.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run_session<R, W>(
    controller: &mut SessionController,
    lines: &mut Lines<R>,
    out: &mut W,
    tick_period: Duration,
) -> io::Result<Option<SessionSummary>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut ticker = time::interval(tick_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut input_open = true;

    render(out, &controller.snapshot())?;

    while !controller.is_complete() {
        let counting = controller.countdown_handle();
        if counting.is_none() && !input_open {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open && counting.is_none() => {
                let Some(line) = line? else {
                    input_open = false;
                    continue;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => {
                        controller.abandon();
                        writeln!(out, "Left the quiz.")?;
                        return Ok(None);
                    }
                    Some(Command::Help) | None => print_help(out, controller.mode())?,
                    Some(command) => {
                        if let Err(err) = apply(controller, command) {
                            debug!(%err, "action ignored");
                            writeln!(out, "({err})")?;
                        }
                        if controller.countdown_handle().is_some() {
                            ticker.reset();
                        }
                        render(out, &controller.snapshot())?;
                    }
                }
            }
            _ = ticker.tick(), if counting.is_some() => {
                let Some(handle) = counting else {
                    continue;
                };
                match controller.tick(handle) {
                    Ok(TickOutcome::Counting { remaining }) => {
                        writeln!(out, "Next question in {remaining} seconds...")?;
                    }
                    Ok(TickOutcome::Advanced { .. } | TickOutcome::Completed) => {
                        render(out, &controller.snapshot())?;
                    }
                    Err(err) => debug!(%err, "tick ignored"),
                }
            }
            else => break,
        }
    }

    let summary = controller.summary();
    if let Some(summary) = &summary {
        render_summary(out, summary)?;
    }
    Ok(summary)
}

fn apply(controller: &mut SessionController, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Option(index) => {
            let option = controller
                .snapshot()
                .question
                .and_then(|question| question.options.into_iter().nth(index))
                .map(|view| view.text)
                .ok_or_else(|| SessionError::UnknownOption(format!("#{}", index + 1)))?;
            match controller.mode() {
                SessionMode::Timed => controller.submit_answer(&option).map(drop),
                SessionMode::Manual => controller.toggle_option(&option).map(drop),
            }
        }
        Command::Check => controller.check_answer().map(drop),
        Command::Next => controller.advance().map(drop),
        Command::Previous => controller.retreat().map(drop),
        Command::Finish => controller.finish().map(drop),
        Command::Quit | Command::Help => Ok(()),
    }
}

fn render<W: Write>(out: &mut W, snapshot: &SessionSnapshot) -> io::Result<()> {
    match snapshot.phase {
        SessionPhase::Selecting => writeln!(out, "No quiz selected."),
        SessionPhase::Completed => {
            writeln!(out, "Quiz Completed!")?;
            writeln!(out, "Your final score is:")?;
            writeln!(out, "Correct: {}", snapshot.correct_count)?;
            writeln!(out, "Incorrect: {}", snapshot.incorrect_count)
        }
        SessionPhase::InProgress | SessionPhase::Answered => {
            if let Some(question) = &snapshot.question {
                writeln!(out)?;
                writeln!(
                    out,
                    "Question {}/{}: {}",
                    question.number(),
                    question.total,
                    question.text
                )?;
                for (position, option) in question.options.iter().enumerate() {
                    let mark = match option.status {
                        Some(status @ (OptionStatus::Correct | OptionStatus::Incorrect)) => {
                            format!(" ({})", status.as_str())
                        }
                        Some(OptionStatus::Default) | None if option.selected => " [x]".to_owned(),
                        Some(OptionStatus::Default) | None => String::new(),
                    };
                    writeln!(out, "  {}) {}{mark}", position + 1, option.text)?;
                }
            }
            if let Some(message) = snapshot.visible_feedback() {
                writeln!(out, "{message}")?;
            }
            if let Some(remaining) = snapshot.countdown_remaining {
                writeln!(out, "Next question in {remaining} seconds...")?;
            }
            writeln!(
                out,
                "Correct: {}  Incorrect: {}",
                snapshot.correct_count, snapshot.incorrect_count
            )
        }
    }
}

fn render_summary<W: Write>(out: &mut W, summary: &SessionSummary) -> io::Result<()> {
    writeln!(
        out,
        "Answered {} of {} questions in {}s",
        summary.evaluated,
        summary.total_questions,
        summary.duration().num_seconds()
    )?;
    if let Some(accuracy) = summary.accuracy() {
        writeln!(out, "Accuracy: {:.0}%", accuracy * 100.0)?;
    }
    Ok(())
}

fn print_help<W: Write>(out: &mut W, mode: SessionMode) -> io::Result<()> {
    match mode {
        SessionMode::Timed => writeln!(out, "Enter an option number to answer, q to quit."),
        SessionMode::Manual => writeln!(
            out,
            "Option number toggles it; c checks, n/p move, f finishes, q quits."
        ),
    }
}
