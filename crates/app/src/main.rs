mod terminal;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use quiz_core::model::QuizId;
use quiz_core::{RecheckScoring, SessionMode, SessionSettings};
use services::{QuizCatalog, SessionController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidMode { raw: String },
    InvalidCountdown { raw: String },
    InvalidRecheck { raw: String },
    MissingQuizFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidMode { raw } => write!(f, "invalid --mode value: {raw}"),
            ArgsError::InvalidCountdown { raw } => write!(f, "invalid --countdown value: {raw}"),
            ArgsError::InvalidRecheck { raw } => write!(f, "invalid --recheck value: {raw}"),
            ArgsError::MissingQuizFile => write!(f, "--quiz <file> is required"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug)]
struct Args {
    quiz_file: PathBuf,
    quiz_id: Option<QuizId>,
    mode: SessionMode,
    countdown_secs: u32,
    recheck: RecheckScoring,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  quiz --quiz <file.json> [--quiz-id <id>] [--mode timed|manual] [--countdown <secs>] [--recheck every|first]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --mode timed");
    eprintln!("  --countdown {}", SessionSettings::DEFAULT_COUNTDOWN_SECS);
    eprintln!("  --recheck every");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_FILE, QUIZ_ID, QUIZ_MODE, QUIZ_COUNTDOWN_SECS, QUIZ_RECHECK, RUST_LOG");
}

fn parse_mode(raw: String) -> Result<SessionMode, ArgsError> {
    SessionMode::from_name(&raw).ok_or(ArgsError::InvalidMode { raw })
}

fn parse_countdown(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidCountdown { raw })
}

fn parse_recheck(raw: String) -> Result<RecheckScoring, ArgsError> {
    RecheckScoring::from_name(&raw).ok_or(ArgsError::InvalidRecheck { raw })
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut quiz_file = env("QUIZ_FILE").map(PathBuf::from);
        let mut quiz_id = env("QUIZ_ID").map(QuizId::new);
        let mut mode = env("QUIZ_MODE")
            .map(parse_mode)
            .transpose()?
            .unwrap_or_default();
        let mut countdown_secs = env("QUIZ_COUNTDOWN_SECS")
            .map(parse_countdown)
            .transpose()?
            .unwrap_or(SessionSettings::DEFAULT_COUNTDOWN_SECS);
        let mut recheck = env("QUIZ_RECHECK")
            .map(parse_recheck)
            .transpose()?
            .unwrap_or_default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--quiz" => quiz_file = Some(PathBuf::from(require_value(args, "--quiz")?)),
                "--quiz-id" => quiz_id = Some(QuizId::new(require_value(args, "--quiz-id")?)),
                "--mode" => mode = parse_mode(require_value(args, "--mode")?)?,
                "--countdown" => {
                    countdown_secs = parse_countdown(require_value(args, "--countdown")?)?;
                }
                "--recheck" => recheck = parse_recheck(require_value(args, "--recheck")?)?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            quiz_file: quiz_file.ok_or(ArgsError::MissingQuizFile)?,
            quiz_id,
            mode,
            countdown_secs,
            recheck,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let settings = SessionSettings::new(parsed.mode, parsed.countdown_secs, parsed.recheck)?;
    let catalog = QuizCatalog::from_json_file(&parsed.quiz_file)?;
    info!(
        file = %parsed.quiz_file.display(),
        quizzes = catalog.len(),
        mode = ?settings.mode(),
        "catalog loaded"
    );

    let mut controller = SessionController::new(settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = std::io::stdout();
    let revisit_selection = parsed.quiz_id.is_none() && catalog.len() > 1;
    let mut mode = settings.mode();

    while let Some(quiz) = terminal::choose_quiz(
        &catalog,
        parsed.quiz_id.as_ref(),
        &mut mode,
        &mut lines,
        &mut out,
    )
    .await?
    {
        controller.set_settings(controller.settings().with_mode(mode));
        controller.start_session(quiz);
        let summary =
            terminal::run_session(&mut controller, &mut lines, &mut out, TICK_PERIOD).await?;
        if let Some(summary) = summary {
            info!(
                session = %summary.session_id,
                correct = summary.correct,
                incorrect = summary.incorrect,
                "session finished"
            );
            break;
        }
        if !revisit_selection {
            break;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut iter = argv.iter().map(|s| (*s).to_owned());
        Args::parse(&mut iter, |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--quiz", "b.json", "--mode", "manual", "--countdown", "3"],
            &[("QUIZ_FILE", "a.json"), ("QUIZ_MODE", "timed"), ("QUIZ_RECHECK", "first")],
        )
        .unwrap();

        assert_eq!(args.quiz_file, PathBuf::from("b.json"));
        assert_eq!(args.mode, SessionMode::Manual);
        assert_eq!(args.countdown_secs, 3);
        assert_eq!(args.recheck, RecheckScoring::FirstCheckOnly);
        assert!(args.quiz_id.is_none());
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = parse(&[], &[("QUIZ_FILE", "q.json"), ("QUIZ_ID", "abc")]).unwrap();
        assert_eq!(args.mode, SessionMode::Timed);
        assert_eq!(args.countdown_secs, SessionSettings::DEFAULT_COUNTDOWN_SECS);
        assert_eq!(args.recheck, RecheckScoring::EveryCheck);
        assert_eq!(args.quiz_id, Some(QuizId::new("abc")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(&[], &[]), Err(ArgsError::MissingQuizFile)));
        assert!(matches!(
            parse(&["--quiz"], &[]),
            Err(ArgsError::MissingValue { flag: "--quiz" })
        ));
        assert!(matches!(
            parse(&["--quiz", "q.json", "--mode", "speed"], &[]),
            Err(ArgsError::InvalidMode { .. })
        ));
        assert!(matches!(
            parse(&["--quiz", "q.json", "--countdown", "soon"], &[]),
            Err(ArgsError::InvalidCountdown { .. })
        ));
        assert!(matches!(
            parse(&[], &[("QUIZ_FILE", "q.json"), ("QUIZ_RECHECK", "never")]),
            Err(ArgsError::InvalidRecheck { .. })
        ));
        assert!(matches!(
            parse(&["--verbose"], &[]),
            Err(ArgsError::UnknownArg(_))
        ));
    }
}
