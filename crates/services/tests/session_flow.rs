use quiz_core::model::{FeedbackMessage, OptionStatus, QuizId};
use quiz_core::time::fixed_clock;
use quiz_core::{RecheckScoring, SessionSettings};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{QuizCatalog, SessionController, SessionPhase, TickOutcome};

const QUIZZES: &str = r#"[
    {
        "_id": "arith",
        "title": "ARITHMETIC",
        "questions": [
            { "questionText": "2+2=?", "options": ["3", "4", "5"], "correctAnswer": "4" },
            { "questionText": "Capital of France?", "options": ["Paris", "Lyon"], "correctAnswer": "Paris" }
        ]
    },
    {
        "_id": "letters",
        "title": "LETTERS",
        "questions": [
            { "questionText": "Pick the vowels", "options": ["A", "B", "C"], "correctAnswer": "A, C" }
        ]
    }
]"#;

fn answer_key(question: &str) -> &'static str {
    match question {
        "2+2=?" => "4",
        "Capital of France?" => "Paris",
        other => panic!("unexpected question {other}"),
    }
}

#[test]
fn timed_quiz_from_catalog_runs_to_completion() {
    let catalog = QuizCatalog::from_json_str(QUIZZES).unwrap();
    let quiz = catalog.get(&QuizId::new("arith")).unwrap().clone();

    let mut controller = SessionController::new(SessionSettings::timed()).with_clock(fixed_clock());
    let mut rng = StdRng::seed_from_u64(2024);
    controller.start_session_with_rng(quiz, &mut rng);

    let mut auto_advances = 0;
    while !controller.is_complete() {
        let snapshot = controller.snapshot();
        let question = snapshot.question.expect("question while in progress");
        let outcome = controller.submit_answer(answer_key(&question.text)).unwrap();
        assert_eq!(outcome.message, FeedbackMessage::CorrectAnswer);

        let handle = outcome.countdown.expect("timed mode starts a countdown");
        loop {
            match controller.tick(handle).unwrap() {
                TickOutcome::Counting { remaining } => assert!(remaining > 0),
                TickOutcome::Advanced { .. } | TickOutcome::Completed => break,
            }
        }
        auto_advances += 1;
    }

    assert_eq!(auto_advances, 2);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.phase, SessionPhase::Completed);
    assert_eq!(snapshot.correct_count, 2);
    assert_eq!(snapshot.incorrect_count, 0);
    assert!(snapshot.question.is_none());

    let summary = controller.summary().unwrap();
    assert_eq!(summary.quiz_id, Some(QuizId::new("arith")));
    assert_eq!(summary.accuracy(), Some(1.0));
}

#[test]
fn multi_select_quiz_checks_exact_set() {
    let catalog = QuizCatalog::from_json_str(QUIZZES).unwrap();
    let quiz = catalog.get(&QuizId::new("letters")).unwrap().clone();

    let mut controller = SessionController::new(SessionSettings::manual());
    controller.start_session(quiz);

    controller.toggle_option("A").unwrap();
    assert_eq!(
        controller.check_answer().unwrap().message,
        FeedbackMessage::WrongAnswer
    );

    controller.toggle_option("C").unwrap();
    assert_eq!(
        controller.check_answer().unwrap().message,
        FeedbackMessage::CorrectAnswer
    );

    let snapshot = controller.snapshot();
    let question = snapshot.question.unwrap();
    let status = |text: &str| {
        question
            .options
            .iter()
            .find(|o| o.text == text)
            .and_then(|o| o.status)
    };
    assert_eq!(status("A"), Some(OptionStatus::Correct));
    assert_eq!(status("B"), Some(OptionStatus::Default));
    assert_eq!(status("C"), Some(OptionStatus::Correct));
    assert_eq!(snapshot.correct_count, 1);
    assert_eq!(snapshot.incorrect_count, 1);
}

#[test]
fn recheck_policy_changes_only_counting() {
    let catalog = QuizCatalog::from_json_str(QUIZZES).unwrap();
    let quiz = catalog.get(&QuizId::new("letters")).unwrap();

    let totals: Vec<u32> = [RecheckScoring::EveryCheck, RecheckScoring::FirstCheckOnly]
        .into_iter()
        .map(|recheck| {
            let settings = SessionSettings::manual().with_recheck_scoring(recheck);
            let mut controller = SessionController::new(settings);
            controller.start_session(quiz.clone());
            for _ in 0..3 {
                controller.check_answer().unwrap();
            }
            let state = controller.state().unwrap();
            state.correct_count() + state.incorrect_count()
        })
        .collect();

    assert_eq!(totals, vec![3, 1]);
}
