use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quiz_core::model::{
    GenerationOverrides, GenerationParams, JobId, Question, QuestionId, QuestionType, Quiz,
    SubmittedAnswer,
};
use quiz_core::time::fixed_clock;
use services::{ApiError, QuizGenerator, QuizSessionService, SessionError, SessionStatus};
use storage::{LocalState, StoredQuiz};

/// Hands out queued results and records every request.
#[derive(Default)]
struct ScriptedGenerator {
    results: Mutex<VecDeque<Result<Quiz, ApiError>>>,
    requests: Mutex<Vec<GenerationParams>>,
}

impl ScriptedGenerator {
    fn push_ok(&self, quiz: Quiz) {
        self.results.lock().unwrap().push_back(Ok(quiz));
    }

    fn push_err(&self) {
        self.results
            .lock()
            .unwrap()
            .push_back(Err(ApiError::MissingToken));
    }

    fn requests(&self) -> Vec<GenerationParams> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizGenerator for ScriptedGenerator {
    async fn create_quiz(&self, params: &GenerationParams) -> Result<Quiz, ApiError> {
        self.requests.lock().unwrap().push(params.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected generation request")
    }
}

fn quiz(title: &str, ids: &[&str]) -> Quiz {
    Quiz::new(
        title,
        ids.iter()
            .map(|id| {
                Question::new(*id, QuestionType::McqSingle, format!("Question {id}"))
                    .with_options(["A", "B"])
                    .with_correct_answers(["A"])
            })
            .collect(),
    )
}

fn setup() -> (QuizSessionService, Arc<ScriptedGenerator>, LocalState) {
    let generator = Arc::new(ScriptedGenerator::default());
    let state = LocalState::in_memory();
    let service = QuizSessionService::new(fixed_clock(), state.clone(), generator.clone());
    (service, generator, state)
}

#[tokio::test]
async fn generate_take_and_summarize() {
    let (service, generator, state) = setup();
    generator.push_ok(quiz("Week 3", &["a", "b", "c"]));

    let params = GenerationParams::new(JobId::new("job-3")).with_num_questions(3);
    let mut session = service.generate(params.clone()).await.unwrap();

    assert_eq!(state.job_id().await.unwrap(), Some(JobId::new("job-3")));
    let stored = state.load_quiz().await.unwrap().unwrap();
    assert_eq!(stored.generation, Some(params));

    for answer in ["A", "B", "A"] {
        session.submit_current(SubmittedAnswer::single(answer)).unwrap();
        session.advance();
    }

    assert_eq!(session.status(), SessionStatus::Finished);
    let summary = session.compute_summary().unwrap();
    assert_eq!(summary.total(), 3);
    assert_eq!(summary.correct(), 2);
    assert_eq!(summary.accuracy_percent(), 66.7);
}

#[tokio::test]
async fn resume_reads_stored_quiz_or_empty_state() {
    let (service, _generator, state) = setup();

    let empty = service.resume().await.unwrap();
    assert_eq!(empty.status(), SessionStatus::Empty);

    let params = GenerationParams::new(JobId::new("job-1"));
    state
        .save_quiz(&StoredQuiz::new(quiz("Saved", &["x"]), params.clone()))
        .await
        .unwrap();

    let session = service.resume().await.unwrap();
    assert_eq!(session.title(), "Saved");
    assert_eq!(session.params(), Some(&params));
    assert_eq!(session.status(), SessionStatus::InProgress);
}

#[tokio::test]
async fn regenerate_without_job_id_leaves_session_alone() {
    let (service, generator, state) = setup();
    state
        .save_quiz(&StoredQuiz::new(
            quiz("Saved", &["x", "y"]),
            GenerationParams::new(JobId::new("job-1")),
        ))
        .await
        .unwrap();

    let mut session = service.resume().await.unwrap();
    session
        .submit_answer(&QuestionId::new("x"), SubmittedAnswer::single("A"))
        .unwrap();
    let before = session.state().clone();

    let err = service
        .regenerate(&mut session, GenerationOverrides::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::MissingJobId));
    assert_eq!(session.state(), &before);
    assert!(generator.requests().is_empty());
}

#[tokio::test]
async fn failed_regeneration_keeps_session_and_stored_quiz() {
    let (service, generator, state) = setup();
    generator.push_ok(quiz("First", &["a", "b"]));
    generator.push_err();

    let mut session = service
        .generate(GenerationParams::new(JobId::new("job-9")))
        .await
        .unwrap();
    session.skip().unwrap();
    session.submit_current(SubmittedAnswer::single("A")).unwrap();
    session.advance();
    let before = session.state().clone();

    let err = service
        .regenerate(&mut session, GenerationOverrides::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Generation(_)));
    assert_eq!(session.state(), &before);
    assert_eq!(session.title(), "First");
    let stored = state.load_quiz().await.unwrap().unwrap();
    assert_eq!(stored.quiz.title, "First");
}

#[tokio::test]
async fn regeneration_reuses_params_with_overrides() {
    let (service, generator, state) = setup();
    generator.push_ok(quiz("First", &["a"]));
    generator.push_ok(quiz("Second", &["n1", "n2"]));

    let original = GenerationParams::new(JobId::new("job-5"))
        .with_topic_hint("trees")
        .with_num_questions(1);
    let mut session = service.generate(original).await.unwrap();
    session.submit_current(SubmittedAnswer::single("A")).unwrap();
    session.advance();
    assert!(session.is_finished());

    service
        .regenerate(
            &mut session,
            GenerationOverrides {
                num_questions: Some(2),
                ..GenerationOverrides::default()
            },
        )
        .await
        .unwrap();

    let requests = generator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].job_id, JobId::new("job-5"));
    assert_eq!(requests[1].topic_hint, "trees");
    assert_eq!(requests[1].num_questions, 2);

    assert_eq!(session.title(), "Second");
    assert!(!session.is_finished());
    assert!(session.answers().is_empty());
    assert_eq!(session.current_index(), 0);

    let stored = state.load_quiz().await.unwrap().unwrap();
    assert_eq!(stored.quiz.title, "Second");
    assert_eq!(stored.generation.unwrap().num_questions, 2);
}

#[tokio::test]
async fn invalid_params_are_rejected_before_any_request() {
    let (service, generator, _state) = setup();
    let err = service
        .generate(GenerationParams::new(JobId::new("job")).with_types(Vec::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidParams(_)));
    assert!(generator.requests().is_empty());
}
