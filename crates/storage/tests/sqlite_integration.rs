use quiz_core::auth::{AuthContext, Role};
use quiz_core::model::{GenerationParams, JobId, Question, QuestionType, Quiz};
use storage::sqlite::SqliteStore;
use storage::{KeyValueStore, LocalState, StoredQuiz};

#[tokio::test]
async fn sqlite_store_upserts_and_removes() {
    let store = SqliteStore::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");
    // Running migrations twice is a no-op.
    store.migrate().await.expect("migrate again");

    assert_eq!(store.get("job_id").await.unwrap(), None);

    store.set("job_id", "first").await.unwrap();
    store.set("job_id", "second").await.unwrap();
    assert_eq!(store.get("job_id").await.unwrap().as_deref(), Some("second"));

    store.remove("job_id").await.unwrap();
    assert_eq!(store.get("job_id").await.unwrap(), None);
}

#[tokio::test]
async fn local_state_over_sqlite_keeps_quiz_and_auth() {
    let state = LocalState::sqlite("sqlite:file:memdb_state?mode=memory&cache=shared")
        .await
        .expect("open");

    let quiz = Quiz::new(
        "Persisted",
        vec![
            Question::new("q1", QuestionType::McqMulti, "Pick")
                .with_options(["a", "b", "c"])
                .with_correct_answers(["a", "c"]),
        ],
    );
    let params = GenerationParams::new(JobId::new("job-9")).with_num_questions(3);
    state
        .save_quiz(&StoredQuiz::new(quiz.clone(), params.clone()))
        .await
        .unwrap();
    state.set_job_id(&params.job_id).await.unwrap();
    state.set_access_token("token").await.unwrap();
    state.set_role(Role::Tutor).await.unwrap();

    let loaded = state.load_quiz().await.unwrap().expect("quiz stored");
    assert_eq!(loaded.quiz, quiz);
    assert_eq!(loaded.generation, Some(params));
    assert_eq!(state.job_id().await.unwrap(), Some(JobId::new("job-9")));
    assert_eq!(
        state.auth_context().await.unwrap(),
        AuthContext::with_role(Role::Tutor)
    );
}
