use std::sync::Mutex;
use std::time::Duration;

use edusolve_core::{ChatRole, SessionStatus, UploadedFile};
use edusolve_runtime::gateway::EMPTY_RESPONSE_FALLBACK;
use edusolve_runtime::study::CHAT_FALLBACK;
use edusolve_runtime::{ClipboardSink, RuntimeConfig, RuntimeError, StudySession};
use mockito::{Matcher, Server};
use serde_json::json;
use tempfile::TempDir;

const GENERATE_PATH: &str = "/models/gemini-3-pro-preview:generateContent";

const ANSWER: &str = "# 1. Solution\n## Question 1\nx = 2\n[[EXPLICATION]]\nOn isole x.\n[[/EXPLICATION]]\n## Question 2\n- `let y = x;`\n[[EXPLICATION]]\nAffectation.\n[[/EXPLICATION]]\n# 2. Explications détaillées\nRésumé";

fn gemini_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    })
    .to_string()
}

fn session_for(server: &Server) -> StudySession {
    let config = RuntimeConfig::new()
        .with_api_key("test-key")
        .with_base_url(server.url())
        .with_export_settle(Duration::ZERO);
    StudySession::from_config(config)
}

fn pdf(name: &str) -> UploadedFile {
    UploadedFile::from_bytes(name, "application/pdf", b"%PDF-1.4")
}

fn with_inputs(session: &mut StudySession) {
    session.add_course_files(vec![pdf("cours.pdf")]);
    session.set_exercise_file(pdf("td.pdf"));
}

#[derive(Default)]
struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: &str) -> edusolve_runtime::Result<()> {
        *self.text.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_solve_requires_inputs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    let mut session = session_for(&server);
    session.add_course_files(vec![pdf("cours.pdf")]);

    let err = session.solve().await.unwrap_err();
    assert!(matches!(err, RuntimeError::MissingInputs));
    assert_eq!(session.status(), SessionStatus::Idle);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_solve_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Regex("CONTEXTE".to_string()))
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .create_async()
        .await;

    let mut session = session_for(&server);
    let mut status = session.subscribe();
    with_inputs(&mut session);

    let solution = session.solve().await.unwrap();
    assert_eq!(solution.text, ANSWER);
    assert_eq!(session.status(), SessionStatus::Solved);
    assert!(status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SessionStatus::Solved);

    assert!(session.chat_available());
    assert_eq!(
        edusolve_core::document::explanation_indices(session.document()),
        vec![1, 2]
    );
    assert_eq!(session.visibility().expanded_count(), 0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unsupported_media_type_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(400)
        .with_body(
            r#"{"error":{"code":400,"message":"Unsupported MIME type: application/msword","status":"INVALID_ARGUMENT"}}"#,
        )
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);

    let err = session.solve().await.unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedMediaType(_)));
    assert_eq!(
        session.status(),
        SessionStatus::error(
            "L'un des fichiers possède un format non supporté par l'IA. Veuillez privilégier le format PDF."
        )
    );
    assert!(session.solution().is_none());
    assert!(!session.chat_available());
}

#[tokio::test]
async fn test_generic_failure_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(500)
        .with_body("internal")
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);

    let err = session.solve().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Une erreur est survenue lors de la communication avec l'IA."
    );
    assert!(matches!(session.status(), SessionStatus::Error { .. }));
}

#[tokio::test]
async fn test_empty_answer_fallback() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);

    let solution = session.solve().await.unwrap();
    assert_eq!(solution.text, EMPTY_RESPONSE_FALLBACK);
}

#[tokio::test]
async fn test_chat_before_solve_is_unavailable() {
    let server = Server::new_async().await;
    let mut session = session_for(&server);
    let err = session.send_chat("bonjour").await.unwrap_err();
    assert!(matches!(err, RuntimeError::ChatUnavailable));
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn test_chat_turns_and_failure_fallback() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("CONTEXTE".to_string()))
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);
    session.solve().await.unwrap();

    let failing = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("CORRECTION :".to_string()))
        .with_status(503)
        .with_body("overloaded")
        .expect(1)
        .create_async()
        .await;

    let reply = session.send_chat("Pourquoi isoler x ?").await.unwrap();
    assert_eq!(reply.role, ChatRole::Model);
    assert_eq!(reply.text, CHAT_FALLBACK);
    failing.assert_async().await;
    failing.remove_async().await;

    let grounded = server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("CORRECTION :".to_string()),
            Matcher::Regex("On isole x".to_string()),
        ]))
        .with_status(200)
        .with_body(gemini_body("Parce que l'équation est linéaire."))
        .create_async()
        .await;

    let reply = session.send_chat("Et ensuite ?").await.unwrap();
    assert_eq!(reply.text, "Parce que l'équation est linéaire.");
    grounded.assert_async().await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[0].role, ChatRole::User);
    assert_eq!(transcript[0].text, "Pourquoi isoler x ?");
    assert_eq!(transcript[1].text, CHAT_FALLBACK);
    assert_eq!(session.status(), SessionStatus::Solved);
}

#[tokio::test]
async fn test_new_solve_clears_chat() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("CONTEXTE".to_string()))
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("CORRECTION :".to_string()))
        .with_status(200)
        .with_body(gemini_body("ok"))
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);
    session.solve().await.unwrap();
    session.toggle_explanation(1);
    session.send_chat("question").await.unwrap();
    assert_eq!(session.transcript().len(), 2);

    session.solve().await.unwrap();
    assert!(session.transcript().is_empty());
    assert!(!session.visibility().is_expanded(1));
}

#[tokio::test]
async fn test_copy_solution() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .create_async()
        .await;

    let mut session = session_for(&server);
    let clipboard = MemoryClipboard::default();
    assert!(matches!(
        session.copy_solution(&clipboard),
        Err(RuntimeError::NoSolution)
    ));

    with_inputs(&mut session);
    session.solve().await.unwrap();
    session.copy_solution(&clipboard).unwrap();
    assert_eq!(clipboard.text.lock().unwrap().as_deref(), Some(ANSWER));
}

#[tokio::test]
async fn test_reset_keeps_files() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);
    session.solve().await.unwrap();

    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.solution().is_none());
    assert!(session.document().is_empty());
    assert!(!session.chat_available());
    assert_eq!(session.courses().len(), 1);
    assert!(session.exercise().is_some());
}

#[tokio::test]
async fn test_remove_course_preserves_order() {
    let server = Server::new_async().await;
    let mut session = session_for(&server);
    session.add_course_files(vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")]);

    let middle = session.courses()[1].id.clone();
    assert!(session.remove_course(&middle));
    assert!(!session.remove_course(&middle));

    let names: Vec<&str> = session.courses().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "c.pdf"]);
}

#[tokio::test]
async fn test_clear_exercise_blocks_next_solve() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", GENERATE_PATH)
        .expect(0)
        .create_async()
        .await;

    let mut session = session_for(&server);
    with_inputs(&mut session);

    let removed = session.clear_exercise().unwrap();
    assert_eq!(removed.name, "td.pdf");
    assert!(session.exercise().is_none());
    assert!(session.clear_exercise().is_none());

    let err = session.solve().await.unwrap_err();
    assert!(matches!(err, RuntimeError::MissingInputs));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_ingest_after_solve_keeps_solved_status() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_body(ANSWER))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let course = dir.path().join("chapitre2.md");
    let exercise = dir.path().join("td2.txt");
    tokio::fs::write(&course, "# Chapitre 2").await.unwrap();
    tokio::fs::write(&exercise, "Exercice 2").await.unwrap();

    let mut session = session_for(&server);
    with_inputs(&mut session);
    session.solve().await.unwrap();

    let mut status = session.subscribe();
    session.add_courses(&mut vec![course]).await.unwrap();
    session.set_exercise(&exercise).await.unwrap();

    // no Uploading broadcast while a correction exists
    assert!(!status.has_changed().unwrap());
    assert_eq!(*status.borrow_and_update(), SessionStatus::Solved);
    assert!(session.solution().is_some());
    assert_eq!(session.courses().len(), 2);
    assert_eq!(session.exercise().unwrap().name, "td2.txt");
}

#[tokio::test]
async fn test_ingest_from_disk() {
    let dir = TempDir::new().unwrap();
    let course = dir.path().join("chapitre1.md");
    let exercise = dir.path().join("td1.txt");
    tokio::fs::write(&course, "# Chapitre 1").await.unwrap();
    tokio::fs::write(&exercise, "Exercice 1").await.unwrap();

    let server = Server::new_async().await;
    let mut session = session_for(&server);

    let mut selection = vec![course];
    assert_eq!(session.add_courses(&mut selection).await.unwrap(), 1);
    assert!(selection.is_empty());
    session.set_exercise(&exercise).await.unwrap();

    assert_eq!(session.courses()[0].media_type, "text/markdown");
    assert_eq!(session.exercise().unwrap().media_type, "text/plain");
    assert_eq!(session.status(), SessionStatus::Idle);

    let missing = dir.path().join("absent.pdf");
    let err = session.set_exercise(&missing).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Ingest(_)));
    assert_eq!(session.exercise().unwrap().name, "td1.txt");
}
