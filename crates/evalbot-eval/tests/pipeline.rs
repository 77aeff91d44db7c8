// End-to-end pipeline runs against in-memory execution and paste services.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use evalbot_eval::harness::Harness;
use evalbot_eval::patterns::{ESCAPE_WARNING, TOO_LONG};
use evalbot_eval::{
    compose_reply, CodeExecutor, EvalOutcome, Evaluator, OverflowStore, ServiceError,
    SkipReason,
};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Executor that records each script and answers with a canned output.
struct CannedExecutor {
    output: Result<String, u16>,
    seen: Recorder,
}

#[async_trait]
impl CodeExecutor for CannedExecutor {
    async fn execute(&self, code: &str) -> Result<String, ServiceError> {
        self.seen.0.lock().unwrap().push(code.to_string());
        match &self.output {
            Ok(out) => Ok(out.clone()),
            Err(status) => Err(ServiceError::Api {
                status: *status,
                message: "sandbox down".to_string(),
            }),
        }
    }
}

struct MemoryStore {
    fail: bool,
    seen: Recorder,
}

#[async_trait]
impl OverflowStore for MemoryStore {
    async fn upload(&self, text: &str) -> Result<String, ServiceError> {
        self.seen.0.lock().unwrap().push(text.to_string());
        if self.fail {
            Err(ServiceError::Unavailable("paste offline".to_string()))
        } else {
            Ok("abc123".to_string())
        }
    }

    fn link(&self, key: &str) -> String {
        format!("https://paste.test/{key}")
    }
}

struct Fixture {
    evaluator: Evaluator,
    scripts: Recorder,
    uploads: Recorder,
}

fn fixture(output: Result<&str, u16>, paste_fails: bool) -> Fixture {
    let scripts = Recorder::default();
    let uploads = Recorder::default();
    let evaluator = Evaluator::new(
        Box::new(CannedExecutor {
            output: output.map(str::to_string),
            seen: scripts.clone(),
        }),
        Box::new(MemoryStore {
            fail: paste_fails,
            seen: uploads.clone(),
        }),
        Harness::new(Some("try:\n{CODE}\nexcept:\n    pass"), "unused"),
        "#",
    );
    Fixture {
        evaluator,
        scripts,
        uploads,
    }
}

#[tokio::test]
async fn fenced_code_is_wrapped_and_output_rendered() {
    let f = fixture(Ok("3\n"), false);
    let outcome = f
        .evaluator
        .evaluate("```py\n  x = 1\n  print(x + 2)\n```")
        .await
        .unwrap();

    assert_eq!(
        f.scripts.calls(),
        vec!["try:\n    x = 1\n    print(x + 2)\nexcept:\n    pass".to_string()]
    );
    assert_eq!(
        compose_reply("<@42>", &outcome),
        "<@42> Your eval job has completed.\n\n```py\n3\n```"
    );
    assert!(f.uploads.calls().is_empty());
}

#[tokio::test]
async fn comment_only_code_never_reaches_the_sandbox() {
    let f = fixture(Ok("unreachable"), false);
    let outcome = f.evaluator.evaluate("`# just a note`").await.unwrap();
    assert_eq!(outcome, EvalOutcome::Skipped(SkipReason::CommentOnly));
    assert!(f.scripts.calls().is_empty());
}

#[tokio::test]
async fn blank_code_block_is_skipped() {
    let f = fixture(Ok("unreachable"), false);
    let outcome = f.evaluator.evaluate("```py\n\n```").await.unwrap();
    assert_eq!(outcome, EvalOutcome::Skipped(SkipReason::Empty));
    assert!(f.scripts.calls().is_empty());
}

#[tokio::test]
async fn long_output_links_to_paste() {
    let long = "a".repeat(1500);
    let f = fixture(Ok(&long), false);
    let outcome = f.evaluator.evaluate("print('a' * 1500)").await.unwrap();

    let reply = compose_reply("<@1>", &outcome);
    assert!(reply.contains(&format!("{}\n{}", "a".repeat(1000), TOO_LONG)));
    assert!(reply.ends_with("\nFull output: https://paste.test/abc123"));
    assert_eq!(f.uploads.calls(), vec![long]);
}

#[tokio::test]
async fn paste_failure_still_replies_with_truncated_output() {
    let many = (1..=20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let f = fixture(Ok(&many), true);
    let outcome = f.evaluator.evaluate("for i in range(1, 21): print(i)").await.unwrap();

    match &outcome {
        EvalOutcome::Completed {
            rendered,
            paste_link,
        } => {
            assert!(rendered.truncated);
            assert!(paste_link.is_none());
            assert!(rendered.display.starts_with("001 | 1\n002 | 2"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(!compose_reply("<@1>", &outcome).contains("Full output"));
}

#[tokio::test]
async fn escape_attempt_replaces_output() {
    let f = fixture(Ok("```\n@everyone"), false);
    let outcome = f.evaluator.evaluate("print('`' * 3)").await.unwrap();
    let reply = compose_reply("<@1>", &outcome);
    assert!(reply.contains(ESCAPE_WARNING));
    assert!(f.uploads.calls().is_empty());
}

#[tokio::test]
async fn empty_output_says_no_output() {
    let f = fixture(Ok("\n \n"), false);
    let outcome = f.evaluator.evaluate("x = 1").await.unwrap();
    assert!(compose_reply("<@1>", &outcome).ends_with("```[No output]```"));
}

#[tokio::test]
async fn sandbox_errors_propagate() {
    let f = fixture(Err(502), false);
    let err = f.evaluator.evaluate("print(1)").await.unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 502, .. }));
}
