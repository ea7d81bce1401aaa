//! End-to-end lifecycle scenarios against a mock execution service

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mockito::{Matcher, Server};
use runbox_client::{ExecutionApi, ExecutorClient};
use runbox_core::domain::request::SourceFile;
use runbox_lifecycle::{
    ControlSurface, JobOutcome, LifecycleController, LifecycleState, LineKind, OutputLine,
    OutputSink, RunError, StatusView,
};

const TEST_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Default)]
struct Panel {
    lines: Vec<OutputLine>,
    run_enabled: Vec<bool>,
    alerts: Vec<String>,
    statuses: Vec<String>,
}

impl Panel {
    fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

impl OutputSink for Panel {
    fn append(&mut self, line: OutputLine) {
        self.lines.push(line);
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}

impl ControlSurface for Panel {
    fn set_run_enabled(&mut self, enabled: bool) {
        self.run_enabled.push(enabled);
    }

    fn set_status_visible(&mut self, _visible: bool) {}

    fn show_status(&mut self, view: &StatusView) {
        self.statuses.push(view.status_text());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

fn controller(url: String, code: &str) -> LifecycleController<String, Panel> {
    let api: Arc<dyn ExecutionApi> = Arc::new(ExecutorClient::new(url));
    LifecycleController::new(api, code.to_string(), Panel::default())
        .with_poll_interval(TEST_INTERVAL)
}

#[tokio::test]
async fn scenario_a_inline_code_runs_to_completion() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", "/execute")
        .match_body(Matcher::PartialJson(serde_json::json!({ "code": "print(1)" })))
        .with_status(200)
        .with_body(r#"{"execution_id":"e1","message":"Code submitted for execution"}"#)
        .expect(1)
        .create_async()
        .await;

    let polls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&polls);
    let status = server
        .mock("GET", "/status/e1")
        .with_status(200)
        .with_body_from_request(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                br#"{"execution_id":"e1","status":"running","lines_of_code":1}"#.to_vec()
            } else {
                br#"{"execution_id":"e1","status":"completed","output":"1\n","error":"","execution_time":0.05,"lines_of_code":1}"#.to_vec()
            }
        })
        .expect(2)
        .create_async()
        .await;

    let mut ctl = controller(server.url(), "print(1)");
    ctl.run().await.unwrap();

    assert_eq!(ctl.wait_for_completion().await, Some(JobOutcome::Completed));
    assert_eq!(ctl.state(), LifecycleState::Idle);

    let panel = ctl.view();
    assert_eq!(panel.statuses, vec!["RUNNING", "COMPLETED"]);
    assert_eq!(panel.texts()[2..], ["--- Output ---", "1\n"]);
    assert_eq!(panel.lines[3].kind, LineKind::Success);
    assert_eq!(panel.run_enabled, vec![false, true]);

    tokio::time::sleep(TEST_INTERVAL * 5).await;
    submit.assert_async().await;
    status.assert_async().await;
    assert_eq!(polls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn scenario_b_empty_code_makes_no_request() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", "/execute")
        .expect(0)
        .create_async()
        .await;

    let mut ctl = controller(server.url(), "");
    let err = ctl.run().await.unwrap_err();

    assert!(matches!(err, RunError::Validation(_)));
    assert_eq!(ctl.view().alerts, vec!["Please write some code first!"]);
    submit.assert_async().await;
}

#[tokio::test]
async fn scenario_c_project_entry_file_is_main_py() {
    let mut server = Server::new_async().await;
    let submit = server
        .mock("POST", "/execute-with-files")
        .match_body(Matcher::Regex(
            "name=\"entry_file\"\r\n\r\nmain.py".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"execution_id":"p1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/status/p1")
        .with_status(200)
        .with_body(r#"{"status":"completed","output":"ok\n"}"#)
        .create_async()
        .await;

    let mut ctl = controller(server.url(), "");
    let entry = ctl
        .select_files(vec![
            SourceFile::new("util.py", "def f():\n    return 'ok'\n"),
            SourceFile::new("main.py", "import util\nprint(util.f())\n"),
        ])
        .map(str::to_string);
    assert_eq!(entry.as_deref(), Some("main.py"));

    let handle = ctl.run().await.unwrap();
    assert_eq!(handle.execution_id(), "p1");
    assert_eq!(ctl.wait_for_completion().await, Some(JobOutcome::Completed));
    submit.assert_async().await;
}

#[tokio::test]
async fn scenario_d_poll_failure_stops_polling() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/execute")
        .with_status(200)
        .with_body(r#"{"execution_id":"e1"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", "/status/e1")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let mut ctl = controller(server.url(), "print(1)");
    ctl.run().await.unwrap();

    assert_eq!(ctl.wait_for_completion().await, Some(JobOutcome::PollFailed));
    assert_eq!(ctl.view().run_enabled, vec![false, true]);
    assert!(ctl.view().texts().last().unwrap().contains("500"));

    tokio::time::sleep(TEST_INTERVAL * 5).await;
    status.assert_async().await;
}

#[tokio::test]
async fn scenario_e_timeout_renders_only_notice() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/execute")
        .with_status(200)
        .with_body(r#"{"execution_id":"e1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/status/e1")
        .with_status(200)
        .with_body(r#"{"status":"timeout","output":"","error":""}"#)
        .create_async()
        .await;

    let mut ctl = controller(server.url(), "while True: pass");
    ctl.run().await.unwrap();

    assert_eq!(ctl.wait_for_completion().await, Some(JobOutcome::TimedOut));
    assert_eq!(ctl.view().texts()[2..], ["Execution timed out!"]);
}

#[tokio::test]
async fn unreachable_service_reports_network_error() {
    // Nothing listens on the discard port.
    let mut ctl = controller("http://127.0.0.1:9".to_string(), "print(1)");

    let err = ctl.run().await.unwrap_err();
    assert!(matches!(err, RunError::Network(_)));
    assert_eq!(ctl.state(), LifecycleState::Idle);
    assert_eq!(
        ctl.view().texts().last().copied(),
        Some("Make sure the backend is running on http://127.0.0.1:9")
    );
}
