use chrono::NaiveDate;
use daybook::analysis::{AnalysisClient, AnalysisDisplay};
use daybook::error::AnalysisError;
use daybook::journal::config::AnalysisConfig;
use daybook::journal::paths::JournalPaths;
use daybook::{App, EntryStore};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::tempdir;

// Canned single-shot analysis backend: accepts one request, drains it, and
// replies with a fixed JSON payload.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind responder");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut buf = vec![0u8; 64 * 1024];
        let mut total = 0usize;
        // Read until the header/body split is visible; the request is tiny
        // so one or two reads cover it.
        while total < buf.len() {
            match stream.read(&mut buf[total..]) {
                Ok(0) => break,
                Ok(n) => {
                    total += n;
                    if buf[..total].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
    });

    format!("http://{addr}/analyze")
}

fn client_for(endpoint: String) -> AnalysisClient {
    AnalysisClient::new(&AnalysisConfig {
        endpoint,
        request_timeout_secs: 5,
    })
}

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid date")
}

#[test]
fn successful_analysis_returns_the_narrative() {
    let endpoint = serve_once("200 OK", r###"{"result":"## Trends\n\nSteady."}"###);

    let narrative = client_for(endpoint)
        .analyze("[Date: 2024-01-05] Content: A\n")
        .expect("narrative");

    assert_eq!(narrative, "## Trends\n\nSteady.");
}

#[test]
fn backend_error_message_surfaces_verbatim() {
    let endpoint = serve_once("500 Internal Server Error", r#"{"error":"rate limited"}"#);

    let err = client_for(endpoint)
        .analyze("[Date: 2024-01-05] Content: A\n")
        .err()
        .expect("failure");

    assert!(matches!(err, AnalysisError::Backend(_)));
    assert_eq!(err.to_string(), "rate limited");
}

#[test]
fn non_success_without_error_field_reports_the_status() {
    let endpoint = serve_once("503 Service Unavailable", "backend down");

    let err = client_for(endpoint)
        .analyze("[Date: 2024-01-05] Content: A\n")
        .err()
        .expect("failure");

    assert!(err.to_string().contains("503"));
}

#[test]
fn success_without_result_field_is_a_failure() {
    let endpoint = serve_once("200 OK", r#"{"ok":true}"#);

    let err = client_for(endpoint)
        .analyze("[Date: 2024-01-05] Content: A\n")
        .err()
        .expect("failure");

    assert!(matches!(err, AnalysisError::MissingResult));
}

#[test]
fn unreachable_backend_is_a_transport_failure() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };

    let err = client_for(format!("http://127.0.0.1:{port}/analyze"))
        .analyze("[Date: 2024-01-05] Content: A\n")
        .err()
        .expect("failure");

    assert!(matches!(err, AnalysisError::Transport(_)));
}

#[test]
fn full_flow_renders_the_backend_failure_on_the_surface() {
    let tmp = tempdir().expect("tempdir");
    let mut store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
    store.upsert(date("2024-01-05"), "A").expect("insert");
    let mut app = App::new(store);

    let endpoint = serve_once("500 Internal Server Error", r#"{"error":"rate limited"}"#);
    let (ticket, prompt) = app.begin_analysis().expect("ticket");
    assert!(prompt.contains("[Date: 2024-01-05] Content: A"));

    let outcome = client_for(endpoint).analyze(&prompt);
    app.finish_analysis(ticket, outcome);

    assert_eq!(
        app.analysis().display(),
        &AnalysisDisplay::Failed("rate limited".to_string())
    );
}

#[test]
fn analysis_of_an_empty_journal_sends_nothing() {
    let tmp = tempdir().expect("tempdir");
    let store = EntryStore::open(JournalPaths::rooted(tmp.path())).expect("open store");
    let mut app = App::new(store);

    // No responder exists; if a request were issued there would be nothing
    // to answer it. begin_analysis must not hand out a ticket at all.
    assert!(app.begin_analysis().is_none());
    assert_eq!(app.analysis().display(), &AnalysisDisplay::NothingToAnalyze);
}
