use exec_worker::config::{
    Config, Executor, Input, InputMode, Protocol, Report, Runtimes, Worker,
};
use exec_worker::{CodeFetcher, WorkerError};

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use ubyte::ToByteUnit;

/// Serves exactly one canned HTTP response on a loopback socket.
async fn serve_once(status_line: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).await;

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
    });

    addr
}

fn pipeline_config(addr: SocketAddr, workspace: &str) -> Config {
    let root = std::env::temp_dir().join(format!("exec-worker-e2e-{}", workspace));
    let _ = std::fs::remove_dir_all(&root);

    Config {
        worker: Worker {
            code_ref: format!("http://{}/code?id=1", addr),
            language: "python".to_owned(),
            timeout_ms: 5000,
            download_size_limit: 4.mebibytes(),
        },
        executor: Executor {
            workspace_root: root,
            // The tests drive the "python" entry with /bin/sh so they run
            // without a real interpreter installed.
            runtimes: Runtimes {
                python: PathBuf::from("/bin/sh"),
                node: PathBuf::from("node"),
            },
        },
        input: Input {
            mode: InputMode::Inline,
            fixture_dir: None,
            stdin: None,
            expected: None,
            blocking: false,
        },
        report: Report::default(),
    }
}

#[tokio::test]
async fn end_to_end_sum_with_validation() {
    let addr = serve_once("200 OK", "read a\nread b\necho $((a+b))").await;

    let mut config = pipeline_config(addr, "sum");
    config.input.stdin = Some("3|4".to_owned());
    config.input.expected = Some("7".to_owned());
    config.report.protocol = Protocol::Verbose;

    let rendered = exec_worker::run(config).await.unwrap();

    assert!(rendered.text.contains("OUTPUT_MATCH: true"), "{}", rendered.text);
    assert_eq!(rendered.exit_status, 0);
}

#[tokio::test]
async fn end_to_end_terse_clean_run() {
    let addr = serve_once("200 OK", "echo hello").await;

    let mut config = pipeline_config(addr, "terse");
    config.report.protocol = Protocol::Terse;

    let rendered = exec_worker::run(config).await.unwrap();

    assert_eq!(rendered.text, "hello");
    assert_eq!(rendered.exit_status, 0);
}

#[tokio::test]
async fn end_to_end_terse_runtime_failure() {
    let addr = serve_once("200 OK", "echo boom 1>&2\nexit 2").await;

    let mut config = pipeline_config(addr, "boom");
    config.report.protocol = Protocol::Terse;

    let rendered = exec_worker::run(config).await.unwrap();

    assert_eq!(rendered.text, "boom");
    assert_eq!(rendered.exit_status, 2);
}

#[tokio::test]
async fn oversized_code_body_is_fatal() {
    let addr = serve_once(
        "200 OK",
        "print('this body is far larger than the configured cap')",
    )
    .await;

    let fetcher = CodeFetcher::new(16);
    let err = fetcher
        .fetch(&format!("http://{}/code?id=1", addr))
        .await
        .unwrap_err();

    match err {
        WorkerError::BodyTooLarge { size, size_limit } => {
            assert!(size > size_limit);
            assert_eq!(size_limit, 16);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn missing_code_is_fatal() {
    let addr = serve_once("404 Not Found", "").await;

    let config = pipeline_config(addr, "missing");
    let err = exec_worker::run(config).await.unwrap_err();

    match err.downcast_ref::<WorkerError>() {
        Some(WorkerError::FetchStatus(status)) => assert_eq!(status.as_u16(), 404),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn unsupported_language_is_fatal() {
    let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();

    let mut config = pipeline_config(addr, "lang");
    config.worker.language = "cobol".to_owned();

    let err = exec_worker::run(config).await.unwrap_err();
    match err.downcast_ref::<WorkerError>() {
        Some(WorkerError::UnsupportedLanguage(name)) => assert_eq!(name, "cobol"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn fixture_mode_requires_directory() {
    let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();

    let mut config = pipeline_config(addr, "fixture");
    config.input.mode = InputMode::Fixture;

    let err = exec_worker::run(config).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<WorkerError>(),
        Some(WorkerError::MissingConfig("input.fixture_dir"))
    ));
}
