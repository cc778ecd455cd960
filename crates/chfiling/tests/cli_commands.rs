#![cfg(all(unix, feature = "cli"))]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

const COMPANY_DATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GovTalkMessage xmlns="http://www.govtalk.gov.uk/CM/envelope">
  <EnvelopeVersion>1.0</EnvelopeVersion>
  <Header>
    <MessageDetails>
      <Class>CompanyDataRequest</Class>
      <Qualifier>response</Qualifier>
    </MessageDetails>
  </Header>
  <GovTalkDetails><Keys/></GovTalkDetails>
  <Body>
    <CompanyData>
      <CompanyName>Acme Widgets Ltd</CompanyName>
      <CompanyNumber>01234567</CompanyNumber>
    </CompanyData>
  </Body>
</GovTalkMessage>"#;

const AUTH_FAILURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GovTalkMessage xmlns="http://www.govtalk.gov.uk/CM/envelope">
  <EnvelopeVersion>1.0</EnvelopeVersion>
  <Header>
    <MessageDetails>
      <Class>CompanyDataRequest</Class>
      <Qualifier>error</Qualifier>
    </MessageDetails>
  </Header>
  <GovTalkDetails>
    <Keys/>
    <GovTalkErrors>
      <Error>
        <RaisedBy>Gateway</RaisedBy>
        <Number>502</Number>
        <Type>fatal</Type>
        <Text>Authentication failure</Text>
      </Error>
    </GovTalkErrors>
  </GovTalkDetails>
  <Body/>
</GovTalkMessage>"#;

const FILING_RECEIVED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GovTalkMessage xmlns="http://www.govtalk.gov.uk/CM/envelope">
  <EnvelopeVersion>1.0</EnvelopeVersion>
  <Header>
    <MessageDetails>
      <Class>Accounts</Class>
      <Qualifier>response</Qualifier>
    </MessageDetails>
  </Header>
  <GovTalkDetails><Keys/></GovTalkDetails>
  <Body/>
</GovTalkMessage>"#;

/// Serve one HTTP exchange on loopback and hand back the request body.
fn fake_gateway(response: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("loopback should bind");
    let url = format!(
        "http://{}/v1-0/xmlgw/Gateway",
        listener.local_addr().expect("bound address")
    );

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("client should connect");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("numeric length");
                }
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).expect("read body");

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.len(),
            response
        )
        .expect("write response");
        String::from_utf8(body).expect("utf-8 request")
    });
    (url, handle)
}

fn workspace(url: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        format!(
            r#"{{
  "presenter-id": "66666959263",
  "authentication": "s3cret",
  "company-number": "01234567",
  "made-up-date": "2024-03-31",
  "url": "{url}",
  "gateway-test": 1
}}"#
        ),
    )
    .expect("write config");
    (dir, config)
}

fn chfiling(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chfiling"))
        .current_dir(dir)
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("chfiling should run")
}

fn transaction_id(dir: &Path) -> Option<u64> {
    let content = std::fs::read(dir.join("state.json")).ok()?;
    let state: serde_json::Value = serde_json::from_slice(&content).expect("state is json");
    state["transaction-id"].as_u64()
}

#[test]
fn version_prints_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = chfiling(dir.path(), &["version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("chfiling "));
}

#[test]
fn missing_config_exits_78() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = chfiling(dir.path(), &["company-data"]);
    assert_eq!(output.status.code(), Some(78));
    assert!(String::from_utf8_lossy(&output.stderr).contains("config.json"));
}

#[test]
fn invalid_submission_id_exits_60_without_touching_state() {
    let (dir, _config) = workspace("http://127.0.0.1:9/unused");
    let output = chfiling(
        dir.path(),
        &["submission-status", "--submission-id", "bogus"],
    );
    assert_eq!(output.status.code(), Some(60));
    assert_eq!(transaction_id(dir.path()), None);
}

#[test]
fn company_data_prints_json_and_commits() {
    let (url, gateway) = fake_gateway(COMPANY_DATA);
    let (dir, _config) = workspace(&url);

    let output = chfiling(dir.path(), &["company-data"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("company-data.schema.json"));
    assert!(stdout.contains("\"company_name\":\"Acme Widgets Ltd\""));

    let request = gateway.join().expect("gateway thread");
    assert!(request.contains("<Class>CompanyDataRequest</Class>"));
    assert!(request.contains("<TransactionID>1</TransactionID>"));
    assert!(request.contains("<GatewayTest>1</GatewayTest>"));
    assert!(!request.contains("s3cret"));
    assert_eq!(transaction_id(dir.path()), Some(2));
}

#[test]
fn authentication_failure_exits_50_with_hint() {
    let (url, gateway) = fake_gateway(AUTH_FAILURE);
    let (dir, _config) = workspace(&url);

    let output = chfiling(dir.path(), &["company-data"]);
    assert_eq!(output.status.code(), Some(50));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("502"));
    assert_eq!(stderr.matches("presenter id").count(), 1);

    gateway.join().expect("gateway thread");
}

#[test]
fn empty_filing_reply_is_reported_as_submitted() {
    let (url, gateway) = fake_gateway(FILING_RECEIVED);
    let (dir, _config) = workspace(&url);
    std::fs::write(dir.path().join("accounts.html"), "<html>accounts</html>")
        .expect("write accounts");

    let output = chfiling(dir.path(), &["submit-accounts", "--accounts", "accounts.html"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("submission-completed.schema.json"));
    assert!(stdout.contains("\"submission_number\":\"S00001\""));
    assert!(!stdout.contains("accepted"));

    let request = gateway.join().expect("gateway thread");
    assert!(request.contains("<SubmissionNumber>S00001</SubmissionNumber>"));
}

#[test]
fn unreachable_gateway_after_delivery_keeps_counter() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("loopback should bind");
        listener.local_addr().expect("bound address").port()
    };
    let (dir, _config) = workspace(&format!("http://127.0.0.1:{port}/gateway"));

    let output = chfiling(
        dir.path(),
        &["--commit-policy", "after-delivery", "company-data"],
    );
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("try again later"));
    assert_eq!(transaction_id(dir.path()), None);
}

#[test]
fn missing_accounts_document_is_usage_error() {
    let (dir, _config) = workspace("http://127.0.0.1:9/unused");
    let output = chfiling(dir.path(), &["submit-accounts", "--accounts", "missing.html"]);
    assert_eq!(output.status.code(), Some(64));
    assert_eq!(transaction_id(dir.path()), None);
}
