//! Stand-in filing gateway for trying the CLI without live credentials.
//!
//! Answers company data, accounts, status and image requests from an
//! in-memory fixture set. Filings are remembered as `PENDING` so a later
//! status query sees them.
//!
//! Run with:
//!   cargo run -p chfiling --example fake-gateway --features cli -- --port 8080
//!
//! In another terminal, with `"url": "http://127.0.0.1:8080/v1-0/xmlgw/Gateway"`,
//! `"presenter-id": "TEST_PRESENTER"`, `"authentication": "TEST_AUTH"`,
//! `"company-number": "01234567"` and `"company-authentication-code": "TEST1234"`
//! in config.json:
//!   cargo run --features cli -- --config config.json company-data

use std::collections::BTreeMap;
use std::error::Error;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use chfiling::envelope::{
    codec, one_way_hash, AccountsImageResult, Address, Body, CompanyData, Envelope, EnvelopeError,
    GovTalkDetails, GovTalkError, Header, MessageClass, MessageDetails, Qualifier,
    SubmissionAcknowledgement, SubmissionStatusEntry,
};
use clap::Parser;
use tracing::{debug, info, warn};

const GATEWAY_PATH: &str = "/v1-0/xmlgw/Gateway";
const RESPONSE_VERSION: &str = "1.0";
const MAX_REQUEST_SIZE: usize = 16 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "fake-gateway", about = "Serve fixture GovTalk responses on loopback")]
struct Args {
    /// Port to listen on.
    #[arg(long, short, default_value_t = 8080)]
    port: u16,

    /// Presenter id the sender digest must match.
    #[arg(long, default_value = "TEST_PRESENTER")]
    presenter_id: String,

    /// Presenter authentication value the credential digest must match.
    #[arg(long, default_value = "TEST_AUTH")]
    authentication: String,

    /// Company authentication code expected on company data requests.
    #[arg(long, default_value = "TEST1234")]
    company_auth_code: String,

    /// Reject every request with an authentication failure.
    #[arg(long)]
    fail_auth: bool,

    /// Answer filings with an empty body instead of an acknowledgement.
    #[arg(long)]
    empty_acceptance: bool,

    /// Delay before each response, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

/// Gateway behaviour, separate from the socket loop.
struct Gateway {
    presenter_digest: String,
    authentication_digest: String,
    company_auth_code: String,
    fail_auth: bool,
    empty_acceptance: bool,
    companies: BTreeMap<String, CompanyData>,
    submissions: BTreeMap<String, String>,
}

impl Gateway {
    fn new(args: &Args) -> Self {
        Self {
            presenter_digest: one_way_hash(&args.presenter_id),
            authentication_digest: one_way_hash(&args.authentication),
            company_auth_code: args.company_auth_code.clone(),
            fail_auth: args.fail_auth,
            empty_acceptance: args.empty_acceptance,
            companies: ["1234567", "01234567", "12345678"]
                .into_iter()
                .map(|number| (number.to_string(), fixture_company(number)))
                .collect(),
            submissions: BTreeMap::new(),
        }
    }

    /// Answer one request document. `Err` means the request could not be parsed.
    fn respond(&mut self, request: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let request = codec::parse(request)?;
        let class = request.class().clone();
        let transaction_id = request.header.message.transaction_id;
        debug!(%class, ?transaction_id, "request");

        let reply = if self.fail_auth || !self.authenticated(&request) {
            failure(class, transaction_id, 502, "Authentication failure")
        } else {
            match request.body {
                Body::CompanyDataRequest(query) => {
                    if query.company_authentication_code.as_deref()
                        != Some(self.company_auth_code.as_str())
                    {
                        let text = "Invalid company authentication code";
                        failure(class, transaction_id, 502, text)
                    } else {
                        match self.companies.get(&query.company_number) {
                            Some(company) => {
                                success(class, transaction_id, Body::CompanyData(company.clone()))
                            }
                            None => failure(
                                class,
                                transaction_id,
                                100,
                                &format!("Company not found: {}", query.company_number),
                            ),
                        }
                    }
                }
                Body::FormSubmission(form) if class == MessageClass::Accounts => {
                    let number = form.header.submission_number;
                    info!(
                        submission = %number,
                        company = %form.header.company_number,
                        "filing recorded"
                    );
                    self.submissions.insert(number.clone(), "PENDING".to_string());
                    let body = if self.empty_acceptance {
                        Body::Empty
                    } else {
                        Body::SubmissionAcknowledgement(SubmissionAcknowledgement {
                            submission_number: number,
                            status: Some("accepted".to_string()),
                            accepted_date: None,
                        })
                    };
                    success(class, transaction_id, body)
                }
                Body::FormSubmission(_) if class == MessageClass::AccountsImage => success(
                    class,
                    transaction_id,
                    Body::AccountsImage(AccountsImageResult {
                        status: Some("generated".to_string()),
                        message: Some("Accounts image generated successfully".to_string()),
                    }),
                ),
                Body::SubmissionStatusRequest(query) => {
                    let entries = self
                        .submissions
                        .iter()
                        .filter(|(number, _)| {
                            query
                                .submission_number
                                .as_deref()
                                .is_none_or(|wanted| wanted == number.as_str())
                        })
                        .map(|(number, status)| SubmissionStatusEntry {
                            submission_number: number.clone(),
                            status_code: status.clone(),
                        })
                        .collect();
                    success(class, transaction_id, Body::SubmissionStatus(entries))
                }
                _ => failure(
                    class.clone(),
                    transaction_id,
                    100,
                    &format!("Unknown message class: {class}"),
                ),
            }
        };

        Ok(codec::serialize(&reply)?.to_vec())
    }

    fn authenticated(&self, request: &Envelope) -> bool {
        request
            .header
            .sender
            .as_ref()
            .and_then(|sender| sender.authentication.as_ref())
            .is_some_and(|auth| {
                auth.sender_id == self.presenter_digest && auth.value == self.authentication_digest
            })
    }
}

fn reply(class: MessageClass, qualifier: Qualifier, transaction_id: Option<u64>) -> Envelope {
    Envelope {
        version: RESPONSE_VERSION.to_string(),
        header: Header {
            message: MessageDetails {
                class,
                qualifier,
                transaction_id,
                gateway_test: None,
            },
            sender: None,
        },
        details: GovTalkDetails::default(),
        body: Body::Empty,
    }
}

fn success(class: MessageClass, transaction_id: Option<u64>, body: Body) -> Envelope {
    Envelope {
        body,
        ..reply(class, Qualifier::Response, transaction_id)
    }
}

fn failure(class: MessageClass, transaction_id: Option<u64>, number: u32, text: &str) -> Envelope {
    let mut envelope = reply(class, Qualifier::Error, transaction_id);
    envelope.details.errors.push(GovTalkError {
        raised_by: Some("Gateway".to_string()),
        number,
        error_type: Some("fatal".to_string()),
        text: text.to_string(),
        location: None,
    });
    envelope
}

fn fixture_company(number: &str) -> CompanyData {
    CompanyData {
        company_name: "TEST COMPANY LIMITED".to_string(),
        company_number: number.to_string(),
        company_category: Some("Private Limited Company".to_string()),
        jurisdiction: Some("England/Wales".to_string()),
        trading_on_market: Some(false),
        made_up_date: Some("2023-12-31".to_string()),
        next_due_date: Some("2024-09-30".to_string()),
        registered_office: Some(Address {
            premise: Some("123".to_string()),
            street: Some("Test Street".to_string()),
            thoroughfare: Some("Test Area".to_string()),
            post_town: Some("Test Town".to_string()),
            postcode: Some("TE5 7ST".to_string()),
            country: Some("United Kingdom".to_string()),
        }),
        sic_codes: vec!["62012".to_string(), "62020".to_string()],
    }
}

/// Read one HTTP/1.1 request; returns the request line and the body.
fn read_request(stream: &TcpStream) -> std::io::Result<(String, Vec<u8>)> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "bad content-length")
                })?;
            }
        }
    }
    if content_length > MAX_REQUEST_SIZE {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "request body too large",
        ));
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body)?;
    Ok((request_line.trim_end().to_string(), body))
}

fn write_response(mut stream: &TcpStream, status: &str, body: &[u8]) -> std::io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}

fn serve(gateway: &mut Gateway, stream: &TcpStream, delay: Duration) -> std::io::Result<()> {
    let (request_line, body) = read_request(stream)?;
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }

    let mut parts = request_line.split_whitespace();
    let (method, path) = (parts.next(), parts.next());
    if method != Some("POST") || path != Some(GATEWAY_PATH) {
        warn!(request = %request_line, "no such endpoint");
        return write_response(stream, "404 Not Found", b"");
    }

    match gateway.respond(&body) {
        Ok(reply) => write_response(stream, "200 OK", &reply),
        Err(err) => {
            warn!(error = %err, "unreadable request");
            write_response(stream, "500 Internal Server Error", err.to_string().as_bytes())
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let listener = TcpListener::bind(("127.0.0.1", args.port))?;
    let delay = Duration::from_millis(args.delay_ms);
    let mut gateway = Gateway::new(&args);

    eprintln!("Listening on http://{}{GATEWAY_PATH}", listener.local_addr()?);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = serve(&mut gateway, &stream, delay) {
                    warn!(error = %err, "exchange failed");
                }
            }
            Err(err) => warn!(error = %err, "accept failed"),
        }
    }
    Ok(())
}
