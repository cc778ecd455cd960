//! Response classification.
//!
//! Turns a parsed response envelope into either a typed [`Response`] or a
//! [`ClientError`]. Gateway error numbers are mapped through
//! [`CLASSIFICATION`], an ordered table where the first matching rule wins.

use std::fmt;
use std::ops::RangeInclusive;

use chfiling_envelope::{
    AccountsImageResult, Body, CompanyData, Envelope, GovTalkError, MessageClass, Qualifier,
    SubmissionStatusEntry,
};
use serde::Serialize;

use crate::error::{ClientError, Result};

/// Category of a gateway error, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Unclassified,
    Business,
    Validation,
    Authentication,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unclassified => "unclassified",
            Self::Business => "business",
            Self::Validation => "validation",
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the classification table.
#[derive(Debug, Clone)]
pub struct Rule {
    pub codes: RangeInclusive<u32>,
    pub category: ErrorCategory,
    /// Operator hint attached to matching entries.
    pub hint: Option<&'static str>,
}

/// Error number classification, first match wins.
pub const CLASSIFICATION: &[Rule] = &[
    Rule {
        codes: 9999..=9999,
        category: ErrorCategory::Business,
        hint: Some("suspected accounts corruption"),
    },
    Rule {
        codes: 100..=199,
        category: ErrorCategory::Validation,
        hint: Some("suspected error in submitted message, failed validation check"),
    },
    Rule {
        codes: 500..=599,
        category: ErrorCategory::Authentication,
        hint: Some("check the presenter id, authentication code and company number"),
    },
    Rule {
        codes: 1000..=9999,
        category: ErrorCategory::Business,
        hint: None,
    },
];

/// Category and hint for a gateway error number.
pub fn classify_code(code: u32) -> (ErrorCategory, Option<&'static str>) {
    CLASSIFICATION
        .iter()
        .find(|rule| rule.codes.contains(&code))
        .map_or((ErrorCategory::Unclassified, None), |rule| {
            (rule.category, rule.hint)
        })
}

/// A gateway error with its category. `code` is `None` for errors raised locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    pub category: ErrorCategory,
    pub code: Option<u32>,
    pub text: String,
    pub location: Option<String>,
    pub hint: Option<&'static str>,
}

impl From<&GovTalkError> for ErrorEntry {
    fn from(error: &GovTalkError) -> Self {
        let (category, hint) = classify_code(error.number);
        Self {
            category,
            code: Some(error.number),
            text: error.text.clone(),
            location: error.location.clone(),
            hint,
        }
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "{code} ")?;
        }
        f.write_str(&self.text)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        if let Some(hint) = self.hint {
            write!(f, " [{hint}]")?;
        }
        Ok(())
    }
}

/// Every error of one response, labelled with the most severe category present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub entries: Vec<ErrorEntry>,
}

impl ClassifiedError {
    /// Classify gateway errors. Returns `None` for an empty list.
    pub fn from_errors<'a>(errors: impl IntoIterator<Item = &'a GovTalkError>) -> Option<Self> {
        let entries: Vec<ErrorEntry> = errors.into_iter().map(ErrorEntry::from).collect();
        let category = entries.iter().map(|entry| entry.category).max()?;
        Some(Self { category, entries })
    }

    pub(crate) fn local(category: ErrorCategory, text: impl Into<String>) -> Self {
        Self {
            category,
            entries: vec![ErrorEntry {
                category,
                code: None,
                text: text.into(),
                location: None,
                hint: None,
            }],
        }
    }

    /// Gateway error numbers, in response order.
    pub fn codes(&self) -> Vec<u32> {
        self.entries.iter().filter_map(|entry| entry.code).collect()
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
    Unknown,
}

impl Status {
    /// Parse a gateway status code; anything unrecognised is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Self::Pending,
            "ACCEPT" | "ACCEPTED" => Self::Accepted,
            "REJECT" | "REJECTED" => Self::Rejected,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one submission, displayed as `S00027: PENDING`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub submission_number: String,
    pub status: Status,
    /// Status code exactly as the gateway sent it.
    pub code: String,
}

impl From<SubmissionStatusEntry> for StatusEntry {
    fn from(entry: SubmissionStatusEntry) -> Self {
        Self {
            status: Status::from_code(&entry.status_code),
            submission_number: entry.submission_number,
            code: entry.status_code,
        }
    }
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.submission_number, self.status)
    }
}

/// Gateway acceptance of an accounts filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acceptance {
    pub submission_number: String,
    pub accepted_date: Option<String>,
}

/// A successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    CompanyData(CompanyData),
    Acceptance(Acceptance),
    Status(Vec<StatusEntry>),
    AccountsImage(AccountsImageResult),
    /// Acknowledgement qualifier; the envelope is passed through unchanged.
    Acknowledgement(Box<Envelope>),
    /// Request-result with an empty body.
    Received { class: MessageClass },
    /// Filing taken by the gateway with an empty body: it was delivered, but
    /// nothing says it has been accepted. Poll its status to find out.
    Submitted { submission_number: String },
}

/// Classify a parsed response envelope. Pure: no retries, no state changes.
pub fn classify(envelope: Envelope) -> Result<Response> {
    let qualifier = envelope.qualifier();
    if let Some(classified) = ClassifiedError::from_errors(envelope.errors()) {
        return Err(classified.into());
    }

    match qualifier {
        Qualifier::Error => Err(ClientError::MalformedResponse(
            "error response without error details".to_string(),
        )),
        Qualifier::Acknowledgement => Ok(Response::Acknowledgement(Box::new(envelope))),
        Qualifier::Response => dispatch(envelope),
        Qualifier::Request | Qualifier::Poll => Err(ClientError::MalformedResponse(format!(
            "unexpected qualifier {qualifier} in a response"
        ))),
    }
}

fn dispatch(envelope: Envelope) -> Result<Response> {
    use MessageClass as C;

    let class = envelope.header.message.class;
    let response = match (&class, envelope.body) {
        (_, Body::Empty) => Response::Received {
            class: class.clone(),
        },
        (C::CompanyData | C::Other(_), Body::CompanyData(data)) => Response::CompanyData(data),
        (C::Accounts | C::AccountsImage | C::Other(_), Body::SubmissionAcknowledgement(ack)) => {
            Response::Acceptance(Acceptance {
                submission_number: ack.submission_number,
                accepted_date: ack.accepted_date,
            })
        }
        (C::SubmissionStatus | C::Other(_), Body::SubmissionStatus(entries)) => {
            Response::Status(entries.into_iter().map(StatusEntry::from).collect())
        }
        (C::AccountsImage | C::Other(_), Body::AccountsImage(image)) => {
            Response::AccountsImage(image)
        }
        (class, body) => {
            return Err(ClientError::MalformedResponse(format!(
                "{class} response cannot carry {}",
                body.element_name().unwrap_or("an empty body")
            )))
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use chfiling_envelope::parse;

    use super::*;

    fn response(class: &str, qualifier: &str, details: &str, body: &str) -> Envelope {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<GovTalkMessage xmlns="http://www.govtalk.gov.uk/CM/envelope">
  <EnvelopeVersion>1.0</EnvelopeVersion>
  <Header>
    <MessageDetails>
      <Class>{class}</Class>
      <Qualifier>{qualifier}</Qualifier>
      <TransactionID>7</TransactionID>
    </MessageDetails>
  </Header>
  <GovTalkDetails><Keys/>{details}</GovTalkDetails>
  <Body>{body}</Body>
</GovTalkMessage>"#
        );
        parse(xml.as_bytes()).unwrap()
    }

    fn gateway_error(number: u32, text: &str) -> String {
        format!(
            "<GovTalkErrors><Error><RaisedBy>Gateway</RaisedBy><Number>{number}</Number>\
             <Type>fatal</Type><Text>{text}</Text></Error></GovTalkErrors>"
        )
    }

    #[test]
    fn table_is_ordered_first_match_wins() {
        assert_eq!(classify_code(9999).0, ErrorCategory::Business);
        assert_eq!(classify_code(9999).1, Some("suspected accounts corruption"));
        assert_eq!(classify_code(9998), (ErrorCategory::Business, None));
        assert_eq!(classify_code(100).0, ErrorCategory::Validation);
        assert_eq!(classify_code(199).1, classify_code(100).1);
        assert_eq!(classify_code(199).0, ErrorCategory::Validation);
        assert_eq!(classify_code(500).0, ErrorCategory::Authentication);
        assert_eq!(classify_code(599).0, ErrorCategory::Authentication);
        assert_eq!(classify_code(1000).0, ErrorCategory::Business);
        for code in [0, 99, 200, 499, 600, 999, 10_000] {
            assert_eq!(classify_code(code), (ErrorCategory::Unclassified, None));
        }
    }

    #[test]
    fn code_502_is_authentication() {
        let env = response(
            "CompanyDataRequest",
            "error",
            &gateway_error(502, "Authentication failure"),
            "",
        );
        let err = classify(env).unwrap_err();
        let ClientError::Authentication(classified) = err else {
            panic!("expected authentication, got {err:?}");
        };
        assert_eq!(classified.codes(), vec![502]);
        assert_eq!(classified.entries[0].text, "Authentication failure");
    }

    #[test]
    fn code_100_is_validation() {
        let env = response(
            "Accounts",
            "error",
            &gateway_error(100, "Invalid request"),
            "",
        );
        let err = classify(env).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(
            err.classified().unwrap().entries[0].hint,
            Some("suspected error in submitted message, failed validation check")
        );
        assert!(err.to_string().contains("failed validation check"));
    }

    #[test]
    fn code_9999_is_business_with_corruption_hint() {
        let env = response("Accounts", "error", &gateway_error(9999, "System failure"), "");
        let err = classify(env).unwrap_err();
        assert!(matches!(err, ClientError::Business(_)));
        assert!(err.to_string().contains("corruption"));
    }

    #[test]
    fn unknown_code_keeps_raw_code_and_text() {
        let env = response("Accounts", "error", &gateway_error(42, "Odd"), "");
        let err = classify(env).unwrap_err();
        let classified = err.classified().unwrap();
        assert_eq!(classified.category, ErrorCategory::Unclassified);
        assert_eq!(classified.entries[0].code, Some(42));
        assert_eq!(classified.entries[0].text, "Odd");
    }

    #[test]
    fn most_severe_category_wins_and_all_entries_kept() {
        let details = "<GovTalkErrors>\
             <Error><Number>1001</Number><Text>late</Text></Error>\
             <Error><Number>150</Number><Text>bad field</Text></Error>\
             <Error><Number>7</Number><Text>odd</Text></Error>\
             </GovTalkErrors>";
        let env = response("Accounts", "error", details, "");
        let err = classify(env).unwrap_err();
        let ClientError::Validation(classified) = err else {
            panic!("expected validation, got {err:?}");
        };
        assert_eq!(classified.codes(), vec![1001, 150, 7]);
    }

    #[test]
    fn body_level_errors_take_error_path_even_with_response_qualifier() {
        let body =
            "<ErrorResponse><Error><Number>502</Number><Text>denied</Text></Error></ErrorResponse>";
        let env = response("CompanyDataRequest", "response", "", body);
        assert!(matches!(classify(env), Err(ClientError::Authentication(_))));
    }

    #[test]
    fn error_qualifier_without_errors_is_malformed() {
        let env = response("Accounts", "error", "", "");
        assert!(matches!(
            classify(env),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn acceptance_fixture() {
        let body = "<SubmissionAcknowledgment><SubmissionNumber>S00027</SubmissionNumber>\
                    <Status>ACCEPT</Status></SubmissionAcknowledgment>";
        let env = response("Accounts", "response", "", body);
        assert_eq!(
            classify(env).unwrap(),
            Response::Acceptance(Acceptance {
                submission_number: "S00027".to_string(),
                accepted_date: None,
            })
        );
    }

    #[test]
    fn status_fixture_formats_pending() {
        let body = "<SubmissionStatus><Status><SubmissionNumber>S00027</SubmissionNumber>\
                    <StatusCode>PENDING</StatusCode></Status></SubmissionStatus>";
        let env = response("GetSubmissionStatus", "response", "", body);
        let Response::Status(entries) = classify(env).unwrap() else {
            panic!("expected status");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].submission_number, "S00027");
        assert_eq!(entries[0].status, Status::Pending);
        assert_eq!(entries[0].to_string(), "S00027: PENDING");
    }

    #[test]
    fn unknown_status_code_is_preserved() {
        let entry = StatusEntry::from(SubmissionStatusEntry {
            submission_number: "S00003".to_string(),
            status_code: "PARKED".to_string(),
        });
        assert_eq!(entry.status, Status::Unknown);
        assert_eq!(entry.code, "PARKED");
        assert_eq!(entry.to_string(), "S00003: UNKNOWN");
    }

    #[test]
    fn acknowledgement_passes_envelope_through() {
        let env = response("Accounts", "acknowledgement", "", "");
        let expected = env.clone();
        assert_eq!(
            classify(env).unwrap(),
            Response::Acknowledgement(Box::new(expected))
        );
    }

    #[test]
    fn generic_response_class_dispatches_on_body() {
        let body = "<CompanyData><CompanyName>Acme</CompanyName>\
                    <CompanyNumber>01234567</CompanyNumber></CompanyData>";
        let env = response("response", "response", "", body);
        let Response::CompanyData(data) = classify(env).unwrap() else {
            panic!("expected company data");
        };
        assert_eq!(data.company_name, "Acme");
    }

    #[test]
    fn body_not_matching_class_is_malformed() {
        let body = "<CompanyData><CompanyName>Acme</CompanyName>\
                    <CompanyNumber>01234567</CompanyNumber></CompanyData>";
        let env = response("GetSubmissionStatus", "response", "", body);
        assert!(matches!(
            classify(env),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn request_qualifier_in_response_is_malformed() {
        let env = response("Accounts", "request", "", "");
        assert!(matches!(
            classify(env),
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[test]
    fn empty_body_is_received() {
        let env = response("Accounts", "response", "", "");
        assert_eq!(
            classify(env).unwrap(),
            Response::Received {
                class: MessageClass::Accounts
            }
        );
    }
}
