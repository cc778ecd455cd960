//! Request body builders, one per supported operation.
//!
//! Builders validate their inputs before touching [`State`], so a rejected
//! request never consumes a submission number.

use base64::Engine as _;
use chfiling_config::Config;
use chfiling_envelope::{
    Body, CompanyDataRequest, Document, FormHeader, FormSubmission, MessageClass,
    SubmissionStatusRequest,
};
use chfiling_state::{is_submission_number, State};

use crate::error::{ClientError, Result};

/// Language declared in form headers.
pub const FORM_LANGUAGE: &str = "EN";
/// Content type of an accounts document.
pub const ACCOUNTS_CONTENT_TYPE: &str = "application/xml";
/// Document category of an accounts document.
pub const ACCOUNTS_CATEGORY: &str = "ACCOUNTS";

/// A request body with the message class it travels under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub body: Body,
    pub class: MessageClass,
    /// Submission number allocated for this request, if any.
    pub submission_number: Option<String>,
}

/// Company details query for the configured company.
pub fn company_data(config: &Config) -> Request {
    Request {
        body: Body::CompanyDataRequest(CompanyDataRequest {
            company_number: config.company_number.clone(),
            company_authentication_code: config.company_authentication_code.clone(),
            made_up_date: config.made_up_date_string(),
        }),
        class: MessageClass::CompanyData,
        submission_number: None,
    }
}

/// Accounts filing carrying `payload` as the document.
///
/// Allocates the next submission number from `state`. The form identifier and
/// message class come from the config's `class` (default `Accounts`).
pub fn accounts(
    state: &mut State,
    config: &Config,
    filename: &str,
    payload: &[u8],
) -> Result<Request> {
    let class = MessageClass::from_wire(config.accounts_class());
    form_submission(state, config, filename, payload, class)
}

/// Same filing as [`accounts`], sent under the `AccountsImage` class to
/// request a rendered image of the document.
pub fn accounts_image(
    state: &mut State,
    config: &Config,
    filename: &str,
    payload: &[u8],
) -> Result<Request> {
    form_submission(state, config, filename, payload, MessageClass::AccountsImage)
}

/// Status query for one submission, or for every submission of the
/// presenter when `submission_number` is `None`.
pub fn submission_status(config: &Config, submission_number: Option<&str>) -> Result<Request> {
    if let Some(number) = submission_number {
        if !is_submission_number(number) {
            return Err(ClientError::invalid(format!(
                "{number:?} is not a submission number"
            )));
        }
    }

    Ok(Request {
        body: Body::SubmissionStatusRequest(SubmissionStatusRequest {
            submission_number: submission_number.map(str::to_string),
            presenter_id: config.presenter_id.clone(),
        }),
        class: MessageClass::SubmissionStatus,
        submission_number: None,
    })
}

fn form_submission(
    state: &mut State,
    config: &Config,
    filename: &str,
    payload: &[u8],
    class: MessageClass,
) -> Result<Request> {
    if payload.is_empty() {
        return Err(ClientError::invalid("accounts document is empty"));
    }
    if filename.trim().is_empty() {
        return Err(ClientError::invalid("accounts filename is empty"));
    }

    let submission_number = state.allocate_submission_id()?;
    let body = Body::FormSubmission(FormSubmission {
        header: FormHeader {
            company_number: config.company_number.clone(),
            company_type: config.company_type.clone(),
            company_name: config.company_name.clone(),
            company_authentication_code: config.company_authentication_code.clone(),
            package_reference: config.package_reference.clone(),
            language: FORM_LANGUAGE.to_string(),
            form_identifier: config.accounts_class().to_string(),
            submission_number: submission_number.clone(),
            contact_name: config.contact_name.clone(),
            contact_number: config.contact_number.clone(),
        },
        date_signed: config.date_signed.clone(),
        document: Document {
            data: base64::engine::general_purpose::STANDARD.encode(payload),
            date: Some(config.made_up_date_string()),
            filename: filename.to_string(),
            content_type: ACCOUNTS_CONTENT_TYPE.to_string(),
            category: ACCOUNTS_CATEGORY.to_string(),
        },
    });

    Ok(Request {
        body,
        class,
        submission_number: Some(submission_number),
    })
}
