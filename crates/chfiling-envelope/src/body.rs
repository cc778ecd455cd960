//! Envelope body content.
//!
//! Each message class has its own body shape. [`Body`] is the sum of every
//! shape this client sends or understands, keyed by the content element's
//! name, so a parsed response can be inspected without knowing in advance
//! whether the gateway answered with data or with errors.

/// Company details query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDataRequest {
    pub company_number: String,
    pub company_authentication_code: Option<String>,
    pub made_up_date: String,
}

/// Header block of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHeader {
    pub company_number: String,
    pub company_type: Option<String>,
    pub company_name: Option<String>,
    pub company_authentication_code: Option<String>,
    pub package_reference: Option<String>,
    pub language: String,
    pub form_identifier: String,
    pub submission_number: String,
    pub contact_name: Option<String>,
    pub contact_number: Option<String>,
}

/// Attached document of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Base64-encoded document bytes.
    pub data: String,
    pub date: Option<String>,
    pub filename: String,
    pub content_type: String,
    pub category: String,
}

/// Accounts filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub header: FormHeader,
    pub date_signed: Option<String>,
    pub document: Document,
}

/// Status query; without a number it asks for every submission of the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatusRequest {
    pub submission_number: Option<String>,
    pub presenter_id: String,
}

/// Registered office address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pub premise: Option<String>,
    pub street: Option<String>,
    pub thoroughfare: Option<String>,
    pub post_town: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// Company details returned for a company data query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyData {
    pub company_name: String,
    pub company_number: String,
    pub company_category: Option<String>,
    pub jurisdiction: Option<String>,
    pub trading_on_market: Option<bool>,
    pub made_up_date: Option<String>,
    pub next_due_date: Option<String>,
    pub registered_office: Option<Address>,
    pub sic_codes: Vec<String>,
}

/// Gateway acknowledgement of an accepted filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAcknowledgement {
    pub submission_number: String,
    pub status: Option<String>,
    pub accepted_date: Option<String>,
}

/// One row of a status response, as sent by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStatusEntry {
    pub submission_number: String,
    pub status_code: String,
}

/// Result of an accounts image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsImageResult {
    pub status: Option<String>,
    pub message: Option<String>,
}

/// One error reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovTalkError {
    pub raised_by: Option<String>,
    pub number: u32,
    pub error_type: Option<String>,
    pub text: String,
    pub location: Option<String>,
}

/// Body content, one variant per content element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    /// `<Body/>` with no content element.
    #[default]
    Empty,
    CompanyDataRequest(CompanyDataRequest),
    FormSubmission(FormSubmission),
    SubmissionStatusRequest(SubmissionStatusRequest),
    CompanyData(CompanyData),
    SubmissionAcknowledgement(SubmissionAcknowledgement),
    SubmissionStatus(Vec<SubmissionStatusEntry>),
    AccountsImage(AccountsImageResult),
    /// Body-level error list (`ErrorResponse`).
    Errors(Vec<GovTalkError>),
    /// A content element this client does not model.
    Unrecognised { element: String },
}

impl Body {
    /// Name of the content element, or `None` for an empty body.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::CompanyDataRequest(_) => Some("CompanyDataRequest"),
            Self::FormSubmission(_) => Some("FormSubmission"),
            Self::SubmissionStatusRequest(_) => Some("GetSubmissionStatus"),
            Self::CompanyData(_) => Some("CompanyData"),
            Self::SubmissionAcknowledgement(_) => Some("SubmissionAcknowledgment"),
            Self::SubmissionStatus(_) => Some("SubmissionStatus"),
            Self::AccountsImage(_) => Some("AccountsImageResponse"),
            Self::Errors(_) => Some("ErrorResponse"),
            Self::Unrecognised { element } => Some(element),
        }
    }
}
