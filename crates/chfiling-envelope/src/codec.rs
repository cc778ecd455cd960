use bytes::Bytes;
use tracing::debug;

use crate::envelope::Envelope;
use crate::error::Result;
use crate::reader::{read_envelope, read_tree};
use crate::writer::EnvelopeWriter;

/// GovTalk envelope namespace.
pub const ENVELOPE_NS: &str = "http://www.govtalk.gov.uk/CM/envelope";

/// Envelope schema the gateway validates against.
pub const ENVELOPE_SCHEMA_LOCATION: &str =
    "http://xmlgw.companieshouse.gov.uk/v2-1/schema/Egov_ch-v2-0.xsd";

/// Envelope version written into every request.
pub const ENVELOPE_VERSION: &str = "2.0";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const COMPANY_DATA_NS: &str = "http://xmlgw.companieshouse.gov.uk";
pub const COMPANY_DATA_SCHEMA_LOCATION: &str =
    "http://xmlgw.companieshouse.gov.uk/v2-1/schema/CompanyData-v3-3.xsd";

pub const FORM_SUBMISSION_NS: &str = "http://xmlgw.companieshouse.gov.uk/Header";
pub const FORM_SUBMISSION_SCHEMA_LOCATION: &str =
    "http://xmlgw.companieshouse.gov.uk/v1-1/schema/forms/FormSubmission-v2-11.xsd";

pub const SUBMISSION_STATUS_NS: &str = "http://xmlgw.companieshouse.gov.uk";
pub const SUBMISSION_STATUS_SCHEMA_LOCATION: &str =
    "http://xmlgw.companieshouse.gov.uk/v2-1/schema/forms/GetSubmissionStatus-v2-5.xsd";

/// Serialize an envelope to the wire format.
///
/// Wire layout (element order is part of the contract):
/// ```text
/// GovTalkMessage (xmlns = envelope namespace)
///  ├─ EnvelopeVersion
///  ├─ Header
///  │   ├─ MessageDetails { Class, Qualifier, TransactionID, GatewayTest }
///  │   └─ SenderDetails { IDAuthentication { SenderID, Authentication { Method, Value } },
///  │                      EmailAddress }
///  ├─ GovTalkDetails { Keys, ChannelRouting, GovTalkErrors }
///  └─ Body (content element with its own namespace)
/// ```
pub fn serialize(envelope: &Envelope) -> Result<Bytes> {
    let bytes = EnvelopeWriter::new().write(envelope)?;
    debug!(
        class = %envelope.class(),
        transaction_id = ?envelope.header.message.transaction_id,
        size = bytes.len(),
        "serialized envelope"
    );
    Ok(Bytes::from(bytes))
}

/// Parse a wire document into an envelope.
///
/// Element lookup uses local names, so prefixed and default-namespaced
/// documents read the same. Fails with [`EnvelopeError::Malformed`] when the
/// document is not well-formed or lacks `EnvelopeVersion`, `Header`,
/// `MessageDetails/Class`, `MessageDetails/Qualifier` or `Body`.
///
/// [`EnvelopeError::Malformed`]: crate::EnvelopeError::Malformed
pub fn parse(input: &[u8]) -> Result<Envelope> {
    let tree = read_tree(input)?;
    let envelope = read_envelope(&tree)?;
    debug!(
        class = %envelope.class(),
        qualifier = %envelope.qualifier(),
        errors = envelope.errors().count(),
        "parsed envelope"
    );
    Ok(envelope)
}
