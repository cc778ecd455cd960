use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::body::{
    AccountsImageResult, Body, CompanyData, CompanyDataRequest, FormSubmission, GovTalkError,
    SubmissionAcknowledgement, SubmissionStatusEntry, SubmissionStatusRequest,
};
use crate::codec::{
    COMPANY_DATA_NS, COMPANY_DATA_SCHEMA_LOCATION, ENVELOPE_NS, ENVELOPE_SCHEMA_LOCATION,
    FORM_SUBMISSION_NS, FORM_SUBMISSION_SCHEMA_LOCATION, SUBMISSION_STATUS_NS,
    SUBMISSION_STATUS_SCHEMA_LOCATION, XSI_NS,
};
use crate::envelope::{Envelope, GovTalkDetails, Header};
use crate::error::{EnvelopeError, Result};

const INDENT: usize = 2;

/// Writes an envelope as indented XML in schema order.
pub(crate) struct EnvelopeWriter {
    inner: Writer<Vec<u8>>,
}

impl EnvelopeWriter {
    pub(crate) fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', INDENT),
        }
    }

    pub(crate) fn write(mut self, envelope: &Envelope) -> Result<Vec<u8>> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let schema_location = format!("{ENVELOPE_NS} {ENVELOPE_SCHEMA_LOCATION}");
        self.start_with(
            "GovTalkMessage",
            &[
                ("xmlns", ENVELOPE_NS),
                ("xmlns:xsi", XSI_NS),
                ("xsi:schemaLocation", &schema_location),
            ],
        )?;
        self.leaf("EnvelopeVersion", &envelope.version)?;
        self.header(&envelope.header)?;
        self.details(&envelope.details)?;
        self.body(&envelope.body)?;
        self.end("GovTalkMessage")?;

        let mut bytes = self.inner.into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn header(&mut self, header: &Header) -> Result<()> {
        let message = &header.message;
        self.start("Header")?;
        self.start("MessageDetails")?;
        self.leaf("Class", message.class.as_str())?;
        self.leaf("Qualifier", message.qualifier.as_str())?;
        if let Some(id) = message.transaction_id {
            self.leaf("TransactionID", &id.to_string())?;
        }
        if let Some(test) = message.gateway_test {
            self.leaf("GatewayTest", if test { "1" } else { "0" })?;
        }
        self.end("MessageDetails")?;

        if let Some(sender) = &header.sender {
            self.start("SenderDetails")?;
            if let Some(auth) = &sender.authentication {
                self.start("IDAuthentication")?;
                self.leaf("SenderID", &auth.sender_id)?;
                self.start("Authentication")?;
                self.leaf("Method", &auth.method)?;
                self.leaf("Value", &auth.value)?;
                self.end("Authentication")?;
                self.end("IDAuthentication")?;
            }
            self.opt_leaf("EmailAddress", sender.email.as_deref())?;
            self.end("SenderDetails")?;
        }
        self.end("Header")
    }

    fn details(&mut self, details: &GovTalkDetails) -> Result<()> {
        self.start("GovTalkDetails")?;
        if details.keys.is_empty() {
            self.empty("Keys")?;
        } else {
            self.start("Keys")?;
            for key in &details.keys {
                self.start_with("Key", &[("Type", &key.key_type)])?;
                self.text(&key.value)?;
                self.end("Key")?;
            }
            self.end("Keys")?;
        }

        if let Some(routing) = &details.routing {
            self.start("ChannelRouting")?;
            self.start("Channel")?;
            self.opt_leaf("URI", routing.uri.as_deref())?;
            self.opt_leaf("Product", routing.product.as_deref())?;
            self.opt_leaf("Version", routing.version.as_deref())?;
            self.end("Channel")?;
            self.end("ChannelRouting")?;
        }

        if !details.errors.is_empty() {
            self.start("GovTalkErrors")?;
            self.errors(&details.errors)?;
            self.end("GovTalkErrors")?;
        }
        self.end("GovTalkDetails")
    }

    fn body(&mut self, body: &Body) -> Result<()> {
        if matches!(body, Body::Empty) {
            return self.empty("Body");
        }

        self.start("Body")?;
        match body {
            Body::Empty => {}
            Body::CompanyDataRequest(request) => self.company_data_request(request)?,
            Body::FormSubmission(form) => self.form_submission(form)?,
            Body::SubmissionStatusRequest(request) => self.submission_status_request(request)?,
            Body::CompanyData(data) => self.company_data(data)?,
            Body::SubmissionAcknowledgement(ack) => self.acknowledgement(ack)?,
            Body::SubmissionStatus(entries) => self.submission_status(entries)?,
            Body::AccountsImage(image) => self.accounts_image(image)?,
            Body::Errors(errors) => {
                self.start("ErrorResponse")?;
                self.errors(errors)?;
                self.end("ErrorResponse")?;
            }
            Body::Unrecognised { element } => self.empty(element)?,
        }
        self.end("Body")
    }

    fn company_data_request(&mut self, request: &CompanyDataRequest) -> Result<()> {
        let schema_location = format!("{COMPANY_DATA_NS} {COMPANY_DATA_SCHEMA_LOCATION}");
        self.start_with(
            "CompanyDataRequest",
            &[
                ("xmlns", COMPANY_DATA_NS),
                ("xsi:schemaLocation", &schema_location),
            ],
        )?;
        self.leaf("CompanyNumber", &request.company_number)?;
        self.opt_leaf(
            "CompanyAuthenticationCode",
            request.company_authentication_code.as_deref(),
        )?;
        self.leaf("MadeUpDate", &request.made_up_date)?;
        self.end("CompanyDataRequest")
    }

    fn form_submission(&mut self, form: &FormSubmission) -> Result<()> {
        let schema_location = format!("{FORM_SUBMISSION_NS} {FORM_SUBMISSION_SCHEMA_LOCATION}");
        self.start_with(
            "FormSubmission",
            &[
                ("xmlns", FORM_SUBMISSION_NS),
                ("xsi:schemaLocation", &schema_location),
            ],
        )?;

        let header = &form.header;
        self.start("FormHeader")?;
        self.leaf("CompanyNumber", &header.company_number)?;
        self.opt_leaf("CompanyType", header.company_type.as_deref())?;
        self.opt_leaf("CompanyName", header.company_name.as_deref())?;
        self.opt_leaf(
            "CompanyAuthenticationCode",
            header.company_authentication_code.as_deref(),
        )?;
        self.opt_leaf("PackageReference", header.package_reference.as_deref())?;
        self.leaf("Language", &header.language)?;
        self.leaf("FormIdentifier", &header.form_identifier)?;
        self.leaf("SubmissionNumber", &header.submission_number)?;
        self.opt_leaf("ContactName", header.contact_name.as_deref())?;
        self.opt_leaf("ContactNumber", header.contact_number.as_deref())?;
        self.end("FormHeader")?;

        self.opt_leaf("DateSigned", form.date_signed.as_deref())?;
        self.empty("Form")?;

        let document = &form.document;
        self.start("Document")?;
        self.leaf("Data", &document.data)?;
        self.opt_leaf("Date", document.date.as_deref())?;
        self.leaf("Filename", &document.filename)?;
        self.leaf("ContentType", &document.content_type)?;
        self.leaf("Category", &document.category)?;
        self.end("Document")?;

        self.end("FormSubmission")
    }

    fn submission_status_request(&mut self, request: &SubmissionStatusRequest) -> Result<()> {
        let schema_location =
            format!("{SUBMISSION_STATUS_NS} {SUBMISSION_STATUS_SCHEMA_LOCATION}");
        self.start_with(
            "GetSubmissionStatus",
            &[
                ("xmlns", SUBMISSION_STATUS_NS),
                ("xsi:schemaLocation", &schema_location),
            ],
        )?;
        self.opt_leaf("SubmissionNumber", request.submission_number.as_deref())?;
        self.leaf("PresenterID", &request.presenter_id)?;
        self.end("GetSubmissionStatus")
    }

    fn company_data(&mut self, data: &CompanyData) -> Result<()> {
        self.start("CompanyData")?;
        self.leaf("CompanyName", &data.company_name)?;
        self.leaf("CompanyNumber", &data.company_number)?;
        self.opt_leaf("CompanyCategory", data.company_category.as_deref())?;
        self.opt_leaf("Jurisdiction", data.jurisdiction.as_deref())?;
        if let Some(trading) = data.trading_on_market {
            self.leaf("TradingOnMarket", if trading { "true" } else { "false" })?;
        }
        self.opt_leaf("MadeUpDate", data.made_up_date.as_deref())?;
        self.opt_leaf("NextDueDate", data.next_due_date.as_deref())?;
        if let Some(address) = &data.registered_office {
            self.start("RegisteredOfficeAddress")?;
            self.opt_leaf("Premise", address.premise.as_deref())?;
            self.opt_leaf("Street", address.street.as_deref())?;
            self.opt_leaf("Thoroughfare", address.thoroughfare.as_deref())?;
            self.opt_leaf("PostTown", address.post_town.as_deref())?;
            self.opt_leaf("Postcode", address.postcode.as_deref())?;
            self.opt_leaf("Country", address.country.as_deref())?;
            self.end("RegisteredOfficeAddress")?;
        }
        if !data.sic_codes.is_empty() {
            self.start("SICCodes")?;
            for code in &data.sic_codes {
                self.leaf("SICCode", code)?;
            }
            self.end("SICCodes")?;
        }
        self.end("CompanyData")
    }

    fn acknowledgement(&mut self, ack: &SubmissionAcknowledgement) -> Result<()> {
        self.start("SubmissionAcknowledgment")?;
        self.leaf("SubmissionNumber", &ack.submission_number)?;
        self.opt_leaf("Status", ack.status.as_deref())?;
        self.opt_leaf("AcceptedDate", ack.accepted_date.as_deref())?;
        self.end("SubmissionAcknowledgment")
    }

    fn submission_status(&mut self, entries: &[SubmissionStatusEntry]) -> Result<()> {
        if entries.is_empty() {
            return self.empty("SubmissionStatus");
        }
        self.start("SubmissionStatus")?;
        for entry in entries {
            self.start("Status")?;
            self.leaf("SubmissionNumber", &entry.submission_number)?;
            self.leaf("StatusCode", &entry.status_code)?;
            self.end("Status")?;
        }
        self.end("SubmissionStatus")
    }

    fn accounts_image(&mut self, image: &AccountsImageResult) -> Result<()> {
        self.start("AccountsImageResponse")?;
        self.opt_leaf("Status", image.status.as_deref())?;
        self.opt_leaf("Message", image.message.as_deref())?;
        self.end("AccountsImageResponse")
    }

    fn errors(&mut self, errors: &[GovTalkError]) -> Result<()> {
        for error in errors {
            self.start("Error")?;
            self.opt_leaf("RaisedBy", error.raised_by.as_deref())?;
            self.leaf("Number", &error.number.to_string())?;
            self.opt_leaf("Type", error.error_type.as_deref())?;
            self.leaf("Text", &error.text)?;
            self.opt_leaf("Location", error.location.as_deref())?;
            self.end("Error")?;
        }
        Ok(())
    }

    fn start(&mut self, name: &str) -> Result<()> {
        self.event(Event::Start(BytesStart::new(name)))
    }

    fn start_with(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.event(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str) -> Result<()> {
        self.event(Event::Empty(BytesStart::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    // Empty values are written as `<Name/>` so they read back as present-but-empty.
    fn leaf(&mut self, name: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.empty(name);
        }
        self.start(name)?;
        self.text(text)?;
        self.end(name)
    }

    fn opt_leaf(&mut self, name: &str, text: Option<&str>) -> Result<()> {
        match text {
            Some(text) => self.leaf(name, text),
            None => Ok(()),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner
            .write_event(event)
            .map_err(|err| EnvelopeError::Serialize(err.to_string()))
    }
}
