use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::body::{
    AccountsImageResult, Address, Body, CompanyData, CompanyDataRequest, Document, FormHeader,
    FormSubmission, GovTalkError, SubmissionAcknowledgement, SubmissionStatusEntry,
    SubmissionStatusRequest,
};
use crate::class::{MessageClass, Qualifier};
use crate::envelope::{
    ChannelRouting, Envelope, GovTalkDetails, Header, IdAuthentication, Key, MessageDetails,
    SenderDetails,
};
use crate::error::{EnvelopeError, Result};

/// Element tree built from a document, keyed by local names.
#[derive(Debug, Default)]
pub(crate) struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn require(&self, name: &str) -> Result<&Node> {
        self.child(name).ok_or_else(|| {
            EnvelopeError::malformed(format!("{} is missing {name}", self.name))
        })
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn opt_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Node::text)
    }

    fn required_text(&self, name: &str) -> Result<String> {
        self.require(name).map(Node::text)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Parse a document into a [`Node`] tree, rejecting anything not well-formed.
pub(crate) fn read_tree(input: &[u8]) -> Result<Node> {
    // Leaf text is kept verbatim; indentation between elements is dropped in `attach`.
    let mut reader = Reader::from_reader(input);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            EnvelopeError::malformed(format!(
                "invalid XML at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(EnvelopeError::malformed("content after the root element"));
                }
                stack.push(node_from(&start)?);
            }
            Event::Empty(start) => {
                let node = node_from(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| EnvelopeError::malformed("unbalanced end tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|err| EnvelopeError::malformed(format!("invalid text: {err}")))?;
                match stack.last_mut() {
                    Some(node) => node.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => return Err(EnvelopeError::malformed("text outside the root element")),
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|err| EnvelopeError::malformed(format!("invalid CDATA: {err}")))?;
                match stack.last_mut() {
                    Some(node) => node.text.push_str(&text),
                    None => return Err(EnvelopeError::malformed("CDATA outside the root element")),
                }
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(EnvelopeError::malformed(format!(
            "document ends inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| EnvelopeError::malformed("document has no root element"))
}

fn node_from(start: &BytesStart<'_>) -> Result<Node> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|err| EnvelopeError::malformed(format!("invalid attribute on {name}: {err}")))?;
        if attribute.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| EnvelopeError::malformed(format!("invalid attribute on {name}: {err}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Node {
        name,
        attributes,
        ..Node::default()
    })
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, mut node: Node) -> Result<()> {
    if !node.children.is_empty() && node.text.trim().is_empty() {
        node.text.clear();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => {
            return Err(EnvelopeError::malformed("multiple root elements"));
        }
        None => *root = Some(node),
    }
    Ok(())
}

/// Map a parsed tree onto the envelope structure.
pub(crate) fn read_envelope(root: &Node) -> Result<Envelope> {
    if root.name != "GovTalkMessage" {
        return Err(EnvelopeError::malformed(format!(
            "unexpected root element {}",
            root.name
        )));
    }

    Ok(Envelope {
        version: root.required_text("EnvelopeVersion")?,
        header: read_header(root.require("Header")?)?,
        details: match root.child("GovTalkDetails") {
            Some(details) => read_details(details)?,
            None => GovTalkDetails::default(),
        },
        body: read_body(root.require("Body")?)?,
    })
}

fn read_header(header: &Node) -> Result<Header> {
    let details = header.require("MessageDetails")?;
    let transaction_id = match details.opt_text("TransactionID") {
        Some(raw) => Some(parse_number::<u64>("TransactionID", &raw)?),
        None => None,
    };
    let gateway_test = match details.opt_text("GatewayTest") {
        Some(raw) => Some(parse_flag("GatewayTest", &raw)?),
        None => None,
    };

    let sender = header.child("SenderDetails").map(|sender| SenderDetails {
        authentication: sender.child("IDAuthentication").map(|auth| {
            let credentials = auth.child("Authentication");
            IdAuthentication {
                sender_id: auth.opt_text("SenderID").unwrap_or_default(),
                method: credentials
                    .and_then(|c| c.opt_text("Method"))
                    .unwrap_or_default(),
                value: credentials
                    .and_then(|c| c.opt_text("Value"))
                    .unwrap_or_default(),
            }
        }),
        email: sender.opt_text("EmailAddress"),
    });

    Ok(Header {
        message: MessageDetails {
            class: MessageClass::from_wire(&details.required_text("Class")?),
            qualifier: Qualifier::from_wire(&details.required_text("Qualifier")?)?,
            transaction_id,
            gateway_test,
        },
        sender,
    })
}

fn read_details(details: &Node) -> Result<GovTalkDetails> {
    let keys = details
        .child("Keys")
        .map(|keys| {
            keys.children_named("Key")
                .map(|key| Key {
                    key_type: key.attribute("Type").unwrap_or_default().to_string(),
                    value: key.text(),
                })
                .collect()
        })
        .unwrap_or_default();

    let routing = details
        .child("ChannelRouting")
        .and_then(|routing| routing.child("Channel"))
        .map(|channel| ChannelRouting {
            uri: channel.opt_text("URI"),
            product: channel.opt_text("Product"),
            version: channel.opt_text("Version"),
        });

    let errors = match details.child("GovTalkErrors") {
        Some(errors) => read_errors(errors)?,
        None => Vec::new(),
    };

    Ok(GovTalkDetails {
        keys,
        routing,
        errors,
    })
}

fn read_errors(list: &Node) -> Result<Vec<GovTalkError>> {
    list.children_named("Error")
        .map(|error| -> Result<GovTalkError> {
            Ok(GovTalkError {
                raised_by: error.opt_text("RaisedBy"),
                number: parse_number::<u32>("Number", &error.required_text("Number")?)?,
                error_type: error.opt_text("Type"),
                text: error.opt_text("Text").unwrap_or_default(),
                location: error.opt_text("Location"),
            })
        })
        .collect()
}

fn read_body(body: &Node) -> Result<Body> {
    let Some(content) = body.children.first() else {
        return Ok(Body::Empty);
    };

    let parsed = match content.name.as_str() {
        "CompanyDataRequest" => Body::CompanyDataRequest(CompanyDataRequest {
            company_number: content.required_text("CompanyNumber")?,
            company_authentication_code: content.opt_text("CompanyAuthenticationCode"),
            made_up_date: content.required_text("MadeUpDate")?,
        }),
        "FormSubmission" => Body::FormSubmission(read_form_submission(content)?),
        "GetSubmissionStatus" => Body::SubmissionStatusRequest(SubmissionStatusRequest {
            submission_number: content.opt_text("SubmissionNumber"),
            presenter_id: content.required_text("PresenterID")?,
        }),
        "CompanyData" => Body::CompanyData(read_company_data(content)?),
        "SubmissionAcknowledgment" | "SubmissionAcknowledgement" => {
            Body::SubmissionAcknowledgement(SubmissionAcknowledgement {
                submission_number: content.required_text("SubmissionNumber")?,
                status: content.opt_text("Status"),
                accepted_date: content.opt_text("AcceptedDate"),
            })
        }
        "SubmissionStatus" => Body::SubmissionStatus(
            content
                .children_named("Status")
                .map(|status| -> Result<SubmissionStatusEntry> {
                    Ok(SubmissionStatusEntry {
                        submission_number: status.required_text("SubmissionNumber")?,
                        status_code: status.required_text("StatusCode")?,
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        "AccountsImageResponse" => Body::AccountsImage(AccountsImageResult {
            status: content.opt_text("Status"),
            message: content.opt_text("Message"),
        }),
        "ErrorResponse" | "GovTalkErrors" => Body::Errors(read_errors(content)?),
        other => Body::Unrecognised {
            element: other.to_string(),
        },
    };
    Ok(parsed)
}

fn read_form_submission(form: &Node) -> Result<FormSubmission> {
    let header = form.require("FormHeader")?;
    let document = form.require("Document")?;
    Ok(FormSubmission {
        header: FormHeader {
            company_number: header.required_text("CompanyNumber")?,
            company_type: header.opt_text("CompanyType"),
            company_name: header.opt_text("CompanyName"),
            company_authentication_code: header.opt_text("CompanyAuthenticationCode"),
            package_reference: header.opt_text("PackageReference"),
            language: header.required_text("Language")?,
            form_identifier: header.required_text("FormIdentifier")?,
            submission_number: header.required_text("SubmissionNumber")?,
            contact_name: header.opt_text("ContactName"),
            contact_number: header.opt_text("ContactNumber"),
        },
        date_signed: form.opt_text("DateSigned"),
        document: Document {
            data: document.required_text("Data")?,
            date: document.opt_text("Date"),
            filename: document.required_text("Filename")?,
            content_type: document.required_text("ContentType")?,
            category: document.required_text("Category")?,
        },
    })
}

fn read_company_data(data: &Node) -> Result<CompanyData> {
    let trading_on_market = match data.opt_text("TradingOnMarket") {
        Some(raw) => Some(parse_flag("TradingOnMarket", &raw)?),
        None => None,
    };

    Ok(CompanyData {
        company_name: data.required_text("CompanyName")?,
        company_number: data.required_text("CompanyNumber")?,
        company_category: data.opt_text("CompanyCategory"),
        jurisdiction: data.opt_text("Jurisdiction"),
        trading_on_market,
        made_up_date: data.opt_text("MadeUpDate"),
        next_due_date: data.opt_text("NextDueDate"),
        registered_office: data
            .child("RegisteredOfficeAddress")
            .map(|address| Address {
                premise: address.opt_text("Premise"),
                street: address.opt_text("Street"),
                thoroughfare: address.opt_text("Thoroughfare"),
                post_town: address.opt_text("PostTown"),
                postcode: address.opt_text("Postcode"),
                country: address.opt_text("Country"),
            }),
        sic_codes: data
            .child("SICCodes")
            .map(|codes| codes.children_named("SICCode").map(Node::text).collect())
            .unwrap_or_default(),
    })
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| EnvelopeError::malformed(format!("{field} is not a number: {raw:?}")))
}

fn parse_flag(field: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(EnvelopeError::malformed(format!(
            "{field} is not a boolean: {raw:?}"
        ))),
    }
}
