use std::io::IsTerminal;

use chfiling_client::{Acceptance, Response, StatusEntry};
use chfiling_envelope::{AccountsImageResult, CompanyData, Envelope};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/chfiling/cli/v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CompanyDataOutput<'a> {
    schema_id: String,
    company_name: &'a str,
    company_number: &'a str,
    company_category: Option<&'a str>,
    jurisdiction: Option<&'a str>,
    trading_on_market: Option<bool>,
    made_up_date: Option<&'a str>,
    next_due_date: Option<&'a str>,
    registered_office: Vec<&'a str>,
    sic_codes: &'a [String],
}

#[derive(Serialize)]
struct AcceptanceOutput<'a> {
    schema_id: String,
    #[serde(flatten)]
    acceptance: &'a Acceptance,
}

#[derive(Serialize)]
struct SubmittedOutput<'a> {
    schema_id: String,
    submission_number: &'a str,
}

#[derive(Serialize)]
struct StatusOutput<'a> {
    schema_id: String,
    submissions: &'a [StatusEntry],
}

#[derive(Serialize)]
struct ImageOutput<'a> {
    schema_id: String,
    status: Option<&'a str>,
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct ExchangeOutput<'a> {
    schema_id: String,
    class: &'a str,
    qualifier: &'a str,
    transaction_id: Option<u64>,
}

fn schema_id(name: &str) -> String {
    format!("{SCHEMA_BASE}/{name}.schema.json")
}

pub fn print_response(response: &Response, format: OutputFormat) {
    println!("{}", render(response, format));
}

pub fn render(response: &Response, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => render_json(response),
        OutputFormat::Table => render_table(response),
        OutputFormat::Pretty => render_pretty(response),
    }
}

fn render_json(response: &Response) -> String {
    let json = match response {
        Response::CompanyData(data) => serde_json::to_string(&company_data_output(data)),
        Response::Acceptance(acceptance) => serde_json::to_string(&AcceptanceOutput {
            schema_id: schema_id("submission-accepted"),
            acceptance,
        }),
        Response::Submitted { submission_number } => serde_json::to_string(&SubmittedOutput {
            schema_id: schema_id("submission-completed"),
            submission_number,
        }),
        Response::Status(entries) => serde_json::to_string(&StatusOutput {
            schema_id: schema_id("submission-status"),
            submissions: entries,
        }),
        Response::AccountsImage(image) => serde_json::to_string(&image_output(image)),
        Response::Acknowledgement(envelope) => serde_json::to_string(&ExchangeOutput {
            schema_id: schema_id("acknowledgement"),
            class: envelope.class().as_str(),
            qualifier: envelope.qualifier().as_str(),
            transaction_id: envelope.header.message.transaction_id,
        }),
        Response::Received { class } => serde_json::to_string(&ExchangeOutput {
            schema_id: schema_id("received"),
            class: class.as_str(),
            qualifier: "response",
            transaction_id: None,
        }),
    };
    json.unwrap_or_else(|_| "{}".to_string())
}

fn render_table(response: &Response) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    match response {
        Response::Status(entries) => {
            table.set_header(vec!["SUBMISSION", "STATUS", "CODE"]);
            for entry in entries {
                table.add_row(vec![
                    entry.submission_number.clone(),
                    entry.status.to_string(),
                    entry.code.clone(),
                ]);
            }
        }
        other => {
            table.set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in fields(other) {
                table.add_row(vec![field.to_string(), value]);
            }
        }
    }
    table.to_string()
}

fn render_pretty(response: &Response) -> String {
    match response {
        Response::Status(entries) if entries.is_empty() => "no submissions".to_string(),
        Response::Status(entries) => entries
            .iter()
            .map(StatusEntry::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        other => {
            let rows = fields(other);
            let width = rows.iter().map(|(field, _)| field.len()).max().unwrap_or(0);
            rows.iter()
                .map(|(field, value)| format!("{field:<width$}  {value}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

// Label/value pairs for every non-list response.
fn fields(response: &Response) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    let mut push = |field: &'static str, value: Option<&str>| {
        if let Some(value) = value {
            rows.push((field, value.to_string()));
        }
    };

    match response {
        Response::CompanyData(data) => {
            push("Company name", Some(&data.company_name));
            push("Company number", Some(&data.company_number));
            push("Category", data.company_category.as_deref());
            push("Jurisdiction", data.jurisdiction.as_deref());
            let trading = data
                .trading_on_market
                .map(|trading| if trading { "yes" } else { "no" });
            push("Trading on market", trading);
            push("Made up date", data.made_up_date.as_deref());
            push("Next due date", data.next_due_date.as_deref());
            let office = address_lines(data).join(", ");
            push("Registered office", (!office.is_empty()).then_some(office.as_str()));
            let sic = data.sic_codes.join(", ");
            push("SIC codes", (!sic.is_empty()).then_some(sic.as_str()));
        }
        Response::Acceptance(acceptance) => {
            push("Submission", Some(&acceptance.submission_number));
            push("Status", Some("ACCEPTED"));
            push("Accepted", acceptance.accepted_date.as_deref());
        }
        Response::Submitted { submission_number } => {
            push("Submission", Some(submission_number));
            push("Status", Some("SUBMITTED"));
        }
        Response::AccountsImage(image) => {
            push("Status", image.status.as_deref());
            push("Message", image.message.as_deref());
        }
        Response::Acknowledgement(envelope) => acknowledgement_fields(envelope, &mut push),
        Response::Received { class } => {
            push("Class", Some(class.as_str()));
            push("Result", Some("received"));
        }
        Response::Status(_) => {}
    }
    rows
}

fn acknowledgement_fields(envelope: &Envelope, push: &mut impl FnMut(&'static str, Option<&str>)) {
    push("Class", Some(envelope.class().as_str()));
    push("Qualifier", Some(envelope.qualifier().as_str()));
    let transaction = envelope.header.message.transaction_id.map(|id| id.to_string());
    push("Transaction", transaction.as_deref());
}

fn address_lines(data: &CompanyData) -> Vec<&str> {
    data.registered_office
        .iter()
        .flat_map(|office| {
            [
                &office.premise,
                &office.street,
                &office.thoroughfare,
                &office.post_town,
                &office.postcode,
                &office.country,
            ]
        })
        .filter_map(|line| line.as_deref())
        .collect()
}

fn company_data_output(data: &CompanyData) -> CompanyDataOutput<'_> {
    CompanyDataOutput {
        schema_id: schema_id("company-data"),
        company_name: &data.company_name,
        company_number: &data.company_number,
        company_category: data.company_category.as_deref(),
        jurisdiction: data.jurisdiction.as_deref(),
        trading_on_market: data.trading_on_market,
        made_up_date: data.made_up_date.as_deref(),
        next_due_date: data.next_due_date.as_deref(),
        registered_office: address_lines(data),
        sic_codes: &data.sic_codes,
    }
}

fn image_output(image: &AccountsImageResult) -> ImageOutput<'_> {
    ImageOutput {
        schema_id: schema_id("accounts-image"),
        status: image.status.as_deref(),
        message: image.message.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use chfiling_client::Status;
    use chfiling_envelope::Address;

    use super::*;

    fn status() -> Response {
        Response::Status(vec![
            StatusEntry {
                submission_number: "S00027".to_string(),
                status: Status::Pending,
                code: "PENDING".to_string(),
            },
            StatusEntry {
                submission_number: "S00028".to_string(),
                status: Status::Accepted,
                code: "ACCEPT".to_string(),
            },
        ])
    }

    #[test]
    fn pretty_status_is_one_line_per_submission() {
        assert_eq!(
            render(&status(), OutputFormat::Pretty),
            "S00027: PENDING\nS00028: ACCEPTED"
        );
    }

    #[test]
    fn json_status_carries_schema_id() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&status(), OutputFormat::Json)).unwrap();
        assert_eq!(
            json["schema_id"],
            "https://schemas.3leaps.dev/chfiling/cli/v1/submission-status.schema.json"
        );
        assert_eq!(json["submissions"][0]["status"], "pending");
        assert_eq!(json["submissions"][1]["code"], "ACCEPT");
    }

    #[test]
    fn company_data_renders_address_and_sic_codes() {
        let response = Response::CompanyData(CompanyData {
            company_name: "Acme Widgets Ltd".to_string(),
            company_number: "01234567".to_string(),
            company_category: None,
            jurisdiction: Some("England/Wales".to_string()),
            trading_on_market: Some(false),
            made_up_date: None,
            next_due_date: None,
            registered_office: Some(Address {
                premise: Some("1".to_string()),
                post_town: Some("Leeds".to_string()),
                ..Address::default()
            }),
            sic_codes: vec!["62020".to_string()],
        });

        let pretty = render(&response, OutputFormat::Pretty);
        assert!(pretty.contains("Registered office  1, Leeds"));
        assert!(pretty.contains("Trading on market  no"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&response, OutputFormat::Json)).unwrap();
        assert_eq!(json["registered_office"][1], "Leeds");
        assert_eq!(json["sic_codes"][0], "62020");

        assert!(render(&response, OutputFormat::Table).contains("Acme Widgets Ltd"));
    }

    #[test]
    fn acceptance_json_flattens_fields() {
        let response = Response::Acceptance(Acceptance {
            submission_number: "S00001".to_string(),
            accepted_date: None,
        });
        let json: serde_json::Value =
            serde_json::from_str(&render(&response, OutputFormat::Json)).unwrap();
        assert_eq!(json["submission_number"], "S00001");
        assert!(json["accepted_date"].is_null());
    }

    #[test]
    fn submitted_filing_is_not_reported_as_accepted() {
        let response = Response::Submitted {
            submission_number: "S00001".to_string(),
        };

        let pretty = render(&response, OutputFormat::Pretty);
        assert_eq!(pretty, "Submission  S00001\nStatus      SUBMITTED");
        assert!(!render(&response, OutputFormat::Table).contains("ACCEPTED"));

        let json: serde_json::Value =
            serde_json::from_str(&render(&response, OutputFormat::Json)).unwrap();
        assert_eq!(
            json["schema_id"],
            "https://schemas.3leaps.dev/chfiling/cli/v1/submission-completed.schema.json"
        );
        assert_eq!(json["submission_number"], "S00001");
    }
}
