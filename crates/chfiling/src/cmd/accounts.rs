use chfiling_client::Response;
use tracing::info;

use crate::cmd::{open_session, read_document, AccountsArgs, SessionArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn submit(args: AccountsArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let (filename, payload) = read_document(&args.accounts)?;
    let mut session = open_session(session)?;
    let response = session
        .submit_accounts(&filename, &payload)
        .map_err(|err| client_error("accounts submission failed", err))?;

    match &response {
        Response::Acceptance(acceptance) => info!(
            submission = %acceptance.submission_number,
            filename = %filename,
            "accounts accepted for processing"
        ),
        Response::Submitted { submission_number } => info!(
            submission = %submission_number,
            filename = %filename,
            "accounts submitted"
        ),
        _ => {}
    }
    print_response(&response, format);
    Ok(SUCCESS)
}

pub fn image(args: AccountsArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let (filename, payload) = read_document(&args.accounts)?;
    let mut session = open_session(session)?;
    let response = session
        .accounts_image(&filename, &payload)
        .map_err(|err| client_error("accounts image request failed", err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}
