use crate::cmd::{open_session, SessionArgs, StatusArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: StatusArgs, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(session)?;
    let response = session
        .submission_status(args.submission_id.as_deref())
        .map_err(|err| client_error("submission status request failed", err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}
