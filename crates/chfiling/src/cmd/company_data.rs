use crate::cmd::{open_session, SessionArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_response, OutputFormat};

pub fn run(args: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = open_session(args)?;
    let response = session
        .company_data()
        .map_err(|err| client_error("company data request failed", err))?;
    print_response(&response, format);
    Ok(SUCCESS)
}
