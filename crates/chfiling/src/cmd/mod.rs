use std::path::{Path, PathBuf};

use chfiling_client::{CommitPolicy, Session};
use chfiling_state::State;
use chfiling_transport::HttpTransport;
use clap::{Args, Subcommand};
use tracing::debug;

use crate::exit::{
    config_error, io_error, state_error, transport_error, CliError, CliResult, USAGE,
};
use crate::output::OutputFormat;

pub mod accounts;
pub mod company_data;
pub mod status;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query company details for the configured company.
    CompanyData,
    /// File an accounts document.
    SubmitAccounts(AccountsArgs),
    /// Query the status of one or all submissions.
    SubmissionStatus(StatusArgs),
    /// Request a rendered image of an accounts document.
    AccountsImage(AccountsArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Options shared by every command that talks to the gateway.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Presenter config file.
    #[arg(long, value_name = "FILE", default_value = "config.json", global = true)]
    pub config: PathBuf,

    /// Counter state file. Never share one between concurrent runs.
    #[arg(long, value_name = "FILE", default_value = "state.json", global = true)]
    pub state: PathBuf,

    /// When to commit the transaction counter.
    #[arg(
        long,
        value_name = "POLICY",
        default_value = "before-send",
        global = true
    )]
    pub commit_policy: CommitPolicy,
}

#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// iXBRL accounts document to file.
    #[arg(long, value_name = "FILE")]
    pub accounts: PathBuf,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Submission number to query. Omit to list every submission.
    #[arg(long, value_name = "ID")]
    pub submission_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn run(command: Command, session: &SessionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::CompanyData => company_data::run(session, format),
        Command::SubmitAccounts(args) => accounts::submit(args, session, format),
        Command::SubmissionStatus(args) => status::run(args, session, format),
        Command::AccountsImage(args) => accounts::image(args, session, format),
        Command::Version(args) => version::run(args),
    }
}

/// Load config and state, and connect the HTTP transport to the configured URL.
pub fn open_session(args: &SessionArgs) -> CliResult<Session<HttpTransport>> {
    let config = chfiling_config::from_path(&args.config).map_err(|err| {
        config_error(&format!("load config {}", args.config.display()), err)
    })?;
    let state = State::load(&args.state)
        .map_err(|err| state_error(&format!("load state {}", args.state.display()), err))?;
    let transport =
        HttpTransport::new(config.url.clone()).map_err(|err| transport_error("http client", err))?;

    debug!(
        config = %args.config.display(),
        state = %args.state.display(),
        transaction_id = state.current_transaction_id(),
        policy = %args.commit_policy,
        "session opened"
    );
    Ok(Session::new(config, state, transport).with_policy(args.commit_policy))
}

/// Read an accounts document and the filename it is filed under.
pub fn read_document(path: &Path) -> CliResult<(String, Vec<u8>)> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("{} does not name a document file", path.display()),
            )
        })?
        .to_string();
    let payload = std::fs::read(path)
        .map_err(|err| io_error(&format!("read accounts {}", path.display()), err))?;
    Ok((filename, payload))
}
