use std::fmt;
use std::str::FromStr;

use chfiling_config::Config;
use chfiling_envelope::{codec, Envelope, Qualifier};
use chfiling_state::State;
use chfiling_transport::Transport;
use tracing::{debug, info, warn};

use crate::classify::{classify, Response};
use crate::error::Result;
use crate::request::{self, Request};

/// When the transaction counter is committed relative to delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommitPolicy {
    /// Commit after the envelope is serialized, before the transport is
    /// called. A dispatched transaction ID is never reused, even when the
    /// transport fails.
    #[default]
    BeforeSend,
    /// Commit once a well-formed response has been parsed. Transport
    /// failures and malformed responses leave the counter untouched.
    AfterDelivery,
}

impl CommitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeSend => "before-send",
            Self::AfterDelivery => "after-delivery",
        }
    }
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "before-send" => Ok(Self::BeforeSend),
            "after-delivery" => Ok(Self::AfterDelivery),
            other => Err(format!(
                "unknown commit policy {other:?} (expected before-send or after-delivery)"
            )),
        }
    }
}

/// One presenter's filing session.
///
/// Owns the config, the counters and the transport. Every operation runs the
/// same pipeline: build the body, wrap it in an envelope, serialize, send,
/// parse and classify. State is committed exactly once per dispatched
/// request, at the point chosen by the [`CommitPolicy`].
pub struct Session<T> {
    config: Config,
    state: State,
    transport: T,
    policy: CommitPolicy,
}

impl<T: Transport> Session<T> {
    pub fn new(config: Config, state: State, transport: T) -> Self {
        Self {
            config,
            state,
            transport,
            policy: CommitPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Give back the owned parts, e.g. to inspect the transport in tests.
    pub fn into_parts(self) -> (Config, State, T) {
        (self.config, self.state, self.transport)
    }

    /// Query company details for the configured company.
    pub fn company_data(&mut self) -> Result<Response> {
        let request = request::company_data(&self.config);
        self.exchange(request)
    }

    /// File an accounts document.
    ///
    /// A response with an empty body is reported as
    /// [`Response::Submitted`] with the allocated submission number.
    pub fn submit_accounts(&mut self, filename: &str, payload: &[u8]) -> Result<Response> {
        let request = request::accounts(&mut self.state, &self.config, filename, payload)?;
        self.exchange(request)
    }

    /// Request a rendered image of an accounts document.
    pub fn accounts_image(&mut self, filename: &str, payload: &[u8]) -> Result<Response> {
        let request = request::accounts_image(&mut self.state, &self.config, filename, payload)?;
        self.exchange(request)
    }

    /// Query the status of one submission, or all of them.
    pub fn submission_status(&mut self, submission_number: Option<&str>) -> Result<Response> {
        let request = request::submission_status(&self.config, submission_number)?;
        self.exchange(request)
    }

    fn exchange(&mut self, request: Request) -> Result<Response> {
        let Request {
            body,
            class,
            submission_number,
        } = request;

        let envelope = Envelope::build(&self.state, &self.config, body, class, Qualifier::Request)?;
        let wire = codec::serialize(&envelope)?;
        let transaction_id = self.state.current_transaction_id();
        debug!(
            class = %envelope.class(),
            transaction_id,
            policy = %self.policy,
            "dispatching request"
        );

        if self.policy == CommitPolicy::BeforeSend {
            self.state.commit()?;
        }

        let reply = match self.transport.send(wire) {
            Ok(reply) => reply,
            Err(err) => {
                if self.policy == CommitPolicy::BeforeSend {
                    warn!(
                        transaction_id,
                        error = %err,
                        "transaction ID committed but delivery failed"
                    );
                }
                return Err(err.into());
            }
        };

        let parsed = codec::parse(&reply)?;
        if self.policy == CommitPolicy::AfterDelivery {
            self.state.commit()?;
        }

        info!(
            class = %parsed.class(),
            qualifier = %parsed.qualifier(),
            transaction_id,
            "exchange complete"
        );

        match classify(parsed) {
            Ok(Response::Received { class }) => match submission_number {
                Some(submission_number) => Ok(Response::Submitted { submission_number }),
                None => Ok(Response::Received { class }),
            },
            Ok(response) => Ok(response),
            Err(err) => {
                if let Some(classified) = err.classified() {
                    warn!(
                        category = %classified.category,
                        codes = ?classified.codes(),
                        transaction_id,
                        "gateway reported errors"
                    );
                }
                Err(err)
            }
        }
    }
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
