use chfiling_config::Config;
use chfiling_state::State;

use crate::auth::{one_way_hash, AUTH_METHOD};
use crate::body::{Body, GovTalkError};
use crate::class::{MessageClass, Qualifier};
use crate::codec::ENVELOPE_VERSION;
use crate::error::Result;

/// Product name announced in channel routing.
pub const PRODUCT_NAME: &str = "chfiling";

/// A GovTalk message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: String,
    pub header: Header,
    pub details: GovTalkDetails,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub message: MessageDetails,
    pub sender: Option<SenderDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDetails {
    pub class: MessageClass,
    pub qualifier: Qualifier,
    pub transaction_id: Option<u64>,
    pub gateway_test: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderDetails {
    pub authentication: Option<IdAuthentication>,
    pub email: Option<String>,
}

/// Sender credentials as digests; the clear-text values never enter an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAuthentication {
    pub sender_id: String,
    pub method: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GovTalkDetails {
    pub keys: Vec<Key>,
    pub routing: Option<ChannelRouting>,
    pub errors: Vec<GovTalkError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub key_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRouting {
    pub uri: Option<String>,
    pub product: Option<String>,
    pub version: Option<String>,
}

impl ChannelRouting {
    /// Routing entry naming this client.
    pub fn this_client() -> Self {
        Self {
            uri: None,
            product: Some(PRODUCT_NAME.to_string()),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }
    }
}

impl Envelope {
    /// Assemble a request envelope around `body`.
    ///
    /// Reads the transaction ID from `state` without advancing it, so a
    /// failure anywhere before the commit never burns an ID. Fails with a
    /// config error when a credential or the company number is empty.
    pub fn build(
        state: &State,
        config: &Config,
        body: Body,
        class: MessageClass,
        qualifier: Qualifier,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            version: ENVELOPE_VERSION.to_string(),
            header: Header {
                message: MessageDetails {
                    class,
                    qualifier,
                    transaction_id: Some(state.current_transaction_id()),
                    gateway_test: Some(config.gateway_test),
                },
                sender: Some(SenderDetails {
                    authentication: Some(IdAuthentication {
                        sender_id: one_way_hash(&config.presenter_id),
                        method: AUTH_METHOD.to_string(),
                        value: one_way_hash(&config.authentication),
                    }),
                    email: config.email.clone(),
                }),
            },
            details: GovTalkDetails {
                keys: Vec::new(),
                routing: Some(ChannelRouting::this_client()),
                errors: Vec::new(),
            },
            body,
        })
    }

    /// Message class from the header.
    pub fn class(&self) -> &MessageClass {
        &self.header.message.class
    }

    /// Qualifier from the header.
    pub fn qualifier(&self) -> Qualifier {
        self.header.message.qualifier
    }

    /// Every reported error, header-level first, then body-level.
    pub fn errors(&self) -> impl Iterator<Item = &GovTalkError> {
        let body_errors: &[GovTalkError] = match &self.body {
            Body::Errors(errors) => errors,
            _ => &[],
        };
        self.details.errors.iter().chain(body_errors.iter())
    }

    /// True if the envelope carries at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }
}
