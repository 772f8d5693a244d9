//! Transaction approval responses.
//!
//! An approval challenge names transaction attributes. The responder renders
//! them as `"<attr>: <value>"` lines, hashes the message with SHA-256 and signs
//! the message itself with the approval key.
//!
//! Pipeline order: parse, check the approval type, build the message, hash,
//! sign, emit. Any failure aborts the whole response.

use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::constants::APPROVAL_TYPE_ED25519;
use crate::encoding::to_hex;
use crate::error::SignerError;
use crate::request_signing::{sign_message, KeyPair};

/// What to do when the transaction lacks an attribute the challenge names.
///
/// The default, `Reject`, is deliberately stricter than silently rendering a
/// missing attribute as an empty value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAttributePolicy {
    /// Fail with [`SignerError::MissingAttribute`].
    #[default]
    Reject,
    /// Render the line as `"<attr>: "`.
    RenderEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeAttributes {
    pub attrs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalChallenge {
    pub approval_type: String,
    pub challenge: ChallengeAttributes,
}

impl ApprovalChallenge {
    /// Parses challenge JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::MalformedChallenge`] naming the offending field.
    pub fn from_json(input: &[u8]) -> Result<Self, Report<SignerError>> {
        let value: Value = serde_json::from_slice(input).change_context(
            SignerError::MalformedChallenge {
                field: "<root>".into(),
            },
        )?;
        let object = value.as_object().ok_or_else(|| {
            Report::new(SignerError::MalformedChallenge {
                field: "<root>".into(),
            })
        })?;

        let approval_type = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Report::new(SignerError::MalformedChallenge {
                    field: "type".into(),
                })
            })?;

        let attrs = object
            .get("challenge")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                Report::new(SignerError::MalformedChallenge {
                    field: "challenge".into(),
                })
            })?
            .get("attrs")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Report::new(SignerError::MalformedChallenge {
                    field: "challenge.attrs".into(),
                })
            })?;

        let attrs = attrs
            .iter()
            .enumerate()
            .map(|(i, attr)| {
                attr.as_str().map(str::to_string).ok_or_else(|| {
                    Report::new(SignerError::MalformedChallenge {
                        field: format!("challenge.attrs[{}]", i),
                    })
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            approval_type: approval_type.to_string(),
            challenge: ChallengeAttributes { attrs },
        })
    }
}

/// Parses a transaction payload, which must be a JSON object.
///
/// # Errors
///
/// Returns [`SignerError::MalformedPayload`] if the input is not a JSON object.
pub fn parse_payload(input: &[u8]) -> Result<Map<String, Value>, Report<SignerError>> {
    let value: Value =
        serde_json::from_slice(input).change_context(SignerError::MalformedPayload {
            field: "<root>".into(),
        })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Report::new(SignerError::MalformedPayload {
            field: "<root>".into(),
        })
        .attach("transaction payload must be a JSON object")),
    }
}

/// Looks up `attr` in the payload and renders it for the challenge message.
///
/// Strings are used verbatim, other values as compact JSON. Absent keys and
/// JSON `null` yield `None`.
#[must_use]
pub fn attribute_value(payload: &Map<String, Value>, attr: &str) -> Option<String> {
    match payload.get(attr)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Renders one `"<attr>: <value>"` line per attribute, joined by `\n`.
///
/// # Errors
///
/// Returns [`SignerError::MissingAttribute`] for an absent attribute under
/// [`MissingAttributePolicy::Reject`].
pub fn build_challenge_message(
    attrs: &[String],
    payload: &Map<String, Value>,
    policy: MissingAttributePolicy,
) -> Result<String, Report<SignerError>> {
    let lines = attrs
        .iter()
        .map(|attr| match (attribute_value(payload, attr), policy) {
            (Some(value), _) => Ok(format!("{}: {}", attr, value)),
            (None, MissingAttributePolicy::RenderEmpty) => {
                log::warn!("Transaction has no '{}', rendering it empty", attr);
                Ok(format!("{}: ", attr))
            }
            (None, MissingAttributePolicy::Reject) => {
                Err(Report::new(SignerError::MissingAttribute { attr: attr.clone() }))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(lines.join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeDigest {
    pub sha256: String,
}

/// Serializes in the order `type`, `challenge.sha256`, `response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalResponse {
    #[serde(rename = "type")]
    pub approval_type: String,
    pub challenge: ChallengeDigest,
    pub response: String,
}

/// Answers approval challenges with a fixed key pair.
pub struct ApprovalResponder<'a> {
    key_pair: &'a KeyPair,
    policy: MissingAttributePolicy,
}

impl<'a> ApprovalResponder<'a> {
    #[must_use]
    pub fn new(key_pair: &'a KeyPair, policy: MissingAttributePolicy) -> Self {
        Self { key_pair, policy }
    }

    /// # Errors
    ///
    /// Returns [`SignerError::UnsupportedApprovalType`] for any type other than
    /// `DSA_ED25519`, [`SignerError::MissingAttribute`] per the policy, or
    /// [`SignerError::SigningFailure`].
    pub fn respond(
        &self,
        challenge: &ApprovalChallenge,
        payload: &Map<String, Value>,
    ) -> Result<ApprovalResponse, Report<SignerError>> {
        if challenge.approval_type != APPROVAL_TYPE_ED25519 {
            return Err(Report::new(SignerError::UnsupportedApprovalType {
                approval_type: challenge.approval_type.clone(),
            }));
        }

        let message = build_challenge_message(&challenge.challenge.attrs, payload, self.policy)?;
        let digest = to_hex(Sha256::digest(message.as_bytes()));
        let signature = sign_message(self.key_pair, message.as_bytes())
            .attach("while signing approval challenge")?;

        log::debug!(
            "Answered {} challenge over {} attributes, sha256 {}",
            challenge.approval_type,
            challenge.challenge.attrs.len(),
            digest
        );

        Ok(ApprovalResponse {
            approval_type: challenge.approval_type.clone(),
            challenge: ChallengeDigest { sha256: digest },
            response: signature,
        })
    }

    /// Parses challenge and transaction JSON, then answers the challenge.
    ///
    /// # Errors
    ///
    /// Returns the parse errors of [`ApprovalChallenge::from_json`] and
    /// [`parse_payload`], then those of [`ApprovalResponder::respond`].
    pub fn respond_json(
        &self,
        challenge_json: &[u8],
        transaction_json: &[u8],
    ) -> Result<ApprovalResponse, Report<SignerError>> {
        let challenge = ApprovalChallenge::from_json(challenge_json)?;
        let payload = parse_payload(transaction_json)?;
        self.respond(&challenge, &payload)
    }
}
