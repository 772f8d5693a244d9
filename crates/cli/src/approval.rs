//! Approval challenge command.

use std::fs;
use std::path::Path;

use api_signer_common::approval::ApprovalResponder;
use api_signer_common::settings::Settings;

use crate::error::CliError;

/// Answer the challenge in `challenge_file` for the transaction in
/// `transaction_file`, returning the response as pretty-printed JSON.
pub fn respond(
    settings: &Settings,
    challenge_file: &Path,
    transaction_file: &Path,
) -> Result<String, CliError> {
    let challenge = fs::read(challenge_file)?;
    let transaction = fs::read(transaction_file)?;

    let key_pair = settings.key_pair()?;
    let responder = ApprovalResponder::new(&key_pair, settings.approval.missing_attributes);
    let response = responder.respond_json(&challenge, &transaction)?;

    Ok(serde_json::to_string_pretty(&response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_settings;
    use std::io::Write;

    fn json_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_respond_pretty_json() {
        let challenge = json_file(r#"{"type":"DSA_ED25519","challenge":{"attrs":["amount","to"]}}"#);
        let transaction = json_file(r#"{"amount":"10","to":"acct-1"}"#);

        let output = respond(&test_settings(), challenge.path(), transaction.path()).unwrap();
        let expected = r#"{
  "type": "DSA_ED25519",
  "challenge": {
    "sha256": "1fd38973158636ae73c6f38c346ae15ae4edeaa3226031d47b3a6b1b3975e636"
  },
  "response": "0a6527a54b1b588d0fe38818a9ca0237d6f115b1e2ac9b8937c195aa2f84ef5fbbb8eb6b1698945981dce99ead9e6071963822645ff6fc3a7e78cd00e4dc8b03"
}"#;
        assert_eq!(output, expected);
    }

    #[test]
    fn test_respond_rejects_unsupported_type() {
        let challenge = json_file(r#"{"type":"OTHER","challenge":{"attrs":["amount"]}}"#);
        let transaction = json_file(r#"{"amount":"10"}"#);

        let err = respond(&test_settings(), challenge.path(), transaction.path()).unwrap_err();
        match err {
            CliError::Signing(msg) => assert!(msg.contains("OTHER")),
            other => panic!("Expected Signing error, got {:?}", other),
        }
    }

    #[test]
    fn test_respond_missing_file() {
        let transaction = json_file("{}");
        let dir = tempfile::tempdir().unwrap();

        let err = respond(
            &test_settings(),
            &dir.path().join("challenge.json"),
            transaction.path(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
