//! `--set-key` and `--test-key`.

use crate::config::{
    CredentialError, CredentialStore, Settings, SettingsCredentialStore, settings_path,
};
use crate::i18n::Messages;
use crate::sources::PerplexityClient;
use crate::state::FactCheckError;

/// What: Prompt for an API key without echo and save it.
///
/// Inputs:
/// - `messages`: UI strings
///
/// Output:
/// - Process exit code (0 on success)
pub fn handle_set_key(messages: &Messages) -> i32 {
    let entered = match rpassword::prompt_password(messages.t("app.cli.key_prompt")) {
        Ok(k) => zeroize::Zeroizing::new(k),
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let store = SettingsCredentialStore::new(settings_path());
    match store.save(&entered) {
        Ok(()) => {
            println!("{}", messages.t("app.cli.key_saved"));
            0
        }
        Err(e) => {
            eprintln!("{}", credential_error_message(&e, messages));
            1
        }
    }
}

/// Localized text for a rejected key.
fn credential_error_message(e: &CredentialError, messages: &Messages) -> String {
    match e {
        CredentialError::Empty => messages.t("app.cli.key_empty"),
        CredentialError::TooShort => messages.t("app.cli.key_too_short"),
        CredentialError::Io(_) => e.to_string(),
    }
}

/// What: Check the configured key with a minimal request.
///
/// Inputs:
/// - `settings`: Endpoint and model
/// - `messages`: UI strings
///
/// Output:
/// - Process exit code (0 when the key works)
pub async fn handle_test_key(settings: &Settings, messages: &Messages) -> i32 {
    let store = SettingsCredentialStore::from_environment(settings_path());
    let Some(credential) = store.get_credential() else {
        eprintln!("{}", FactCheckError::MissingCredential);
        return 1;
    };
    println!("{}", messages.t("app.cli.key_testing"));
    let client = PerplexityClient::new(settings);
    let (code, line) = test_outcome_message(client.test_credential(&credential).await, messages);
    if code == 0 {
        println!("{line}");
    } else {
        eprintln!("{line}");
    }
    code
}

/// Exit code and message for a credential test result.
fn test_outcome_message(
    outcome: Result<(), FactCheckError>,
    messages: &Messages,
) -> (i32, String) {
    match outcome {
        Ok(()) => (0, messages.t("app.cli.key_valid")),
        Err(FactCheckError::InvalidCredential) => (1, messages.t("app.cli.key_invalid")),
        Err(FactCheckError::RateLimited) => (1, messages.t("app.cli.key_rate_limited")),
        Err(e) => (1, messages.t_fmt1("app.cli.key_error", e)),
    }
}
