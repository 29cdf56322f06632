//! Credential resolution: environment first, interactive prompt as the
//! fallback. The core only ever sees resolved values.

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Password};
use std::env;

/// UltraDNS login material.
#[derive(Debug, Clone)]
pub struct DnsCredentials {
    pub username: String,
    pub password: String,
}

/// DigiCert API key from `DIGICERT_KEY`, else a hidden prompt.
pub fn digicert_key() -> Result<String> {
    match env::var("DIGICERT_KEY") {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("DigiCert API key")
            .interact()
            .context("Failed to read DigiCert API key"),
    }
}

/// UltraDNS credentials from `ULTRADNS_USERNAME` / `ULTRADNS_PASSWORD`,
/// prompting for whichever is missing.
pub fn ultradns_credentials() -> Result<DnsCredentials> {
    let username = match env::var("ULTRADNS_USERNAME") {
        Ok(user) if !user.is_empty() => user,
        _ => Input::with_theme(&ColorfulTheme::default())
            .with_prompt("UltraDNS username")
            .interact_text()
            .context("Failed to read UltraDNS username")?,
    };
    let password = match env::var("ULTRADNS_PASSWORD") {
        Ok(pass) if !pass.is_empty() => pass,
        _ => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("UltraDNS password")
            .interact()
            .context("Failed to read UltraDNS password")?,
    };
    Ok(DnsCredentials { username, password })
}
