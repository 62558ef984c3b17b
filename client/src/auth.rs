//! Challenge/assertion login handshake

use anyhow::{Context, anyhow};
use rand::Rng;
use rand::distributions::Alphanumeric;
use vantage_protocol::{
    ClientCommand, ClientMessage, ServerMessage, parse_server_frame, to_id,
};

use crate::config::{ClientConfig, Credentials};
use crate::error::{Result, SessionError};
use crate::transport::Transport;

const GUEST_NAME_LENGTH: usize = 8;
const PASSWORD_LENGTH: usize = 16;

/// Log in over an open transport and return the name the server confirmed
pub(crate) async fn authenticate<T: Transport>(
    transport: &mut T,
    config: &ClientConfig,
) -> Result<String> {
    let challstr = wait_for_challstr(transport).await?;
    let http = reqwest::Client::new();

    let (username, assertion) = match &config.credentials {
        Credentials::Guest(name) => {
            let username = name.clone().unwrap_or_else(|| random_token(GUEST_NAME_LENGTH));
            let assertion = guest_assertion(&http, &config.action_url, &username, &challstr).await;
            (username, assertion)
        }
        Credentials::Login { username, password } => {
            let assertion =
                login_assertion(&http, &config.login_url, username, password, &challstr).await;
            (username.clone(), assertion)
        }
        Credentials::Register => {
            let username = random_token(GUEST_NAME_LENGTH);
            let password = random_token(PASSWORD_LENGTH);
            let assertion =
                register_assertion(&http, &config.action_url, &username, &password, &challstr)
                    .await;
            (username, assertion)
        }
    };
    let assertion = assertion.map_err(SessionError::Auth)?;

    let login = ClientMessage::global(ClientCommand::TrustedLogin {
        username: username.clone(),
        assertion,
    });
    transport
        .send(login.to_wire_format())
        .await
        .map_err(SessionError::Transport)?;

    wait_for_login_confirmation(transport, &username).await
}

/// Wait for the challstr message from the server
async fn wait_for_challstr<T: Transport>(transport: &mut T) -> Result<String> {
    loop {
        let frame = next_frame(transport).await?;
        for (_, message) in parse_server_frame(&frame).messages() {
            if let Ok(ServerMessage::Challstr(challstr)) = message {
                return Ok(challstr);
            }
        }
    }
}

/// Wait for the updateuser that names us
async fn wait_for_login_confirmation<T: Transport>(
    transport: &mut T,
    username: &str,
) -> Result<String> {
    let expected = to_id(username);
    loop {
        let frame = next_frame(transport).await?;
        for (_, message) in parse_server_frame(&frame).messages() {
            match message {
                Ok(ServerMessage::UpdateUser { user, named, .. })
                    if named && to_id(&user.name) == expected =>
                {
                    return Ok(user.name);
                }
                Ok(ServerMessage::NameTaken { username, message }) => {
                    return Err(SessionError::Auth(anyhow!(
                        "name {} rejected: {}",
                        username,
                        message
                    )));
                }
                _ => {}
            }
        }
    }
}

async fn next_frame<T: Transport>(transport: &mut T) -> Result<String> {
    transport
        .receive()
        .await
        .map_err(SessionError::Transport)?
        .ok_or(SessionError::Closed)
}

/// Authenticate a registered account with the login server
async fn login_assertion(
    http: &reqwest::Client,
    url: &str,
    username: &str,
    password: &str,
    challstr: &str,
) -> anyhow::Result<String> {
    let body = http
        .post(url)
        .form(&[
            ("name", username),
            ("pass", password),
            ("challstr", challstr),
        ])
        .send()
        .await
        .context("Failed to send login request")?
        .text()
        .await?;

    parse_action_response(&body)
}

/// Assertion for an unregistered name
async fn guest_assertion(
    http: &reqwest::Client,
    url: &str,
    username: &str,
    challstr: &str,
) -> anyhow::Result<String> {
    let body = http
        .post(url)
        .form(&[
            ("act", "getassertion"),
            ("userid", username),
            ("challstr", challstr),
        ])
        .send()
        .await
        .context("Failed to send assertion request")?
        .text()
        .await?;

    parse_guest_response(&body)
}

async fn register_assertion(
    http: &reqwest::Client,
    url: &str,
    username: &str,
    password: &str,
    challstr: &str,
) -> anyhow::Result<String> {
    let body = http
        .post(url)
        .form(&[
            ("act", "register"),
            ("username", username),
            ("password", password),
            ("cpassword", password),
            ("captcha", "pikachu"),
            ("challstr", challstr),
        ])
        .send()
        .await
        .context("Failed to send registration request")?
        .text()
        .await?;

    parse_action_response(&body)
}

/// Login and registration respond with `]` followed by JSON
fn parse_action_response(body: &str) -> anyhow::Result<String> {
    let json_str = body
        .strip_prefix(']')
        .context("Invalid login response format")?;

    let json: serde_json::Value =
        serde_json::from_str(json_str).context("Failed to parse login response")?;

    let assertion = json.get("assertion").and_then(|v| v.as_str());

    if json.get("actionsuccess").and_then(|v| v.as_bool()) != Some(true) {
        let error = assertion
            .and_then(|a| a.strip_prefix(";;"))
            .unwrap_or("Unknown error");
        anyhow::bail!("Login failed: {}", error);
    }

    match assertion {
        Some(a) if a.starts_with(";;") => Err(anyhow!("Login failed: {}", &a[2..])),
        Some(a) => Ok(a.to_string()),
        None => Err(anyhow!("Login response missing assertion")),
    }
}

/// Guest assertions come back as plain text; errors start with `;`
fn parse_guest_response(body: &str) -> anyhow::Result<String> {
    let assertion = body.trim();
    if assertion.is_empty() {
        anyhow::bail!("Empty assertion");
    }
    if let Some(error) = assertion.strip_prefix(';') {
        anyhow::bail!("Guest login refused: {}", error.trim_start_matches(';'));
    }
    Ok(assertion.to_string())
}

fn random_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
