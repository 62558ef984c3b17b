use std::path::Path;

use anyhow::{Context, Result};

pub const SHOWDOWN_URL: &str = "wss://sim3.psim.us/showdown/websocket";
pub const LOGIN_URL: &str = "https://play.pokemonshowdown.com/api/login";
pub const ACTION_URL: &str = "https://play.pokemonshowdown.com/action.php";
pub const DEFAULT_FORMAT: &str = "gen7randombattle";

/// How the session identifies itself to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Unregistered name; a random one is generated when none is given
    Guest(Option<String>),
    Login { username: String, password: String },
    /// Register a fresh random account
    Register,
}

impl Credentials {
    /// Read a username and password from the first two lines of a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("Invalid credentials file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents.lines().map(str::trim);
        let username = lines
            .next()
            .filter(|l| !l.is_empty())
            .context("missing username line")?;
        let password = lines
            .next()
            .filter(|l| !l.is_empty())
            .context("missing password line")?;

        Ok(Credentials::Login {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::Guest(None)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub login_url: String,
    pub action_url: String,
    /// Battle format to search for
    pub format: String,
    /// Packed team sent with `/utm`; "null" for formats that generate teams
    pub team: String,
    pub credentials: Credentials,
    /// Turn the battle timer on once a battle starts
    pub timer: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: SHOWDOWN_URL.to_string(),
            login_url: LOGIN_URL.to_string(),
            action_url: ACTION_URL.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            team: "null".to_string(),
            credentials: Credentials::default(),
            timer: true,
        }
    }
}

impl ClientConfig {
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.format, "gen7randombattle");
        assert_eq!(config.team, "null");
        assert!(config.timer);
        assert_eq!(config.credentials, Credentials::Guest(None));
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::default()
            .with_format("gen8randombattle")
            .with_credentials(Credentials::Register);

        let copy = config.clone();
        assert_eq!(copy.format, "gen8randombattle");
        assert_eq!(copy.credentials, Credentials::Register);
        assert!(format!("{:?}", copy).contains("gen8randombattle"));
    }

    #[test]
    fn test_parse_credentials() {
        let credentials = Credentials::parse("somebody\nhunter2\n").unwrap();
        assert_eq!(
            credentials,
            Credentials::Login {
                username: "somebody".into(),
                password: "hunter2".into(),
            }
        );
    }

    #[test]
    fn test_parse_credentials_missing_password() {
        assert!(Credentials::parse("somebody\n").is_err());
        assert!(Credentials::parse("").is_err());
    }

    #[test]
    fn test_missing_credentials_file() {
        let result = Credentials::from_file("/nonexistent/vantage/credentials");
        assert!(result.is_err());
    }
}
