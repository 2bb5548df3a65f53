use std::collections::HashMap;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use flood_control_core::{AppError, NonEmptyString};
use flood_control_domain::Capability;
use tracing_subscriber::EnvFilter;

const MIN_OPERATOR_TOKEN_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Memory,
    Postgres { database_url: String },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres { .. } => "postgres",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub backend: BackendConfig,
    pub operator_tokens: HashMap<String, NonEmptyString>,
    pub capability_grants: Vec<(String, Capability)>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let backend = match env::var("CONFIG_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .as_str()
        {
            "memory" => BackendConfig::Memory,
            "postgres" => BackendConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "CONFIG_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let operator_tokens = if migrate_only {
            HashMap::new()
        } else {
            parse_operator_tokens(required_non_empty_env("OPERATOR_TOKENS")?.as_str())?
        };
        let capability_grants =
            parse_capability_grants(env::var("OPERATOR_CAPABILITIES").unwrap_or_default().as_str())?;

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            frontend_url,
            backend,
            operator_tokens,
            capability_grants,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Parses `token=subject` pairs separated by `;`.
fn parse_operator_tokens(value: &str) -> Result<HashMap<String, NonEmptyString>, AppError> {
    let mut tokens = HashMap::new();

    for entry in value.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((token, subject)) = entry.split_once('=') else {
            return Err(AppError::Validation(
                "OPERATOR_TOKENS entries must use the form 'token=subject'".to_owned(),
            ));
        };

        let token = token.trim();
        if token.len() < MIN_OPERATOR_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "OPERATOR_TOKENS tokens must be at least {MIN_OPERATOR_TOKEN_LENGTH} characters"
            )));
        }

        let subject = NonEmptyString::new(subject.trim())?;
        if tokens.insert(token.to_owned(), subject).is_some() {
            return Err(AppError::Validation(
                "OPERATOR_TOKENS contains a duplicate token".to_owned(),
            ));
        }
    }

    if tokens.is_empty() {
        return Err(AppError::Validation(
            "OPERATOR_TOKENS must define at least one operator".to_owned(),
        ));
    }

    Ok(tokens)
}

/// Parses `subject=capability,capability` entries separated by `;`.
fn parse_capability_grants(value: &str) -> Result<Vec<(String, Capability)>, AppError> {
    let mut grants = Vec::new();

    for entry in value.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((subject, capabilities)) = entry.split_once('=') else {
            return Err(AppError::Validation(
                "OPERATOR_CAPABILITIES entries must use the form 'subject=capability,...'"
                    .to_owned(),
            ));
        };

        let subject = NonEmptyString::new(subject.trim())?;
        for capability in capabilities
            .split(',')
            .filter(|capability| !capability.trim().is_empty())
        {
            grants.push((
                subject.as_str().to_owned(),
                Capability::from_str(capability)?,
            ));
        }
    }

    Ok(grants)
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
