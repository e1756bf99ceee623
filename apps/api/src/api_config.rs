use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use inkwell_core::AppError;
use inkwell_domain::EmailAddress;
use inkwell_infrastructure::DEFAULT_JOB_TTL_SECONDS;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub deploy_only: bool,
    pub database_url: String,
    pub redis_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub administrator_email: Option<EmailAddress>,
    pub job_queue_prefix: String,
    pub job_ttl_seconds: u64,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(env::args().nth(1).as_deref(), |name| env::var(name).ok())
    }

    fn from_lookup(
        command: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let deploy_only = match command {
            None => false,
            Some("deploy") => true,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}', expected 'deploy'"
                )));
            }
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;
        let redis_url =
            lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379".to_owned());

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value.parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid API_PORT '{value}': {error}"))
            })?,
            None => 3001,
        };

        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let administrator_email = lookup("INKWELL_ADMIN_EMAIL")
            .filter(|value| !value.trim().is_empty())
            .map(EmailAddress::new)
            .transpose()
            .map_err(|error| {
                AppError::Validation(format!("invalid INKWELL_ADMIN_EMAIL: {error}"))
            })?;

        let job_queue_prefix = lookup("JOB_QUEUE_PREFIX").unwrap_or_else(|| "inkwell".to_owned());
        let job_ttl_seconds = match lookup("JOB_TTL_SECONDS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid JOB_TTL_SECONDS '{value}': {error}"))
            })?,
            None => DEFAULT_JOB_TTL_SECONDS,
        };

        Ok(Self {
            deploy_only,
            database_url,
            redis_url,
            frontend_url,
            api_host,
            api_port,
            cookie_secure,
            administrator_email,
            job_queue_prefix,
            job_ttl_seconds,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
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
