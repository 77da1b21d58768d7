//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::crypto::generate_secret;
use crate::auth::{AuthError, JwtConfig, JwtManager, Role, TokenAuthority};
use crate::config::{LogFormat, ServiceConfig};
use crate::http_server::HttpServer;
use crate::moderation::ModerationService;
use crate::store::{Database, FileStore, MemoryStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse CLI arguments and run the command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Start { config, port } => start(&config, port),
        Command::Token { role, config } => token(&config, &role),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Install the global tracing subscriber
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => fmt().with_env_filter(filter).json().try_init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing init failed: {}", e);
    }
}

/// Build the token authority from config, generating a secret when none is set
pub fn build_authority(config: &ServiceConfig) -> JwtManager {
    let secret = config.jwt_secret.clone().unwrap_or_else(generate_secret);

    JwtManager::new(JwtConfig::new(secret, config.token_ttl_hours))
}

/// Wire store and token authority into a service
pub fn build_service(config: &ServiceConfig) -> CliResult<ModerationService> {
    let store: Arc<dyn Database> = match &config.data_file {
        Some(path) => {
            let store = FileStore::open(path)?;
            info!(path = %path.display(), "using file store");
            Arc::new(store)
        }
        None => {
            info!("using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    Ok(ModerationService::new(store, Arc::new(build_authority(config))))
}

/// Start the HTTP server
pub fn start(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServiceConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }
    config.validate()?;

    init_tracing(config.log_format);
    info!(config = %config_path.display(), "starting service");
    if config.jwt_secret.is_none() {
        warn!("no jwt_secret configured; tokens will not survive a restart");
    }

    let service = build_service(&config)?;
    let server = HttpServer::new(config, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print a token for `role`
pub fn token(config_path: &Path, role: &str) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;
    if config.jwt_secret.is_none() {
        return Err(CliError::config_error(
            "jwt_secret must be configured to issue tokens offline",
        ));
    }

    let role: Role = role
        .parse()
        .map_err(|e: AuthError| CliError::token_error(e.to_string()))?;
    let token = build_authority(&config)
        .issue(role)
        .map_err(|e| CliError::token_error(e.to_string()))?;

    println!("{}", token);
    Ok(())
}

/// Validate the configuration and report the effective settings
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;
    if let Some(path) = &config.data_file {
        FileStore::open(path)?;
    }

    println!("{}", serde_json::to_string_pretty(&redacted(&config)).map_err(|e| {
        CliError::config_error(e.to_string())
    })?);
    Ok(())
}

fn redacted(config: &ServiceConfig) -> ServiceConfig {
    ServiceConfig {
        jwt_secret: config.jwt_secret.as_ref().map(|_| "<redacted>".to_string()),
        ..config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_service_with_file_store() {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig {
            jwt_secret: Some("cli-test".to_string()),
            data_file: Some(dir.path().join("state.json")),
            ..ServiceConfig::default()
        };

        let service = build_service(&config).unwrap();
        let token = service.dummy_login(Role::Moderator).unwrap();
        assert!(service.guard().require_moderator(Some(&token)).is_ok());
    }

    #[test]
    fn test_missing_secret_is_generated_per_authority() {
        let config = ServiceConfig::default();

        let token = build_authority(&config).issue(Role::Client).unwrap();
        assert!(build_authority(&config).decode(&token).is_err());
    }

    #[test]
    fn test_configured_secret_is_stable() {
        let config = ServiceConfig {
            jwt_secret: Some("stable".to_string()),
            ..ServiceConfig::default()
        };

        let token = build_authority(&config).issue(Role::Client).unwrap();
        assert_eq!(build_authority(&config).decode(&token).unwrap(), Role::Client);
    }

    #[test]
    fn test_token_requires_configured_secret() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flatmod.json");
        fs::write(&path, "{}").unwrap();

        assert!(token(&path, "client").is_err());
    }

    #[test]
    fn test_token_rejects_unknown_role() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flatmod.json");
        fs::write(&path, r#"{"jwt_secret": "x"}"#).unwrap();

        let err = token(&path, "admin").unwrap_err();
        assert_eq!(err.code(), &crate::cli::CliErrorCode::TokenError);
    }

    #[test]
    fn test_redacted_hides_secret() {
        let config = ServiceConfig {
            jwt_secret: Some("hunter2".to_string()),
            ..ServiceConfig::default()
        };
        assert_eq!(redacted(&config).jwt_secret.as_deref(), Some("<redacted>"));
    }
}
