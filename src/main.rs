use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use itertools::Itertools;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use mfa_context_gate::{
    Authentication, ConfigError, ContextValidator, InMemoryRegistry, RegisteredService,
    ValidatorConfig,
};

/// Check an authentication document against a requested MFA context.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Authentication document (JSON file with `principal` and `attributes`)
    authentication: PathBuf,
    /// Requested context identifier
    context: String,
    /// Provider catalog: JSON array of `{ "id": ... }` entries
    #[arg(long, env = "MFA_GATE_PROVIDERS")]
    providers: PathBuf,
    /// Validator configuration (JSON); defaults apply when omitted
    #[arg(long, env = "MFA_GATE_CONFIG")]
    config: Option<PathBuf>,
    /// Identifier of the service requesting the context
    #[arg(long)]
    service: Option<String>,
    /// Display name of that service, for log output
    #[arg(long, requires = "service")]
    service_name: Option<String>,
}

fn read_authentication(path: &Path) -> Result<Authentication, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Authentication::from_json(&raw).map_err(|source| ConfigError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    // Load configuration, falling back to defaults.
    let config = match &args.config {
        Some(path) => ValidatorConfig::from_path(path)?,
        None => ValidatorConfig::default(),
    };

    // Load the provider catalog and the authentication under test.
    let registry = InMemoryRegistry::from_path(&args.providers)?;
    let auth = read_authentication(&args.authentication)?;
    debug!(
        principal = %auth.principal,
        attributes = %auth.attribute_names().join(", "),
        "loaded authentication"
    );

    let service = args.service.as_deref().map(|id| RegisteredService {
        id: id.to_string(),
        name: args.service_name.clone(),
    });
    if let Some(service) = &service {
        debug!(service = %service.id, name = service.name.as_deref().unwrap_or("-"), "requesting service");
    }

    // Validate.
    let validator = ContextValidator::new(config, Arc::new(registry));
    debug!(config = ?validator.config(), "validator ready");
    let result = validator.validate(&auth, &args.context, service.as_ref())?;

    // Output result.
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result.is_satisfied())
}

fn main() -> ExitCode {
    // Log to stderr so stdout carries only the result.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments.
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        // Denied: distinct from a failure to evaluate.
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            error!("mfa-gate: {e}");
            ExitCode::FAILURE
        }
    }
}
