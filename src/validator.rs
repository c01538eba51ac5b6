use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::authentication::Authentication;
use crate::bypass;
use crate::config::ValidatorConfig;
use crate::errors::{Result, ValidateError};
use crate::extract::extract_set;
use crate::registry::{ProviderDescriptor, ProviderRegistry, RegisteredService};

/// Why a validation ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    /// The open sentinel was requested; nothing to prove.
    Open,
    /// The session completed the requested context itself.
    ContextSatisfied,
    /// The requested context is trusted from an earlier proof.
    TrustedContext,
    /// No provider is registered for the requested context.
    UnknownContext,
    /// No evidence of proof or trust.
    ContextNotSatisfied,
    /// The requested context was administratively skipped.
    ContextBypassed,
}

impl Reason {
    pub fn is_satisfied(self) -> bool {
        matches!(self, Self::Open | Self::ContextSatisfied | Self::TrustedContext)
    }

    /// Stable code for audit trails.
    pub fn code(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::ContextSatisfied => "CONTEXT_SATISFIED",
            Self::TrustedContext => "TRUSTED_CONTEXT",
            Self::UnknownContext => "UNKNOWN_CONTEXT",
            Self::ContextNotSatisfied => "CONTEXT_NOT_SATISFIED",
            Self::ContextBypassed => "CONTEXT_BYPASSED",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of one validation. `satisfied` always agrees with `reason`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    satisfied: bool,
    reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<ProviderDescriptor>,
}

impl ValidationResult {
    fn open() -> Self {
        Self { satisfied: true, reason: Reason::Open, provider: None }
    }

    fn satisfied(reason: Reason, provider: ProviderDescriptor) -> Self {
        debug_assert!(reason.is_satisfied());
        Self { satisfied: true, reason, provider: Some(provider) }
    }

    fn denied(reason: Reason) -> Self {
        debug_assert!(!reason.is_satisfied());
        Self { satisfied: false, reason, provider: None }
    }

    pub fn is_satisfied(&self) -> bool { self.satisfied }

    pub fn reason(&self) -> Reason { self.reason }

    /// The provider the requirement was matched against, when satisfied
    /// through it.
    pub fn provider(&self) -> Option<&ProviderDescriptor> { self.provider.as_ref() }
}

/// Decides whether an authentication already meets a requested MFA context.
#[derive(Clone)]
pub struct ContextValidator {
    config: ValidatorConfig,
    registry: Arc<dyn ProviderRegistry>,
}

impl fmt::Debug for ContextValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextValidator").field("config", &self.config).finish_non_exhaustive()
    }
}

impl ContextValidator {
    pub fn new(config: ValidatorConfig, registry: Arc<dyn ProviderRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &ValidatorConfig { &self.config }

    /// Evaluate `requested` against `auth`.
    ///
    /// Checks run in a fixed order and the first match wins: open sentinel,
    /// provider lookup, proven contexts, trusted contexts, then the bypass
    /// guard which only picks the failure reason. The only error is a
    /// malformed attribute.
    pub fn validate(
        &self,
        auth: &Authentication,
        requested: &str,
        service: Option<&RegisteredService>,
    ) -> Result<ValidationResult> {
        let cfg = &self.config;
        if requested == cfg.open_context {
            debug!(principal = %auth.principal, "open context requested");
            return Ok(ValidationResult::open());
        }

        let Some(provider) = self.resolve(requested, service) else {
            debug!(principal = %auth.principal, requested, "no provider for requested context");
            return Ok(ValidationResult::denied(Reason::UnknownContext));
        };

        let proven = extract_set(auth, &cfg.proven_attribute).inspect_err(|e| malformed(auth, e))?;
        if proven.contains(requested) {
            debug!(principal = %auth.principal, requested, "context proven in session");
            return Ok(ValidationResult::satisfied(Reason::ContextSatisfied, provider));
        }

        let trusted = extract_set(auth, &cfg.trusted_attribute).inspect_err(|e| malformed(auth, e))?;
        if trusted.contains(requested) {
            debug!(principal = %auth.principal, requested, "context satisfied by trust");
            return Ok(ValidationResult::satisfied(Reason::TrustedContext, provider));
        }

        let record = bypass::inspect(auth, &cfg.bypass_flag_attribute, &cfg.bypass_provider_attribute)
            .inspect_err(|e| malformed(auth, e))?;
        match record {
            Some(record) if record.covers(requested) => {
                debug!(principal = %auth.principal, requested, %record, "requested context was bypassed");
                Ok(ValidationResult::denied(Reason::ContextBypassed))
            }
            _ => {
                debug!(principal = %auth.principal, requested, "context not satisfied");
                Ok(ValidationResult::denied(Reason::ContextNotSatisfied))
            }
        }
    }

    fn resolve(
        &self,
        requested: &str,
        service: Option<&RegisteredService>,
    ) -> Option<ProviderDescriptor> {
        if requested.is_empty() {
            return None;
        }
        match self.registry.find_provider_for_service(requested, service) {
            Ok(found) => found,
            Err(err) => {
                warn!(requested, error = %err, "provider lookup failed; treating as unknown");
                None
            }
        }
    }
}

fn malformed(auth: &Authentication, error: &ValidateError) {
    warn!(principal = %auth.principal, %error, "rejecting malformed authentication attribute");
}
