//! Decision core of an MFA gate: given a completed authentication and a
//! requested context, report whether the requirement is already met and,
//! if not, why.

pub mod authentication;
pub mod bypass;
pub mod config;
pub mod errors;
pub mod extract;
pub mod registry;
pub mod validator;

pub use authentication::{AttributeValue, Authentication};
pub use bypass::BypassRecord;
pub use config::ValidatorConfig;
pub use errors::{ConfigError, RegistryError, Result, ValidateError};
pub use extract::extract_set;
pub use registry::{InMemoryRegistry, ProviderDescriptor, ProviderRegistry, RegisteredService};
pub use validator::{ContextValidator, Reason, ValidationResult};
