use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

use crate::authentication::Authentication;
use crate::errors::Result;
use crate::extract::{extract_flag, extract_text_set};

/// Evidence that a factor was skipped on purpose. It never counts as proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BypassRecord {
    /// Contexts named as bypassed. Empty means the target was not recorded.
    pub bypassed: BTreeSet<String>,
}

impl BypassRecord {
    pub fn is_unspecified(&self) -> bool {
        self.bypassed.is_empty()
    }

    pub fn covers(&self, context_id: &str) -> bool {
        self.bypassed.contains(context_id)
    }
}

impl fmt::Display for BypassRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unspecified() {
            f.write_str("bypassed (target unspecified)")
        } else {
            write!(f, "bypassed [{}]", self.bypassed.iter().join(", "))
        }
    }
}

/// Read the bypass flag and the bypassed-provider attribute together.
///
/// A record is returned only when the flag is present and true. The provider
/// attribute is validated even when the flag is off.
pub fn inspect(
    auth: &Authentication,
    flag_attribute: &str,
    provider_attribute: &str,
) -> Result<Option<BypassRecord>> {
    let flag = extract_flag(auth, flag_attribute)?;
    let bypassed = extract_text_set(auth, provider_attribute)?;
    Ok(match flag {
        Some(true) => Some(BypassRecord { bypassed }),
        _ => None,
    })
}
