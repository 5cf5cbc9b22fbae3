//! Bill profiles: which password unlocks a bill and how many of its leading
//! pages are worth keeping.

use std::fmt;

use tracing::debug;

use crate::error::TrimError;

/// Known bill types as `(identifier, password variable, pages to keep)`.
pub const KNOWN_BILLS: &[(&str, &str, u32)] = &[
    ("airtel_mobile", "AIRTEL_MOBILE_PASSWORD", 4),
    ("jio_mobile", "JIO_MOBILE_PASSWORD", 5),
    ("jio_fiber", "JIO_FIBER_PASSWORD", 5),
];

#[derive(Clone)]
pub struct BillProfile {
    pub identifier: &'static str,
    pub password_var: &'static str,
    pub pages_to_keep: u32,
    password: String,
}

impl BillProfile {
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for BillProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BillProfile")
            .field("identifier", &self.identifier)
            .field("password_var", &self.password_var)
            .field("pages_to_keep", &self.pages_to_keep)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Every known bill profile, with passwords resolved.
///
/// Built once at startup and handed to [`crate::trim_bill`] by reference.
#[derive(Debug, Clone)]
pub struct Profiles {
    profiles: Vec<BillProfile>,
}

impl Profiles {
    /// Reads every password variable from the process environment.
    pub fn from_env() -> Result<Self, TrimError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolves passwords through `lookup`, failing on the first variable it
    /// cannot find.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, TrimError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut profiles = Vec::with_capacity(KNOWN_BILLS.len());

        for &(identifier, password_var, pages_to_keep) in KNOWN_BILLS {
            let password = lookup(password_var).ok_or(TrimError::MissingPassword {
                var: password_var,
                bill_type: identifier,
            })?;
            debug!("loaded profile {identifier} (keeps {pages_to_keep} pages)");

            profiles.push(BillProfile {
                identifier,
                password_var,
                pages_to_keep,
                password,
            });
        }

        Ok(Profiles { profiles })
    }

    /// Exact match first, then ASCII case-insensitive.
    pub fn get(&self, bill_type: &str) -> Result<&BillProfile, TrimError> {
        self.profiles
            .iter()
            .find(|p| p.identifier == bill_type)
            .or_else(|| {
                self.profiles
                    .iter()
                    .find(|p| p.identifier.eq_ignore_ascii_case(bill_type))
            })
            .ok_or_else(|| TrimError::UnknownBillType {
                name: bill_type.to_string(),
                known: self.identifiers().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.iter().map(|p| p.identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BillProfile> {
        self.profiles.iter()
    }
}
