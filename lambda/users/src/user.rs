use serde::{Deserialize, Serialize};

/// A user record, keyed by `email` in the table.
///
/// The same shape is used on the wire and in the store. Missing fields
/// decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl User {
    #[cfg(test)]
    pub(crate) fn new(email: &str, first_name: &str, last_name: &str) -> Self {
        Self {
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}
