//! services/app/src/ui/form.rs
//!
//! Field-keyed validation errors shared by the auth and ticket forms.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    Title,
    Status,
    Priority,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Title => "title",
            Self::Status => "status",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An empty map means the form is valid.
pub type FormErrors = BTreeMap<Field, String>;
