//! Form capture and validation
//!
//! A [`FormData`] is the record behind one open modal. Fields are written
//! one at a time without checks; [`validate`] applies the two submit rules.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::WanderLensError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A named form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Travelers,
    Message,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Travelers => "travelers",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = WanderLensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "phone" => Ok(Field::Phone),
            "travelers" => Ok(Field::Travelers),
            "message" => Ok(Field::Message),
            other => Err(WanderLensError::validation(format!("unknown form field '{other}'"))),
        }
    }
}

/// Which modal a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contact,
    Booking,
}

impl FormKind {
    /// Fields the form shows, in display order
    pub fn fields(self) -> &'static [Field] {
        match self {
            FormKind::Contact => &[Field::Name, Field::Email, Field::Phone, Field::Message],
            FormKind::Booking => &[
                Field::Name,
                Field::Email,
                Field::Phone,
                Field::Travelers,
                Field::Message,
            ],
        }
    }

    /// Fields that must be non-blank on submit
    pub fn required(self) -> &'static [Field] {
        match self {
            FormKind::Contact => &[Field::Name, Field::Email, Field::Message],
            FormKind::Booking => &[Field::Name, Field::Email, Field::Phone, Field::Travelers],
        }
    }

    pub fn accepts(self, field: Field) -> bool {
        self.fields().contains(&field)
    }
}

/// Field values of one open form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormData {
    kind: FormKind,
    values: BTreeMap<Field, String>,
}

impl FormData {
    /// An empty record for the given form
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Overwrite one field. Fields outside the form's shape are rejected.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), WanderLensError> {
        if !self.kind.accepts(field) {
            return Err(WanderLensError::validation(format!(
                "the {:?} form has no '{field}' field",
                self.kind
            )));
        }
        self.values.insert(field, value.into());
        Ok(())
    }

    /// Value of a field, empty when never set
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// True when every field is empty
    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    /// Reset every field to empty
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Fill from submitted input names. Unknown names are ignored.
    pub fn from_pairs<'a, I>(kind: FormKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut data = Self::new(kind);
        for (name, value) in pairs {
            if let Ok(field) = name.parse::<Field>() {
                if kind.accepts(field) {
                    data.values.insert(field, value.to_string());
                }
            }
        }
        data
    }
}

/// True when `email` looks like `local@domain.tld`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Check that `required` fields are non-blank, then the email shape.
///
/// The email rule only applies when the record has an email field.
pub fn validate(record: &FormData, required: &[Field]) -> Result<(), WanderLensError> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|field| record.get(**field).trim().is_empty())
        .map(|field| field.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(WanderLensError::missing_fields(missing));
    }

    if record.kind().accepts(Field::Email) {
        let email = record.get(Field::Email);
        if !is_valid_email(email) {
            return Err(WanderLensError::invalid_email(email));
        }
    }

    Ok(())
}
