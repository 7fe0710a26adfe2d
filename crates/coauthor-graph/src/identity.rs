//! Canonical author identities.
//!
//! Every author name coming out of PubMed or arXiv is folded into a single
//! `"Surname, Forename"` key. Two records describe the same author iff their
//! keys are byte-equal; there is no fuzzy matching.

use std::fmt;
use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Separator between surname and forename inside an identity key.
const SEPARATOR: &str = ", ";

/// A single capital letter at the end of a forename, e.g. the "A" in "John A".
static TRAILING_INITIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [A-Z]$").expect("valid trailing initial regex"));

/// Normalized `"Surname, Forename"` author key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Build an identity from a raw forename and surname.
    ///
    /// Both parts are transliterated to ASCII. The forename additionally has
    /// hyphens turned into spaces and any trailing middle initials removed.
    #[must_use]
    pub fn from_parts(forename: &str, surname: &str) -> Self {
        let surname = normalize_surname(surname);
        let forename = normalize_forename(forename);
        Self(format!("{surname}{SEPARATOR}{forename}"))
    }

    /// Re-normalize an identity key (or anything shaped like one).
    ///
    /// Text without a `", "` separator is treated as a bare surname.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        match key.split_once(SEPARATOR) {
            Some((surname, forename)) => Self::from_parts(forename, surname),
            None => Self::from_parts("", key),
        }
    }

    /// The identity key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Surname part of the key.
    #[must_use]
    pub fn surname(&self) -> &str {
        self.0.split_once(SEPARATOR).map_or(self.0.as_str(), |(surname, _)| surname)
    }

    /// Forename part of the key (may be empty).
    #[must_use]
    pub fn forename(&self) -> &str {
        self.0.split_once(SEPARATOR).map_or("", |(_, forename)| forename)
    }

    /// Both name parts are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.surname().is_empty() && !self.forename().is_empty()
    }

    /// Human-readable `"Forename Surname"` form used in node and edge tables.
    #[must_use]
    pub fn display_name(&self) -> String {
        let forename = self.forename();
        if forename.is_empty() {
            self.surname().to_string()
        } else {
            format!("{forename} {}", self.surname())
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn normalize_surname(surname: &str) -> String {
    deunicode(surname).trim().to_string()
}

fn normalize_forename(forename: &str) -> String {
    let mut forename = deunicode(forename).replace('-', " ").trim().to_string();

    // Strip until stable so that "John A B" and "John A" both land on "John".
    loop {
        let trimmed_len = forename.trim_end().len();
        forename.truncate(trimmed_len);
        match TRAILING_INITIAL.find(&forename) {
            Some(m) => forename.truncate(m.start()),
            None => break,
        }
    }

    forename
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_basic() {
        let id = Identity::from_parts("Seth", "Rhoades");
        assert_eq!(id.as_str(), "Rhoades, Seth");
        assert_eq!(id.surname(), "Rhoades");
        assert_eq!(id.forename(), "Seth");
        assert_eq!(id.display_name(), "Seth Rhoades");
    }

    #[test]
    fn test_diacritics_removed() {
        let id = Identity::from_parts("Albert-László", "Barabási");
        assert_eq!(id.as_str(), "Barabasi, Albert Laszlo");
    }

    #[test]
    fn test_middle_initial_stripped() {
        assert_eq!(Identity::from_parts("James E", "Rothman").as_str(), "Rothman, James");
        assert_eq!(Identity::from_parts("Randy W", "Schekman").as_str(), "Schekman, Randy");
    }

    #[test]
    fn test_lowercase_trailing_letter_kept() {
        assert_eq!(Identity::from_parts("Jo a", "Smith").as_str(), "Smith, Jo a");
    }

    #[test]
    fn test_single_letter_forename_kept() {
        assert_eq!(Identity::from_parts("J", "Smith").as_str(), "Smith, J");
    }

    #[test]
    fn test_surname_hyphen_kept() {
        let id = Identity::from_parts("Maria", "Garcia-Lopez");
        assert_eq!(id.surname(), "Garcia-Lopez");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let id = Identity::from_parts("Jean-Pierre K", "Müller");
        assert_eq!(Identity::parse(id.as_str()), id);
    }

    #[test]
    fn test_parse_bare_surname() {
        let id = Identity::parse("Consortium");
        assert_eq!(id.surname(), "Consortium");
        assert_eq!(id.forename(), "");
        assert!(!id.is_complete());
        assert_eq!(id.display_name(), "Consortium");
    }

    #[test]
    fn test_empty_inputs() {
        let id = Identity::from_parts("", "");
        assert_eq!(id.as_str(), ", ");
        assert!(!id.is_complete());
    }

    #[test]
    fn test_serde_transparent() {
        let id = Identity::from_parts("Seth", "Rhoades");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"Rhoades, Seth\"");
    }
}
