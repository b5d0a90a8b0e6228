//! Vocabulary registration and canonicalization
//!
//! An entity category is a named set of accepted words, for example the commands or the
//! attribute names a grammar's client understands. [Entities::canonicalize] maps user input
//! onto one of them, accepting unambiguous abbreviations.

use std::collections::BTreeMap;

use crate::rat::config::EntityConfig;
use crate::rat::error::EntityError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entities {
    categories: BTreeMap<String, Vec<String>>,
    min_abbreviation: usize,
}

impl Entities {
    pub fn new() -> Self {
        Self::with_config(EntityConfig::default())
    }

    pub fn with_config(config: EntityConfig) -> Self {
        Self::with_min_abbreviation(config.min_abbreviation)
    }

    pub fn with_min_abbreviation(min_abbreviation: usize) -> Self {
        Entities {
            categories: BTreeMap::new(),
            min_abbreviation,
        }
    }

    pub fn min_abbreviation(&self) -> usize {
        self.min_abbreviation
    }

    /// Register `name` under `category`. Registering the same name twice has no effect.
    pub fn entity(&mut self, category: &str, name: &str) {
        let names = self.categories.entry(category.to_string()).or_default();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    /// Names registered under `category`, in registration order
    pub fn names(&self, category: &str) -> &[String] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve `value` to a registered name.
    ///
    /// An exact match wins. Otherwise `value` is treated as an abbreviation: it must be at
    /// least `min_abbreviation` characters long and a prefix of exactly one name.
    pub fn canonicalize(&self, category: &str, value: &str) -> Result<String, EntityError> {
        let not_found = || EntityError::NotFound {
            category: category.to_string(),
            value: value.to_string(),
        };

        let names = self.names(category);
        if names.iter().any(|n| n == value) {
            return Ok(value.to_string());
        }

        if value.is_empty() || value.chars().count() < self.min_abbreviation {
            return Err(not_found());
        }

        let mut candidates = names.iter().filter(|n| n.starts_with(value));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => {
                log::trace!("canonicalized '{}' to '{}' in '{}'", value, only, category);
                Ok(only.clone())
            }
            _ => Err(not_found()),
        }
    }
}

impl Default for Entities {
    fn default() -> Self {
        Self::new()
    }
}
