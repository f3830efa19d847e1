//! Ordered wire-parameter mapping shared by every encoder

use crate::error::{Result, SearchError};
use serde::Serialize;
use std::collections::btree_map::{BTreeMap, Iter};

/// Mapping of wire-parameter name to its encoded value
///
/// Absent parameters are never stored; clearing a parameter removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterBag {
    parameters: BTreeMap<String, String>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`
    ///
    /// Fails with `InvalidArgumentType` for an empty name and with
    /// `InvalidValue` when `value` is `None`.
    pub fn add<V: Into<String>>(&mut self, name: &str, value: Option<V>) -> Result<()> {
        check_name(name)?;
        let value = value.ok_or_else(|| {
            SearchError::InvalidValue(format!("parameter '{}' requires a value", name))
        })?;
        self.parameters.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Remove `name`; no-op when absent
    pub fn remove(&mut self, name: &str) -> Result<()> {
        check_name(name)?;
        self.parameters.remove(name);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, String> {
        self.parameters.iter()
    }

    /// Copy every entry of `other` into this bag, overwriting shared keys
    pub fn extend(&mut self, other: &ParameterBag) {
        for (name, value) in other.iter() {
            self.parameters.insert(name.clone(), value.clone());
        }
    }

    /// `name=value` pairs joined by `&`, unescaped; meant for logging
    pub fn to_query_string(&self) -> String {
        self.parameters
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub(crate) fn set(&mut self, name: &str, value: String) {
        self.parameters.insert(name.to_string(), value);
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SearchError::InvalidArgumentType(
            "parameter name must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

impl<'a> IntoIterator for &'a ParameterBag {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
