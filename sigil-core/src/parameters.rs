use crate::{BindError, Result};
use std::fmt::{self, Display};

/// Parameter names in placeholder order: entry `i` names the `?` at ordinal `i + 1`.
///
/// Names are not deduplicated, a name used twice holds two entries.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ParameterTable {
    names: Vec<String>,
}

impl ParameterTable {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
    /// Name of the placeholder at the 1-based `ordinal`.
    pub fn get(&self, ordinal: u64) -> Option<&str> {
        let index = usize::try_from(ordinal.checked_sub(1)?).ok()?;
        self.names.get(index).map(String::as_str)
    }
    /// 1-based ordinal of the first occurrence of `name`.
    pub fn position(&self, name: &str) -> Result<u64> {
        self.names
            .iter()
            .position(|v| v == name)
            .map(|i| i as u64 + 1)
            .ok_or_else(|| BindError::UnknownParameter(name.to_owned()).into())
    }
    /// 1-based ordinals of every occurrence of `name`.
    pub fn positions<'a>(&'a self, name: &'a str) -> impl Iterator<Item = u64> + 'a {
        self.names
            .iter()
            .enumerate()
            .filter(move |(_, v)| *v == name)
            .map(|(i, _)| i as u64 + 1)
    }
}

impl FromIterator<String> for ParameterTable {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParameterTable {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// One name per line.
impl Display for ParameterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for name in &self.names {
            writeln!(f, "{}", name)?;
        }
        Ok(())
    }
}
