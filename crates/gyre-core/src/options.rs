//! Immutable option sets parsed from command-line style strings.
//!
//! Every task in an ensemble is configured by the concatenation of a
//! *shared* option string (the process arguments) and a *private* one
//! (one line of an ensemble file). [`Options::compose`] re-parses that
//! concatenation per task, so no task ever observes another's options.
//!
//! # Grammar
//!
//! Tokens are separated by whitespace.
//!
//! - `-name=value` / `--name=value`: parameter. A later occurrence of
//!   the same name replaces an earlier one (last wins).
//! - `-name` / `--name`: flag.
//! - anything else (including negative numbers such as `-0.5`):
//!   positional argument.

use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};

use crate::error::ConfigError;

/// A parsed, read-only option set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    source: String,
    params: IndexMap<String, String>,
    flags: IndexSet<String>,
    positional: Vec<String>,
}

impl Options {
    /// Parse a whitespace-separated option string.
    ///
    /// ```
    /// use gyre_core::Options;
    ///
    /// let opts = Options::parse("-tfinal=1 -samples=10 -pxyz input.nc");
    /// assert_eq!(opts.get_or("tfinal", 0.0).unwrap(), 1.0);
    /// assert!(opts.flag("pxyz"));
    /// assert_eq!(opts.positional(0), Some("input.nc"));
    /// ```
    pub fn parse(line: &str) -> Self {
        let mut options = Options {
            source: line.split_whitespace().collect::<Vec<_>>().join(" "),
            ..Options::default()
        };
        for token in line.split_whitespace() {
            match split_option(token) {
                Some((name, Some(value))) => {
                    // Re-inserting keeps the first position but the last value.
                    options.params.insert(name.to_string(), value.to_string());
                }
                Some((name, None)) => {
                    options.flags.insert(name.to_string());
                }
                None => options.positional.push(token.to_string()),
            }
        }
        options
    }

    /// Parse an argument list (e.g. `std::env::args().skip(1)`).
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = args
            .into_iter()
            .map(|a| a.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self::parse(&joined)
    }

    /// Build a task's options: shared options first, private second,
    /// so private values override shared ones.
    pub fn compose(shared: &str, private: &str) -> Self {
        Self::parse(&format!("{shared} {private}"))
    }

    /// The normalised source string (tokens joined by single spaces).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `name` was given as a flag.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Whether `name` was given, as a flag or as a parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains(name) || self.params.contains_key(name)
    }

    /// Raw text of parameter `name`.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Typed value of parameter `name`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the text does not parse as `T`.
    pub fn get<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.params.get(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| ConfigError::InvalidValue {
                    option: name.to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Typed value of parameter `name`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] if the text does not parse as `T`.
    pub fn get_or<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        Ok(self.get(name)?.unwrap_or(default))
    }

    /// Typed value of a parameter that must be present.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingOption`] when absent, or
    /// [`ConfigError::InvalidValue`] when unparsable.
    pub fn require<T>(&self, name: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(name)?.ok_or_else(|| ConfigError::MissingOption {
            option: name.to_string(),
        })
    }

    /// Positional argument at `index`.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    /// Iterate over parameters in first-appearance order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split `-name[=value]` into its parts; `None` for positional tokens.
fn split_option(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))?;
    if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    match body.split_once('=') {
        Some((name, value)) => Some((name, Some(value))),
        None => Some((body, None)),
    }
}
