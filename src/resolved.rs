//! Resolved configuration returned by the resolver

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::registry::HELP_KEY;

/// Value stored under the `help` key when help was requested.
pub const HELP_SENTINEL: &str = "help";

/// Layer an option's final value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Default,
    Environment,
    CommandLine,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Default => "default",
            Source::Environment => "environment",
            Source::CommandLine => "command line",
        };
        f.write_str(name)
    }
}

/// Final option values for one invocation.
///
/// Immutable once built, so it can be shared freely across threads.
/// Serializes as the flat key → value map returned by [`Resolved::to_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub(crate) values: BTreeMap<String, String>,
    pub(crate) sources: BTreeMap<String, Source>,
    pub(crate) operands: Vec<String>,
    /// `None` when help detection is disabled.
    pub(crate) help: Option<bool>,
    pub(crate) help_text: Option<String>,
}

impl Resolved {
    /// Value of a registered option.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of an option, or `""` for unknown keys.
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    pub fn source(&self, key: &str) -> Option<Source> {
        self.sources.get(key).copied()
    }

    /// Whether `--help` or `-h` appeared among the arguments.
    ///
    /// Always false when help detection is disabled.
    pub fn help_requested(&self) -> bool {
        self.help.unwrap_or(false)
    }

    /// Usage text generated by the argument parser, present when help was requested
    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    /// Positional arguments left over after flag parsing
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Registered options and their values, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flat key → value map, including the synthetic `help` entry when help detection is on.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.clone().into_map()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        let mut map = self.values;
        if let Some(help) = self.help {
            let marker = if help { HELP_SENTINEL } else { "" };
            map.insert(HELP_KEY.to_string(), marker.to_string());
        }
        map
    }
}

impl Serialize for Resolved {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.to_map())
    }
}
