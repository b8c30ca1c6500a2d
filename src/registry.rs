//! Option registry: the canonical list of configurable options

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Key of the synthetic help entry in resolved output.
pub const HELP_KEY: &str = "help";

const DEFAULT_COMMAND_NAME: &str = "argconf";

/// One configurable option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptSpec {
    key: String,
    env: String,
    default_value: String,
    description: String,
}

impl OptSpec {
    /// CLI key, rendered as `--key` and used as the lookup key in resolved output
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Environment variable consulted for this option
    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Options a program accepts, with usage information for its help text.
///
/// Registration never touches the environment or the command line; the
/// registry is read-only input to resolution and can be resolved any number
/// of times.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    usage: String,
    about: String,
    options: Vec<OptSpec>,
    by_key: HashMap<String, usize>,
    by_env: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry.
    ///
    /// `usage` is the usage line shown in help output; its first word names the command.
    pub fn new(usage: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            about: about.into(),
            ..Self::default()
        }
    }

    /// Register an option, or update the default and description of an existing one.
    ///
    /// An existing key keeps its position and must keep its environment
    /// variable; an environment variable configures at most one key.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        env: impl Into<String>,
        default_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self> {
        let key = key.into();
        let env = env.into();
        validate_key(&key)?;
        if env.is_empty() {
            return Err(Error::EmptyEnvName { key });
        }

        if let Some(owner) = self.by_env.get(&env) {
            if *owner != key {
                return Err(Error::EnvNameTaken {
                    env,
                    owner: owner.clone(),
                    requested: key,
                });
            }
        }

        let spec = OptSpec {
            key: key.clone(),
            env: env.clone(),
            default_value: default_value.into(),
            description: description.into(),
        };

        match self.by_key.get(&key) {
            Some(&index) => {
                let previous = &self.options[index].env;
                if *previous != env {
                    return Err(Error::EnvNameChanged {
                        key,
                        previous: previous.clone(),
                        requested: env,
                    });
                }
                tracing::debug!(key = %key, "replacing registered option");
                self.options[index] = spec;
            }
            None => {
                self.by_key.insert(key.clone(), self.options.len());
                self.by_env.insert(env, key);
                self.options.push(spec);
            }
        }

        Ok(self)
    }

    /// By-value form of [`Registry::register`] for building a registry in one expression.
    pub fn option(
        mut self,
        key: impl Into<String>,
        env: impl Into<String>,
        default_value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        self.register(key, env, default_value, description)?;
        Ok(self)
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    /// Command name taken from the usage line.
    pub fn command_name(&self) -> &str {
        self.usage.split_whitespace().next().unwrap_or(DEFAULT_COMMAND_NAME)
    }

    /// Registered options in registration order
    pub fn options(&self) -> &[OptSpec] {
        &self.options
    }

    pub fn get(&self, key: &str) -> Option<&OptSpec> {
        self.by_key.get(key).map(|&index| &self.options[index])
    }

    /// CLI key configured by an environment variable
    pub fn key_for_env(&self, env: &str) -> Option<&str> {
        self.by_env.get(env).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.starts_with('-') {
        "key must not start with '-'"
    } else if key.contains('=') {
        "key must not contain '='"
    } else if key.chars().any(char::is_whitespace) {
        "key must not contain whitespace"
    } else if key == HELP_KEY {
        return Err(Error::ReservedKey(key.to_string()));
    } else {
        return Ok(());
    };

    Err(Error::InvalidKey {
        key: key.to_string(),
        reason,
    })
}
