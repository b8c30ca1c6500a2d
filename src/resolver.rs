//! Precedence resolution: command line over environment over defaults
//!
//! Each layer only overrides the one below it with a non-empty value, so an
//! unset variable, a variable set to `""` and an explicit `--key=` all leave
//! the lower layer's value in place.

use std::collections::BTreeMap;

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{Error, Result};
use crate::flags::{ClapFlags, FlagParser};
use crate::registry::Registry;
use crate::resolved::{Resolved, Source};

/// Resolves a [`Registry`] against an environment and an argument list.
///
/// The registry is only read, so one registry can be resolved any number of
/// times, from any thread.
#[derive(Debug, Clone)]
pub struct Resolver<'a, E = ProcessEnv> {
    registry: &'a Registry,
    env: E,
    detect_help: bool,
    print_help: bool,
}

impl<'a> Resolver<'a> {
    /// Resolver reading the process environment, with help detection and help printing on.
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            env: ProcessEnv,
            detect_help: true,
            print_help: true,
        }
    }
}

impl<'a, E: EnvSource> Resolver<'a, E> {
    /// Read environment variables from `env` instead of the process environment
    pub fn env<F: EnvSource>(self, env: F) -> Resolver<'a, F> {
        Resolver {
            registry: self.registry,
            env,
            detect_help: self.detect_help,
            print_help: self.print_help,
        }
    }

    /// Set whether to report `--help`/`-h` under the synthetic `help` key
    pub fn detect_help(mut self, detect: bool) -> Self {
        self.detect_help = detect;
        self
    }

    /// Set whether to write usage text to stdout when help is requested
    pub fn print_help(mut self, print: bool) -> Self {
        self.print_help = print;
        self
    }

    /// Resolve, printing the usage error and exiting the process on a malformed command line.
    pub fn resolve<I, T>(&self, args: I) -> Resolved
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.try_resolve(args).unwrap_or_else(|err| match err {
            Error::Parse(err) => err.exit(),
            other => unreachable!("registered options cannot fail resolution: {other}"),
        })
    }

    /// Resolve, returning malformed command lines as [`Error::Parse`].
    pub fn try_resolve<I, T>(&self, args: I) -> Result<Resolved>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let registry = self.registry;
        let parser = ClapFlags::new(registry.command_name(), registry.about(), registry.usage());
        self.resolve_with(parser, args)
    }

    /// Resolve using a caller-supplied argument parser.
    pub fn resolve_with<P, I, T>(&self, mut parser: P, args: I) -> Result<Resolved>
    where
        P: FlagParser,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let options = self.registry.options();
        tracing::trace!(options = options.len(), args = args.len(), "resolving options");

        let mut values = BTreeMap::new();
        let mut sources = BTreeMap::new();
        for opt in options {
            values.insert(opt.key().to_string(), opt.default_value().to_string());
            sources.insert(opt.key().to_string(), Source::Default);
        }

        for opt in options {
            let Some(value) = self.env.get(opt.env()).filter(|v| !v.is_empty()) else {
                continue;
            };
            tracing::debug!(key = opt.key(), env = opt.env(), "option set from environment");
            values.insert(opt.key().to_string(), value);
            sources.insert(opt.key().to_string(), Source::Environment);
        }

        for opt in options {
            let seeded = values.get(opt.key()).map(String::as_str).unwrap_or_default();
            parser.register_string_flag(opt.key(), seeded, opt.description());
        }
        let matches = parser.parse(&args)?;

        for opt in options {
            let Some(value) = matches.value(opt.key()).filter(|v| !v.is_empty()) else {
                continue;
            };
            if matches.is_explicit(opt.key()) {
                tracing::debug!(key = opt.key(), "option set from command line");
                sources.insert(opt.key().to_string(), Source::CommandLine);
            }
            values.insert(opt.key().to_string(), value.to_string());
        }

        let help_flag = args.iter().any(|arg| arg == "--help" || arg == "-h");
        let help_text = if help_flag || matches.help() {
            let text = parser.render_help();
            if self.print_help {
                println!("{}", text.trim_end());
            }
            Some(text)
        } else {
            None
        };

        tracing::trace!(help = help_flag, "options resolved");
        Ok(Resolved {
            values,
            sources,
            operands: matches.operands().to_vec(),
            help: self.detect_help.then_some(help_flag),
            help_text,
        })
    }
}

/// Resolve `args` against the process environment.
///
/// A malformed command line prints a usage error and exits the process.
pub fn resolve<I, T>(registry: &Registry, args: I) -> Resolved
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    Resolver::new(registry).resolve(args)
}

/// Resolve `args` against `env` without terminating on malformed input.
pub fn try_resolve<E, I, T>(registry: &Registry, env: E, args: I) -> Result<Resolved>
where
    E: EnvSource,
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    Resolver::new(registry).env(env).try_resolve(args)
}
