//! Command-line flag parsing
//!
//! Resolution needs very little from an argument parser: declare a string
//! flag with a default and help text, parse tokens, and render usage text.
//! [`FlagParser`] is that contract; [`ClapFlags`] implements it with clap's
//! builder API, without adopting clap's subcommand model.

use std::collections::{BTreeMap, BTreeSet};

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use crate::error::Result;
use crate::registry::HELP_KEY;

// Not a valid option key, so it never collides with a registered flag.
const OPERANDS_ID: &str = "argconf operands";

/// Minimal argument-parser contract used by the resolver.
pub trait FlagParser {
    /// Declare a `--name <value>` flag taking exactly one string.
    fn register_string_flag(&mut self, name: &str, default: &str, help: &str);

    /// Parse tokens (program name excluded).
    fn parse(&mut self, tokens: &[String]) -> Result<FlagMatches>;

    /// Generated usage text.
    fn render_help(&self) -> String;
}

impl<P: FlagParser + ?Sized> FlagParser for &mut P {
    fn register_string_flag(&mut self, name: &str, default: &str, help: &str) {
        (**self).register_string_flag(name, default, help)
    }

    fn parse(&mut self, tokens: &[String]) -> Result<FlagMatches> {
        (**self).parse(tokens)
    }

    fn render_help(&self) -> String {
        (**self).render_help()
    }
}

/// Post-parse flag values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagMatches {
    values: BTreeMap<String, String>,
    explicit: BTreeSet<String>,
    operands: Vec<String>,
    help: bool,
}

impl FlagMatches {
    /// Value of a flag after parsing: the command-line value if given, else its default
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether the flag appeared on the command line
    pub fn is_explicit(&self, name: &str) -> bool {
        self.explicit.contains(name)
    }

    /// Positional arguments that are not flags
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Whether the parser saw its own help flag
    pub fn help(&self) -> bool {
        self.help
    }
}

/// [`FlagParser`] over clap.
///
/// Every flag takes one value (`--key value` or `--key=value`); a repeated
/// flag keeps its last value; values may begin with `-`. `-h`/`--help` is an
/// ordinary switch here, so asking for help never aborts parsing.
#[derive(Debug, Clone)]
pub struct ClapFlags {
    name: String,
    about: String,
    usage: String,
    flags: Vec<Arg>,
    names: Vec<String>,
}

impl ClapFlags {
    pub fn new(name: impl Into<String>, about: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            usage: usage.into(),
            flags: Vec::new(),
            names: Vec::new(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.name.clone())
            .no_binary_name(true)
            .disable_help_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new(HELP_KEY)
                    .short('h')
                    .long(HELP_KEY)
                    .help("Print help")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(OPERANDS_ID)
                    .value_name("ARGS")
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .hide(true),
            )
            .args(self.flags.iter().cloned());

        if !self.about.is_empty() {
            command = command.about(self.about.clone());
        }
        if !self.usage.trim().is_empty() {
            command = command.override_usage(self.usage.clone());
        }
        command
    }
}

impl FlagParser for ClapFlags {
    fn register_string_flag(&mut self, name: &str, default: &str, help: &str) {
        let mut arg = Arg::new(name.to_string())
            .long(name.to_string())
            .value_name("VALUE")
            .help(help.to_string())
            .num_args(1)
            .allow_hyphen_values(true)
            .action(ArgAction::Set);
        // An empty default would render as `[default: ]`.
        if !default.is_empty() {
            arg = arg.default_value(default.to_string());
        }
        self.flags.push(arg);
        self.names.push(name.to_string());
    }

    fn parse(&mut self, tokens: &[String]) -> Result<FlagMatches> {
        let matches = self.command().try_get_matches_from(tokens)?;

        let mut parsed = FlagMatches {
            help: matches.get_flag(HELP_KEY),
            operands: matches
                .get_many::<String>(OPERANDS_ID)
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            ..FlagMatches::default()
        };

        for name in &self.names {
            if let Some(value) = matches.get_one::<String>(name) {
                parsed.values.insert(name.clone(), value.clone());
            }
            if matches.value_source(name) == Some(ValueSource::CommandLine) {
                parsed.explicit.insert(name.clone());
            }
        }

        Ok(parsed)
    }

    fn render_help(&self) -> String {
        self.command().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn parser() -> ClapFlags {
        let mut flags = ClapFlags::new("testing", "Unit testing program", "testing [flags]");
        flags.register_string_flag("log", "/var/tmp/file.log", "Log file");
        flags.register_string_flag("port", "", "Listen port");
        flags
    }

    #[test]
    fn test_defaults_without_tokens() {
        let matches = parser().parse(&[]).expect("parse");
        assert_eq!(matches.value("log"), Some("/var/tmp/file.log"));
        assert_eq!(matches.value("port"), None);
        assert!(!matches.is_explicit("log"));
        assert!(!matches.help());
    }

    #[test]
    fn test_equals_and_separate_value_forms() {
        let matches = parser().parse(&tokens(&["--log=2", "--port", "-1"])).expect("parse");
        assert_eq!(matches.value("log"), Some("2"));
        assert_eq!(matches.value("port"), Some("-1"));
        assert!(matches.is_explicit("port"));
    }

    #[test]
    fn test_repeated_flag_keeps_last_value() {
        let matches = parser().parse(&tokens(&["--port=1", "--port=2"])).expect("parse");
        assert_eq!(matches.value("port"), Some("2"));
    }

    #[test]
    fn test_explicit_empty_value_is_reported_as_empty() {
        let matches = parser().parse(&tokens(&["--log="])).expect("parse");
        assert_eq!(matches.value("log"), Some(""));
        assert!(matches.is_explicit("log"));
    }

    #[test]
    fn test_help_flag_does_not_abort_parsing() {
        let matches = parser().parse(&tokens(&["--log=2", "-h"])).expect("parse");
        assert!(matches.help());
        assert_eq!(matches.value("log"), Some("2"));
    }

    #[test]
    fn test_operands_are_collected() {
        let matches = parser().parse(&tokens(&["--port=1", "--", "a", "--log=x"])).expect("parse");
        assert_eq!(matches.operands(), ["a".to_string(), "--log=x".to_string()]);
        assert_eq!(matches.value("log"), Some("/var/tmp/file.log"));
    }

    #[test]
    fn test_unknown_flag_is_a_parse_error() {
        let err = parser().parse(&tokens(&["--nope=1"])).unwrap_err();
        assert!(matches!(err, Error::Parse(ref e) if e.kind() == clap::error::ErrorKind::UnknownArgument));
    }

    #[test]
    fn test_missing_value_is_a_parse_error() {
        assert!(parser().parse(&tokens(&["--log"])).is_err());
    }

    #[test]
    fn test_render_help_lists_flags() {
        let help = parser().render_help();
        assert!(help.contains("Unit testing program"));
        assert!(help.contains("testing [flags]"));
        assert!(help.contains("--log <VALUE>"));
        assert!(help.contains("Log file"));
        assert!(help.contains("/var/tmp/file.log"));
    }
}
