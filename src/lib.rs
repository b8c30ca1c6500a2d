//! argconf: twelve-factor option resolution for single-command programs
//!
//! Options are registered with a CLI key, an environment variable, a default
//! and help text. Resolution layers the three sources with fixed precedence,
//! highest first:
//!
//! 1. `--key value` / `--key=value` on the command line
//! 2. the option's environment variable
//! 3. the registered default
//!
//! Empty values never override: an unset variable, a variable set to `""` and
//! an explicit `--key=` all fall through to the next layer. Every value is a
//! string; callers parse further as needed.
//!
//! ```no_run
//! use argconf::Registry;
//!
//! let registry = Registry::new("server [flags]", "Sample server")
//!     .option("port", "PORT", "8080", "Listen port")?;
//! let resolved = argconf::resolve(&registry, std::env::args().skip(1));
//! if !resolved.help_requested() {
//!     println!("listening on {}", resolved.value("port"));
//! }
//! # Ok::<(), argconf::Error>(())
//! ```

pub mod env;
pub mod error;
pub mod flags;
pub mod registry;
pub mod resolved;
pub mod resolver;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{Error, Result};
pub use flags::{ClapFlags, FlagMatches, FlagParser};
pub use registry::{OptSpec, Registry, HELP_KEY};
pub use resolved::{Resolved, Source, HELP_SENTINEL};
pub use resolver::{resolve, try_resolve, Resolver};
