//! Command-line front end for the sample program

use anyhow::{bail, Result};
use argconf::{Registry, Resolved};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Options of the sample program.
pub fn registry() -> argconf::Result<Registry> {
    Registry::new("argconf [flags]", "Print the resolved configuration of a sample twelve-factor program")
        .option("log", "LOG", "/var/tmp/file.log", "Log file path")?
        .option("port", "PORT", "1234", "Port to listen on")?
        .option("data_dir", "DATA_DIR", "/var/tmp/dir", "Data directory")?
        .option("format", "ARGCONF_FORMAT", "json", "Output format: json or env")
}

pub fn run() -> Result<()> {
    // RUST_LOG in the environment always takes precedence; otherwise only warnings are shown.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .try_init();

    let registry = registry()?;
    let resolved = argconf::resolve(&registry, std::env::args().skip(1));
    if resolved.help_requested() {
        return Ok(());
    }
    if !resolved.operands().is_empty() {
        tracing::warn!("Ignoring positional arguments: {}", resolved.operands().join(" "));
    }

    print!("{}", render(&resolved)?);
    Ok(())
}

fn render(resolved: &Resolved) -> Result<String> {
    match resolved.value("format") {
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(resolved)?)),
        "env" => Ok(resolved.iter().map(|(key, value)| format!("{key}={value}\n")).collect()),
        other => bail!("Unsupported output format '{}' (expected json or env)", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argconf::MapEnv;

    fn resolve(env: &[(&str, &str)], args: &[&str]) -> Resolved {
        let registry = registry().expect("registry");
        argconf::Resolver::new(&registry)
            .env(MapEnv::from_pairs(env.iter().copied()))
            .print_help(false)
            .try_resolve(args.iter().copied())
            .expect("resolve")
    }

    #[test]
    fn test_render_env_lines() {
        let out = render(&resolve(&[("PORT", "8")], &["--format=env"])).expect("render");
        assert_eq!(out, "data_dir=/var/tmp/dir\nformat=env\nlog=/var/tmp/file.log\nport=8\n");
    }

    #[test]
    fn test_render_json_includes_help_marker() {
        let out = render(&resolve(&[], &[])).expect("render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json");
        assert_eq!(parsed["help"], "");
        assert_eq!(parsed["port"], "1234");
    }

    #[test]
    fn test_render_rejects_unknown_format() {
        let err = render(&resolve(&[("ARGCONF_FORMAT", "xml")], &[])).unwrap_err();
        assert!(err.to_string().contains("Unsupported output format 'xml'"));
    }
}
