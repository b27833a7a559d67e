mod commands;
mod ops;
mod reports;

use std::{ffi::OsString, process::ExitCode};

use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

use crate::commands::Cli;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GOSB_LOG";

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse_from(go_style_args(std::env::args_os()));
    init_tracing(cli.verbose);

    match cli.run() {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(report) => match report.downcast::<gosb_analyzer::Error>() {
            Ok(err) => {
                eprintln!("{:?}", miette::Report::new(err));
                Ok(ExitCode::FAILURE)
            }
            Err(report) => Err(report),
        },
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Rewrite Go flag spelling (`-source=input.go`) to the long form clap
/// expects, so `//go:generate gosb -source=input.go` works unchanged.
fn go_style_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(text) if is_go_style_flag(text) => OsString::from(format!("-{text}")),
            _ => arg,
        })
        .collect()
}

fn is_go_style_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    commands::LONG_FLAGS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(args: &[&str]) -> Vec<String> {
        go_style_args(args.iter().map(OsString::from))
            .into_iter()
            .map(|arg| arg.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_go_style_flags_are_rewritten() {
        assert_eq!(
            rewrite(&["gosb", "-source=input.go", "-features=ptr,arr"]),
            vec!["gosb", "--source=input.go", "--features=ptr,arr"]
        );
        assert_eq!(
            rewrite(&["gosb", "-source", "input.go", "-dry-run"]),
            vec!["gosb", "--source", "input.go", "--dry-run"]
        );
    }

    #[test]
    fn test_other_args_are_untouched() {
        assert_eq!(
            rewrite(&["gosb", "--source=input.go", "-vv", "-v", "-"]),
            vec!["gosb", "--source=input.go", "-vv", "-v", "-"]
        );
    }
}
