mod generate;

use clap::Parser;
use eyre::Result;
use generate::GenerateCommand;

/// Long flags that may also be written with a single dash.
pub(crate) const LONG_FLAGS: [&str; 5] =
    ["source", "features", "formatter", "dry-run", "snapshot-dir"];

#[derive(Parser)]
#[command(name = "gosb")]
#[command(version)]
#[command(about = "Generate builders for Go structs marked with //go:generate gosb")]
pub(crate) struct Cli {
    #[command(flatten)]
    generate: GenerateCommand,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        self.generate.run()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_long_flags_exist() {
        let command = Cli::command();
        for flag in LONG_FLAGS {
            assert!(
                command.get_arguments().any(|arg| arg.get_long() == Some(flag)),
                "missing --{flag}"
            );
        }
    }
}
