// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Color output mode
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Method set output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header line plus one Go signature per method
    #[default]
    Text,
    /// The serialized method set
    Json,
}

/// A source root: import path prefix and the directory it maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootArg {
    pub prefix: String,
    pub dir: PathBuf,
}

impl std::str::FromStr for RootArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((prefix, dir)) = s.split_once('=') else {
            return Err(format!("expected PREFIX=DIR, got '{s}'"));
        };
        if prefix.is_empty() || dir.is_empty() {
            return Err(format!("expected PREFIX=DIR, got '{s}'"));
        }
        Ok(RootArg {
            prefix: prefix.to_string(),
            dir: PathBuf::from(dir),
        })
    }
}

/// Resolve the full method set of a Go type
#[derive(Parser)]
#[command(name = "proxyz")]
#[command(version)]
#[command(about = "Resolve the method sets of Go types", long_about = None)]
pub struct Cli {
    /// Color output: auto, always, never
    #[arg(long, global = true, hide = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the method set of a named type
    #[command(visible_alias = "m")]
    Methods {
        /// Package pattern: an import path, a local directory, or either ending in /...
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Name of the type declared in the matched package
        #[arg(value_name = "TYPE")]
        type_name: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Source root mapping an import prefix to a directory (repeatable)
        #[arg(long = "root", value_name = "PREFIX=DIR")]
        roots: Vec<RootArg>,

        /// Standard library source directory (overrides auto-detection)
        #[arg(long, value_name = "DIR")]
        stdlib: Option<PathBuf>,

        /// Directory local patterns are relative to (default: current directory)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn root_arg_parses_prefix_and_dir() {
        let root: RootArg = "example.com/m=/src/m".parse().unwrap();
        assert_eq!(root.prefix, "example.com/m");
        assert_eq!(root.dir, PathBuf::from("/src/m"));
        assert!("no-separator".parse::<RootArg>().is_err());
        assert!("=dir".parse::<RootArg>().is_err());
    }

    #[test]
    fn methods_arguments() {
        let cli = Cli::try_parse_from([
            "proxyz", "methods", "./pkg", "Conn", "--format", "json", "--root", "a=b", "--root",
            "c=d",
        ])
        .unwrap();
        let Commands::Methods {
            pattern,
            type_name,
            format,
            roots,
            ..
        } = cli.command
        else {
            panic!("expected methods");
        };
        assert_eq!(pattern, "./pkg");
        assert_eq!(type_name, "Conn");
        assert_eq!(format, OutputFormat::Json);
        assert_eq!(roots.len(), 2);
    }
}
