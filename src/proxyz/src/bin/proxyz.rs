// src/bin/proxyz.rs

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ColorChoice, CommandFactory, FromArgMatches};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::FormatTime;

use proxyz::cli::{Cli, Commands};
use proxyz::commands::methods::{MethodsOptions, print_methods};
use proxyz::commands::version::print_version;

/// A timer that outputs nothing but still enables span timing calculation
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(
        &self,
        _w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> std::fmt::Result {
        Ok(())
    }
}

fn main() -> ExitCode {
    // Initialize tracing if PROXYZ_LOG is set
    // PROXYZ_LOG_STYLE: "compact" (default) or "full" (verbose with timestamps)
    if let Ok(filter) = EnvFilter::try_from_env("PROXYZ_LOG") {
        let style = std::env::var("PROXYZ_LOG_STYLE").unwrap_or_default();
        if style == "full" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        } else {
            // Compact output: no timestamp prefix, keep target/level/ANSI and timing
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_level(true)
                .with_timer(NoTimestamp)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(std::io::stderr)
                .init();
        }
        tracing::debug!("tracing initialized");
    }

    let styles = Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Cyan.on_default());

    let matches = Cli::command()
        .styles(styles)
        .color(get_color_choice_from_args())
        .get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match cli.command {
        Commands::Methods {
            pattern,
            type_name,
            format,
            roots,
            stdlib,
            dir,
        } => print_methods(
            &pattern,
            &type_name,
            MethodsOptions {
                format,
                roots: &roots,
                stdlib: stdlib.as_deref(),
                dir: dir.as_deref(),
                color: cli.color,
            },
        ),
        Commands::Version => print_version(),
    }
}

/// Pre-scan command line args to determine color choice before full parsing.
/// This allows clap's help output to respect the --color flag.
fn get_color_choice_from_args() -> ColorChoice {
    let args: Vec<String> = std::env::args().collect();

    for (i, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--color=") {
            return parse_color_choice(value);
        }
        if arg == "--color"
            && let Some(value) = args.get(i + 1)
        {
            return parse_color_choice(value);
        }
    }

    ColorChoice::Auto
}

fn parse_color_choice(value: &str) -> ColorChoice {
    match value.to_lowercase().as_str() {
        "always" => ColorChoice::Always,
        "never" => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
