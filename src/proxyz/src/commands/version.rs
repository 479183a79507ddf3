use std::process::ExitCode;

use proxyz_sema::StdlibLocator;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> &'static str {
    VERSION
}

pub fn print_version() -> ExitCode {
    println!("proxyz {}", version_string());
    match StdlibLocator::locate() {
        Some(loc) => println!("stdlib: {} ({:?})", loc.path.display(), loc.source),
        None => println!("stdlib: not found"),
    }
    ExitCode::SUCCESS
}
