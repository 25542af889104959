mod progress;
mod styling;
mod summary;

pub use progress::PhaseProgress;
pub use summary::print_summary;

use styling::{dim, magenta_bold};

/// Prints the `DeployLens` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚀 DeployLens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Deployment Latency Tool")
    );
}
