//! Command dispatch logic for ftwheels

use super::{Config, generate};
use crate::{Host, Result};
use camino::Utf8Path;
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Number of packages charted when `--number` is not given.
pub const DEFAULT_PACKAGE_COUNT: usize = 360;

#[derive(Parser, Debug)]
#[command(name = "ftwheels", version, author, long_about = None)]
#[command(about = "Chart which of the most-downloaded PyPI packages publish free-threaded wheels")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    /// Number of packages to chart
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_PACKAGE_COUNT, value_parser = parse_package_count)]
    number: usize,
}

fn parse_package_count(s: &str) -> core::result::Result<usize, String> {
    let count: usize = s.parse().map_err(|e| format!("'{s}' is not a valid package count: {e}"))?;
    if count == 0 {
        return Err("package count must be at least 1".to_string());
    }
    Ok(count)
}

/// Parse command-line arguments and run the chart generation
///
/// Settings other than the package count come from `ftwheels.toml` in the working
/// directory, or from the built-in defaults when there is no such file.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the generation fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = Cli::parse_from(args);
    let config = Config::load(Utf8Path::new("."))?;

    generate(host, &config, cli.number).await
}
