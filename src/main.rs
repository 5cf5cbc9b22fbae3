use std::error::Error as _;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use bill_trim::{Profiles, TrimError, trim_bill};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;

/// Strip trailing advertisement pages from password-protected bills
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the bill PDF
    #[arg(required_unless_present = "list")]
    in_bill_path: Option<PathBuf>,

    /// Type of bill (airtel_mobile, jio_mobile, jio_fiber)
    #[arg(long, required_unless_present = "list")]
    bill_type: Option<String>,

    /// Print the known bill types and exit
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Log level: error, warn, info, debug or trace
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn run(args: Args) -> Result<(), TrimError> {
    let profiles = Profiles::from_env()?;

    if args.list {
        for profile in profiles.iter() {
            println!(
                "{:<16} keeps {} page(s), password from ${}",
                profile.identifier, profile.pages_to_keep, profile.password_var
            );
        }
        return Ok(());
    }

    let (Some(in_bill_path), Some(bill_type)) = (args.in_bill_path, args.bill_type) else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "IN_BILL_PATH and --bill-type are required unless --list is given",
            )
            .exit();
    };

    let report = trim_bill(&profiles, &bill_type, &in_bill_path)?;

    println!();
    println!("✓ Bill trimmed successfully!");
    println!("  Input:   {} ({} pages)", report.input.display(), report.original_pages);
    println!("  Output:  {} ({} pages)", report.output.display(), report.kept_pages);

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .init();

    println!("Parsed CLI arguments: {:?}", args);

    if let Err(e) = run(args) {
        if e.is_configuration() {
            eprintln!("configuration error: {e}");
        } else {
            eprintln!("error: {e}");
        }
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
