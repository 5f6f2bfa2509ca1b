use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use tracing::error;

use seolens::dashboard::{run_dashboard, write_export};
use seolens::report::{print_dashboard, print_json};
use seolens::utils::{setup_logging, validate_args};
use seolens::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    match run_dashboard(&args) {
        Ok(bundle) => {
            let mut stdout = io::stdout().lock();
            if args.json {
                print_json(&bundle, &mut stdout)?;
            } else {
                print_dashboard(&bundle, &mut stdout)?;
            }

            if !args.no_export && write_export(&bundle, &args.output)? && !args.json {
                writeln!(stdout, "\nExported data to {}", args.output.display())?;
            }
            Ok(())
        }
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
