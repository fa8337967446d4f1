// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use hubledger::{cli, commands, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let session = commands::Session::from_matches(&matches)?;
    logging::setup_logging(session.log_level());

    match matches.subcommand() {
        Some(("expand", sub)) => commands::expand::handle(&session, sub)?,
        Some(("installments", sub)) => commands::installments::handle(&session, sub)?,
        Some(("check", sub)) => commands::check::handle(&session, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&session, sub)?,
        Some(("new", sub)) => commands::new::handle(sub)?,
        Some(("cancel", sub)) => commands::cancel::handle_cancel(&session, sub)?,
        Some(("restore", sub)) => commands::cancel::handle_restore(&session, sub)?,
        Some(("override", sub)) => commands::overrides::handle(&session, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
