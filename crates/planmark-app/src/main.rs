//! Planmark replay entry point.

use clap::Parser;
use planmark_app::Args;

fn main() {
    env_logger::init();
    log::info!("Starting Planmark replay");

    let args = Args::parse();
    if let Err(e) = planmark_app::run(&args.session, args.output.as_deref()) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
