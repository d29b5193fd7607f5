//! cxb-explore CLI entry point
//!
//! Residual Cosmic X-ray Background estimates

use cxb_explore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
