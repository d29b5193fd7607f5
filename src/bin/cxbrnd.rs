//! cxbrnd: Monte Carlo scatter of the residual Cosmic X-ray Background

use cxb_explore::cli::legacy::{self, cxbrnd};

fn main() {
    legacy::main(cxbrnd::USAGE, cxbrnd::run)
}
