//! cxbups: analytic residual Cosmic X-ray Background flux

use cxb_explore::cli::legacy::{self, cxbups};

fn main() {
    legacy::main(cxbups::USAGE, cxbups::run)
}
