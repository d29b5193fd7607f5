//! cxbopt: optimal source extraction radius and flux cut

use cxb_explore::cli::legacy::{self, cxbopt};

fn main() {
    legacy::main(cxbopt::USAGE, cxbopt::run)
}
