//! gnbuild - GN/Ninja build driver for multi-platform native libraries.
//!
//! Builds every requested CPU and packages the products. Exit code 0 means
//! every stage succeeded.

use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match gnbuild::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
