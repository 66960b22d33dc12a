//! Binary entrypoint for the Terrapin CLI.

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit_code = terrapin_cli::run().await;
    std::process::exit(exit_code);
}
