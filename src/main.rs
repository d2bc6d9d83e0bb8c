use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    triplestore_access::run().await
}
