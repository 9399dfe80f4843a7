use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = marketplace::run().await {
        error!("Marketplace exited with error: {}", error);
        eprintln!("Marketplace exited with error: {:#}", error);
        std::process::exit(1);
    }
}
