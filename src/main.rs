#[tokio::main]
async fn main() {
    if let Err(e) = vaidya_lib::run().await {
        tracing::error!("{e}");
        eprintln!("vaidya: {e}");
        std::process::exit(1);
    }
}
