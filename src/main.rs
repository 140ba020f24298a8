#[tokio::main]
async fn main() -> anyhow::Result<()> {
    transfer_selection::run().await
}
