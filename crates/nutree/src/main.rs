#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nutree_lib::main().await
}
