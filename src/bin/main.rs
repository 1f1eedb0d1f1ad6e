#[tokio::main]
async fn main() -> glossary::Result<()> {
    glossary::cli::main().await
}
