#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studymate_backend::run().await
}
