use anyhow::Result;
use drover::cli::App;

#[tokio::main]
async fn main() -> Result<()> {
    let mut app = App::from_args().await?;
    let args = drover::cli::Args::parse_args();

    app.run(args).await?;

    Ok(())
}
