use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON export, path or http(s) URL.
    source: String,

    #[arg(long, default_value = catalog::CATALOG_PATH)]
    out: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    seed::seed_catalog(&args.source, &args.out).await?;

    Ok(())
}
