use clap::Parser;
use fieldtree::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let output = fieldtree::run(cli).await?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
