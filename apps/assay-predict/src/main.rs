use clap::Parser;

use assay_predict::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	assay_predict::run(args).await
}
