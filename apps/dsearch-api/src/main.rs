use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = dsearch_api::Args::parse();
	dsearch_api::run(args).await
}
