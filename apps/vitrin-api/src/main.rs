use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = vitrin_api::Args::parse();
	vitrin_api::run(args).await
}
