use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = lift_api::Args::parse();

	lift_api::run(args).await
}
