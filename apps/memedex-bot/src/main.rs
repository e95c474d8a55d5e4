use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = memedex_bot::Args::parse();

	memedex_bot::run(args).await
}
