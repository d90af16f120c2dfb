use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = mailsense_api::Args::parse();
	mailsense_api::run(args).await
}
