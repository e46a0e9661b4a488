use clap::{Arg, Command};
use std::error::Error;
use std::path::Path;

use syncproxy::config::Config;
use syncproxy::logging::init_tracing;
use syncproxy::server;

fn load_config(matches: &clap::ArgMatches) -> Result<Config, Box<dyn Error>> {
	let file = matches.get_one::<String>("config").map(Path::new);
	let mut config = Config::load(file)?;
	if let Some(listen) = matches.try_get_one::<String>("listen").ok().flatten() {
		config.listen = listen.clone();
		config.validate()?;
	}
	Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = Command::new("SyncProxy")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Read/write proxy for a JSON document stored on GitHub")
		.subcommand_required(true)
		.arg(
			Arg::new("config")
				.short('c')
				.long("config")
				.value_name("FILE")
				.global(true)
				.help("Config file (TOML, or JSON with a .json extension)"),
		)
		.subcommand(
			Command::new("serve").about("Run the HTTP proxy").arg(
				Arg::new("listen")
					.short('l')
					.long("listen")
					.value_name("ADDR")
					.help("Address to bind, e.g. 0.0.0.0:3000"),
			),
		)
		.subcommand(
			Command::new("config")
				.about("Print the effective configuration (the token is never printed)"),
		)
		.get_matches();

	if let Some(sub_matches) = matches.subcommand_matches("serve") {
		init_tracing();
		let config = load_config(sub_matches)?;
		return server::serve(config).await;
	} else if let Some(sub_matches) = matches.subcommand_matches("config") {
		let config = load_config(sub_matches)?;
		print!("{}", toml::to_string_pretty(&config)?);
		eprintln!(
			"credential: {}",
			if config.has_credential() { "configured" } else { "missing" }
		);
	}

	Ok(())
}

// vim: ts=4
