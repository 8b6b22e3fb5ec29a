#![forbid(unsafe_code)]

//! # AOP Console
//!
//! ```bash
//! cargo run -p aop_console -- --route /aop
//! ```

use std::io;
use std::sync::Arc;

use anyhow::Context;
use aop_api::{AopApi, HttpClient};
use tracing::info;

use aop_console::app::App;
use aop_console::cli::Cli;
use aop_console::config::Config;
use aop_console::runtime::Program;
use aop_console::theme::Theme;
use aop_console::{headless, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli)?;
    logging::init(config.verbosity, &config.log_target())?;

    if let Some(command) = &cli.command {
        let mut stdout = io::stdout().lock();
        if !command.needs_backend() {
            return headless::routes(&mut stdout);
        }
        let client = connect(&config)?;
        return headless::run(command, &client, &mut stdout);
    }

    let api: Arc<dyn AopApi> = Arc::new(connect(&config)?);
    let app = App::new(api, Theme::with_color(config.color), config.route);
    let program = Program::new(app);
    let program = if config.alt_screen {
        program.with_alt_screen()
    } else {
        program
    };
    program.run().context("running terminal UI")?;

    Ok(())
}

fn connect(config: &Config) -> anyhow::Result<HttpClient> {
    let client = HttpClient::new(&config.api).context("building API client")?;
    info!(base_url = client.base_url(), "using backend");
    Ok(client)
}
