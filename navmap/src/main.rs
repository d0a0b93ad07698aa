use colored::Colorize;
use commands::command_argument_builder;
use navmap::handlers::{handle_extract, handle_init, handle_scrape, init_tracing};
use navmap_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_count("verbose"));

    // extract writes JSON to stdout, so it never gets the banner
    let is_extract = matches!(chosen_command.subcommand(), Some(("extract", _)));
    if !quiet && !is_extract {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command).map(|_| 0),
        Some(("scrape", primary_command)) => handle_scrape(primary_command).await.map(|_| 0),
        Some(("extract", primary_command)) => handle_extract(primary_command),
        // No subcommand provided, just show the banner
        None => Ok(0),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
