use crate::CLAP_STYLING;
use clap::{arg, command};
use navmap_core::config::DEFAULT_CONFIG_PATH;
use std::path::PathBuf;
use url::Url;

fn config_arg() -> clap::Arg {
    arg!(-c --"config" <PATH>)
        .required(false)
        .help("Config file (default: ~/.config/navmap/config.json when present)")
        .value_parser(clap::value_parser!(PathBuf))
}

fn convention_arg() -> clap::Arg {
    arg!(--"convention" <CONVENTION>)
        .required(false)
        .help("Output shape: 'tree' (nested navigation) or 'menus' (flattened menus/sections)")
        .value_parser(["tree", "menus"])
}

fn footer_fallback_arg() -> clap::Arg {
    arg!(--"footer-fallback")
        .required(false)
        .help("Retry on footer navigation when no primary navigation is found")
        .action(clap::ArgAction::SetTrue)
}

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("navmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("navmap")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a default navmap config file")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the config file")
                        .default_value(DEFAULT_CONFIG_PATH),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrite an existing config file without asking.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("scrape")
                .about(
                    "Fetch one or more sites, extract their navigation menus and write one JSON \
                document per site.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The site to scrape")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of sites to scrape")
                        .value_parser(clap::value_parser!(PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Number of sites scraped concurrently (default: config 'workers')")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-o --"output" <DIR>)
                        .required(false)
                        .help("Directory for the per-site JSON documents")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(config_arg())
                .arg(convention_arg())
                .arg(footer_fallback_arg())
                .arg(
                    arg!(--"no-resume")
                        .required(false)
                        .help("Scrape sites again even when a success document already exists")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("extract")
                .about(
                    "Extract the navigation of a saved HTML file and print it as JSON. Exits 2 \
                when the navigation is rejected.",
                )
                .arg(
                    arg!(-f --"file" <PATH>)
                        .required(true)
                        .help("The HTML file to analyze")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(-b --"base-url" <URL>)
                        .required(true)
                        .help("The URL the page was fetched from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(config_arg())
                .arg(convention_arg())
                .arg(footer_fallback_arg()),
        )
}
