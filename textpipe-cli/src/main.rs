//! Command-line interface for textpipe
//! This binary runs saved text transformation pipelines over files or stdin, and creates and
//! checks pipeline export files.
//!
//! Usage:
//!   textpipe apply `<export.json>` --pipeline `<name|id>` [--input `<file>`] [--seed `<n>`]
//!   textpipe list-operations [--category `<category>`]
//!   textpipe validate `<export.json>`
//!   textpipe new --name `<name>` --step `<operation>`... [--icon `<icon>`]
//!
//! Global options: --config `<file.toml>` layers a settings file over the built-in defaults,
//! --verbose turns on debug logging (otherwise `RUST_LOG` decides, default `warn`).

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{ApplyArgs, NewArgs};
use textpipe_config::{Loader, TextpipeConfig};

fn cli() -> Command {
    Command::new("textpipe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run declarative text transformation pipelines")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Settings file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .help("Log every executed and skipped step")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("apply")
                .about("Apply a pipeline from an export file to text")
                .arg(
                    Arg::new("export")
                        .help("Pipeline export file (JSON)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("pipeline")
                        .long("pipeline")
                        .short('p')
                        .help("Name or id of the pipeline to run")
                        .required(true),
                )
                .arg(
                    Arg::new("input")
                        .long("input")
                        .short('i')
                        .help("Input file, stdin when omitted or '-'"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for shuffle-lines")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("list-operations")
                .about("List available operations")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Only list one category (text, lines, structure, search, data)"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check a pipeline export file")
                .arg(
                    Arg::new("export")
                        .help("Pipeline export file (JSON)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("new")
                .about("Print an export file holding a new pipeline")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .help("Pipeline name")
                        .required(true),
                )
                .arg(
                    Arg::new("step")
                        .long("step")
                        .short('s')
                        .help("Operation id, repeat for more steps")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("icon").long("icon").help("Pipeline icon")),
        )
}

fn main() {
    let matches = cli().get_matches();

    init_logging(matches.get_flag("verbose"));

    let config = load_config(matches.get_one::<String>("config")).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    let result = match matches.subcommand() {
        Some(("apply", sub)) => handle_apply_command(&config, sub),
        Some(("list-operations", sub)) => {
            commands::list_operations(sub.get_one::<String>("category").map(String::as_str))
        }
        Some(("validate", sub)) => match sub.get_one::<String>("export") {
            Some(path) => commands::validate(path),
            None => Err("Missing export file".to_string()),
        },
        Some(("new", sub)) => handle_new_command(&config, sub),
        _ => Err("Unknown command".to_string()),
    };

    match result {
        Ok(output) => print!("{}", output),
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn load_config(path: Option<&String>) -> Result<TextpipeConfig, textpipe_config::SettingsError> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader.build()
}

fn handle_apply_command(config: &TextpipeConfig, sub: &ArgMatches) -> Result<String, String> {
    let (Some(export_file), Some(pipeline)) = (
        sub.get_one::<String>("export"),
        sub.get_one::<String>("pipeline"),
    ) else {
        return Err("apply needs an export file and --pipeline".to_string());
    };
    commands::apply(
        config,
        ApplyArgs {
            export_file,
            pipeline,
            input: sub.get_one::<String>("input").map(String::as_str),
            seed: sub.get_one::<u64>("seed").copied(),
        },
    )
}

fn handle_new_command(config: &TextpipeConfig, sub: &ArgMatches) -> Result<String, String> {
    let Some(name) = sub.get_one::<String>("name") else {
        return Err("new needs --name".to_string());
    };
    let steps = sub
        .get_many::<String>("step")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();
    commands::new_pipeline(
        config,
        NewArgs {
            name,
            steps,
            icon: sub.get_one::<String>("icon").map(String::as_str),
        },
    )
    .map(|json| format!("{}\n", json))
}
