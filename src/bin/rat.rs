//! Command-line interface for rat
//! This binary checks grammar files and parses text against them.
//!
//! Usage:
//!   rat check `<grammar>` [--format `<format>`]
//!       Load, validate and print a grammar
//!   rat parse `<grammar>` `<input>...` [--format `<format>`]
//!       Parse the inputs joined by spaces, print the tree
//!   rat formats
//!       List the output formats
//!
//! Global options: --config `<file>`, --set `<key=value>`, --debug, --trace, --timing
//!
//! Configuration layers: built-in defaults, `./rat.toml` if present, `--config`, `--set`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use std::str::FromStr;
use std::time::Instant;

use rat::rat::config::{Loader, RatConfig, PROJECT_FILE};
use rat::rat::formats::{render_grammar, render_tree, OutputFormat};
use rat::rat::{GrammarLoader, Packrat, RatError};

fn main() {
    let matches = Command::new("rat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Load PEG grammars and parse text against them")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .value_name("KEY=VALUE")
                .help("Override one configuration key, e.g. matcher.max_depth=64")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .help("Log grammar loading and parsing at debug level")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .global(true)
                .help("Log every rule and token attempt")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timing")
                .long("timing")
                .global(true)
                .help("Report load and parse durations on stderr")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("check")
                .about("Load and validate a grammar, then print it")
                .arg(
                    Arg::new("grammar")
                        .help("Path to the grammar file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (dump, json, yaml)")
                        .default_value("dump"),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse input text against a grammar")
                .arg(
                    Arg::new("grammar")
                        .help("Path to the grammar file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("input")
                        .help("Input text; several arguments are joined with single spaces")
                        .required(true)
                        .num_args(1..)
                        .index(2),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (default: the configured output format)"),
                ),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), RatError> {
    let config = load_config(matches)?;
    init_logging(matches, &config)?;

    match matches.subcommand() {
        Some(("check", check_matches)) => handle_check_command(check_matches, &config),
        Some(("parse", parse_matches)) => handle_parse_command(parse_matches, &config),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> Result<RatConfig, RatError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for assignment in matches.get_many::<String>("set").into_iter().flatten() {
        loader = loader.set_assignment(assignment)?;
    }
    Ok(loader.build()?)
}

fn init_logging(matches: &ArgMatches, config: &RatConfig) -> Result<(), RatError> {
    let level = if matches.get_flag("trace") {
        LevelFilter::Trace
    } else if matches.get_flag("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(&config.logging.level).map_err(|_| {
            RatError::Config(format!("unknown log level '{}'", config.logging.level))
        })?
    };

    // A logger may already be installed when embedded; keep that one
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
    Ok(())
}

fn format_arg(matches: &ArgMatches, fallback: &str) -> Result<OutputFormat, RatError> {
    let name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or(fallback);
    Ok(OutputFormat::from_str(name)?)
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches, config: &RatConfig) -> Result<(), RatError> {
    let path = matches
        .get_one::<String>("grammar")
        .expect("grammar is a required argument");
    let format = format_arg(matches, "dump")?;

    let started = Instant::now();
    let grammar = GrammarLoader::from_path(path)?
        .with_config(config.grammar.clone())
        .load()?;
    report_timing(matches, "load", started);

    print!("{}", render_grammar(&grammar, format)?);
    Ok(())
}

/// Handle the parse command
fn handle_parse_command(matches: &ArgMatches, config: &RatConfig) -> Result<(), RatError> {
    let path = matches
        .get_one::<String>("grammar")
        .expect("grammar is a required argument");
    let input = matches
        .get_many::<String>("input")
        .expect("input is a required argument")
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let format = format_arg(matches, &config.output.format)?;

    let started = Instant::now();
    let grammar = GrammarLoader::from_path(path)?
        .with_config(config.grammar.clone())
        .load()?;
    report_timing(matches, "load", started);

    let packrat = Packrat::with_config(config.matcher).with_entity_config(config.entities);
    let started = Instant::now();
    let tree = packrat.parse(&grammar, &input)?;
    report_timing(matches, "parse", started);

    let output = render_tree(&tree, format)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Available output formats:\n");
    let mut formats = OutputFormat::ALL.to_vec();
    formats.sort_by_key(|format| format.name());
    for format in formats {
        println!("  {}", format.name());
        println!("    {}", format.description());
        println!();
    }
}

fn report_timing(matches: &ArgMatches, phase: &str, started: Instant) {
    if matches.get_flag("timing") {
        eprintln!("{} time: {:.3}ms", phase, started.elapsed().as_secs_f64() * 1000.0);
    }
}
