use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use linmat_cli::commands::inspect::{run_det, run_info, run_show};
use linmat_cli::commands::invert::run_invert;
use linmat_cli::commands::make::{build_matrix, MatrixKind};
use linmat_cli::commands::solve::run_solve;
use linmat_cli::config::{load_cli_config, CliConfig};
use linmat_cli::util::{emit_matrix, load_matrix, load_vector};

fn matrix_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn output_arg() -> Arg {
    Arg::new("output_file")
        .short('o')
        .long("output")
        .help(
            "File to write the result to (.csv or .json). \
             Prints to stdout when omitted.",
        )
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("LINMAT_LOG", "error,linmat=info"))
        .init();

    let matches = Command::new("linmat")
        .version(clap::crate_version!())
        .author("Justin Sing <justincsing@gmail.com>")
        .about("linmat - determinants, inverses and linear solves for dense matrices")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a JSON configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .global(true)
                .help("Format of the input files. Inferred from the extension when omitted.")
                .value_parser(["csv", "serialized"])
                .value_hint(ValueHint::Other),
        )
        .subcommand(
            Command::new("info")
                .about("Print the shape, aggregates and determinant of a matrix")
                .arg(matrix_arg("matrix", "Path to the matrix file")),
        )
        .subcommand(
            Command::new("det")
                .about("Print the determinant of a square matrix")
                .arg(matrix_arg("matrix", "Path to the matrix file")),
        )
        .subcommand(
            Command::new("invert")
                .about("Invert a square matrix")
                .arg(matrix_arg("matrix", "Path to the matrix file"))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("solve")
                .about("Solve the linear system Ax = b")
                .arg(matrix_arg("matrix", "Path to the coefficient matrix A"))
                .arg(matrix_arg(
                    "rhs",
                    "Path to the right-hand side b, stored as a single row or column",
                ))
                .arg(
                    Arg::new("refine")
                        .long("refine")
                        .help("Refine the solution by iterative error correction")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("make")
                .about("Generate an identity, Hilbert, zero or one matrix")
                .arg(
                    Arg::new("kind")
                        .help("Kind of matrix to generate")
                        .required(true)
                        .value_parser(MatrixKind::NAMES),
                )
                .arg(
                    Arg::new("size")
                        .short('n')
                        .long("size")
                        .help("Number of rows")
                        .required(true)
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("cols")
                        .long("cols")
                        .help("Number of columns for zero and one matrices. Defaults to --size.")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Render a matrix as text or HTML")
                .arg(matrix_arg("matrix", "Path to the matrix file"))
                .arg(
                    Arg::new("fmt")
                        .long("fmt")
                        .help("printf-style element format, e.g. '%8.3f'. Overrides display_format.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help("Render an HTML table instead of text")
                        .action(ArgAction::SetTrue),
                ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Written by {author-with-newline}Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    let Some((name, sub_m)) = matches.subcommand() else {
        unreachable!("Subcommand is required by CLI configuration")
    };

    let config = match sub_m.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("[linmat] Using config: {:?}", path);
            load_cli_config(path)?
        }
        None => CliConfig::default(),
    };

    let output = run_command(name, sub_m, &config)?;
    print!("{}", output);
    Ok(())
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .ok_or_else(|| anyhow::anyhow!("Missing {} argument", name))
}

fn run_command(name: &str, matches: &ArgMatches, config: &CliConfig) -> Result<String> {
    let format = matches.get_one::<String>("format").map(String::as_str);

    match name {
        "info" => run_info(&load_matrix(path_arg(matches, "matrix")?, format, config)?),
        "det" => run_det(&load_matrix(path_arg(matches, "matrix")?, format, config)?),
        "invert" => {
            let mut matrix = load_matrix(path_arg(matches, "matrix")?, format, config)?;
            run_invert(&mut matrix, matches.get_one("output_file"), config)
        }
        "solve" => {
            let a = load_matrix(path_arg(matches, "matrix")?, format, config)?;
            let b = load_vector(path_arg(matches, "rhs")?, format, config)?;
            log::info!(
                "[linmat] Solving {}x{} system from {:?}",
                a.nrows(),
                a.ncols(),
                path_arg(matches, "matrix")?
            );
            run_solve(&a, &b, matches.get_flag("refine"), config)
        }
        "make" => {
            let kind: MatrixKind = matches
                .get_one::<String>("kind")
                .ok_or_else(|| anyhow::anyhow!("Missing matrix kind"))?
                .parse()?;
            let size = *matches
                .get_one::<usize>("size")
                .ok_or_else(|| anyhow::anyhow!("Missing --size"))?;
            let cols = matches.get_one::<usize>("cols").copied();
            let mut matrix = build_matrix(kind, size, cols)?;
            matrix.apply_config(&config.numeric)?;
            emit_matrix(&matrix, matches.get_one("output_file"), config)
        }
        "show" => {
            let matrix = load_matrix(path_arg(matches, "matrix")?, format, config)?;
            run_show(
                &matrix,
                matches.get_one::<String>("fmt").map(String::as_str),
                matches.get_flag("html"),
                config,
            )
        }
        _ => unreachable!(),
    }
}
