//! `specgate` command line tool
//!
//! Exit codes: 0 success, 1 completion rejected, 2 usage, IO or upstream error.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use specgate_core::{GateConfig, GateError, SpecArray, SpecGate};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    fn exit_code(self) -> i32 {
        match self {
            Outcome::Accepted => 0,
            Outcome::Rejected => 1,
        }
    }
}

fn cli() -> Command {
    Command::new("specgate")
        .version(specgate_core::VERSION)
        .about("Structural gate and spec injection for generated C code")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML gate configuration"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("extract")
                .about("Print the function/loop structure of a C file")
                .arg(file_arg("file", "C source file"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Check that a completion keeps the skeleton's structure")
                .arg(file_arg("skeleton", "Skeleton C file"))
                .arg(file_arg("completion", "Completion C file")),
        )
        .subcommand(
            Command::new("inject")
                .about("Insert specs into a completion and print the result")
                .arg(file_arg("completion", "Completion C file"))
                .arg(
                    Arg::new("specs")
                        .long("specs")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON spec array"),
                )
                .arg(
                    Arg::new("skeleton")
                        .long("skeleton")
                        .value_parser(value_parser!(PathBuf))
                        .help("Validate against this skeleton first"),
                ),
        )
        .subcommand(
            Command::new("compare")
                .about("Print both structures and the verdict")
                .arg(file_arg("skeleton", "Skeleton C file"))
                .arg(file_arg("completion", "Completion C file")),
        )
}

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .ok();
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    let code = match run(&matches) {
        Ok(outcome) => {
            tracing::debug!("Finished with {:?}", outcome);
            outcome.exit_code()
        }
        Err(err) => {
            tracing::debug!("Run failed: {:#}", err);
            eprintln!("error: {err:#}");
            2
        }
    };
    process::exit(code);
}

fn run(matches: &ArgMatches) -> Result<Outcome> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };
    tracing::debug!("Gate config: {:?}", config);
    let gate = SpecGate::new(config);

    if let Some((name, _)) = matches.subcommand() {
        tracing::info!("Running '{}'", name);
    }

    match matches.subcommand() {
        Some(("extract", args)) => extract(&gate, path_arg(args, "file")?, args.get_flag("json")),
        Some(("validate", args)) => validate(
            &gate,
            path_arg(args, "skeleton")?,
            path_arg(args, "completion")?,
        ),
        Some(("inject", args)) => inject(
            &gate,
            path_arg(args, "completion")?,
            path_arg(args, "specs")?,
            args.get_one::<PathBuf>("skeleton").map(PathBuf::as_path),
        ),
        Some(("compare", args)) => compare(
            &gate,
            path_arg(args, "skeleton")?,
            path_arg(args, "completion")?,
        ),
        Some((other, _)) => anyhow::bail!("unknown subcommand '{other}'"),
        None => anyhow::bail!("no subcommand given"),
    }
}

fn path_arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .with_context(|| format!("missing argument '{name}'"))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Rejections become exit code 1; everything else propagates
fn settle(result: Result<(), GateError>) -> Result<Outcome> {
    match result {
        Ok(()) => Ok(Outcome::Accepted),
        Err(err) if err.is_rejection() => {
            eprintln!("REJECTED: {err}");
            Ok(Outcome::Rejected)
        }
        Err(err) => Err(err.into()),
    }
}

fn extract(gate: &SpecGate, file: &Path, json: bool) -> Result<Outcome> {
    let source = read_source(file)?;
    let structure = match gate.extract_structure(&source) {
        Ok(structure) => structure,
        Err(err) => return settle(Err(err.into())),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&structure.summary())?);
    } else {
        print!("{structure}");
    }
    Ok(Outcome::Accepted)
}

fn validate(gate: &SpecGate, skeleton: &Path, completion: &Path) -> Result<Outcome> {
    let skeleton = read_source(skeleton)?;
    let completion = read_source(completion)?;

    let outcome = settle(gate.validate_completion_matches_skeleton(&skeleton, &completion))?;
    if outcome == Outcome::Accepted {
        println!("OK: completion matches skeleton");
    }
    Ok(outcome)
}

fn inject(
    gate: &SpecGate,
    completion: &Path,
    specs: &Path,
    skeleton: Option<&Path>,
) -> Result<Outcome> {
    let completion = read_source(completion)?;
    let specs = SpecArray::from_json(&read_source(specs)?)
        .with_context(|| format!("loading spec array {}", specs.display()))?;

    let annotated = match skeleton {
        Some(path) => gate.validate_and_inject(&read_source(path)?, &completion, &specs),
        None => gate.inject_specs(&completion, &specs),
    };
    match annotated {
        Ok(text) => {
            print!("{text}");
            Ok(Outcome::Accepted)
        }
        Err(err) => settle(Err(err)),
    }
}

fn compare(gate: &SpecGate, skeleton: &Path, completion: &Path) -> Result<Outcome> {
    let expected = gate
        .extract_structure(&read_source(skeleton)?)
        .map_err(GateError::Skeleton)?;
    println!("Skeleton:\n{expected}");

    let actual = match gate.extract_structure(&read_source(completion)?) {
        Ok(structure) => structure,
        Err(err) => return settle(Err(err.into())),
    };
    println!("Completion:\n{actual}");

    let outcome = settle(specgate_structure::validate(&expected, &actual).map_err(GateError::from))?;
    if outcome == Outcome::Accepted {
        println!("Verdict: MATCH");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn inject_requires_specs() {
        let err = cli()
            .try_get_matches_from(["specgate", "inject", "done.c"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["specgate", "validate", "a.c", "b.c", "--log-json"])
            .unwrap();
        assert!(matches.get_flag("log-json"));
    }

    #[test]
    fn mismatch_settles_as_rejection() {
        let err = GateError::from(specgate_core::Mismatch::FunctionCountMismatch {
            expected: 1,
            actual: 0,
        });
        assert_eq!(settle(Err(err)).unwrap(), Outcome::Rejected);
    }
}
