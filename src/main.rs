use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use rusty_dloc::data::loader::{load_file, save_file, write_json};
use rusty_dloc::data::parse::parse_axis_input;
use rusty_dloc::{
    Axis, AxisInput, CallerInput, DuplicateLevelPolicy, Frame, RepeatedConstraintPolicy, SelectOptions,
};

/// Select from a multi-level table by level name.
///
/// Selector expressions: `level=B`, `#1=[A,B]`, `level=A..C`, or a bare
/// positional tuple such as `..;A`.
#[derive(Parser, Debug)]
#[command(name = "rusty-dloc")]
struct Args {
    /// Frame to read (.json or .csv).
    file: PathBuf,

    /// Row selector expression; repeat to constrain several levels.
    #[arg(long = "rows", short = 'r')]
    rows: Vec<String>,

    /// Column selector expression; repeat to constrain several levels.
    #[arg(long = "columns", short = 'c')]
    columns: Vec<String>,

    /// Apply the `--rows` expressions to this axis only (axis-bound form).
    #[arg(long, value_enum)]
    axis: Option<Axis>,

    /// Assign this value to the selection instead of printing it.
    #[arg(long)]
    set: Option<f64>,

    /// Where to write the frame after `--set` (.json or .csv); stdout if omitted.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// JSON file with selection options.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override how repeated level names resolve.
    #[arg(long, value_enum)]
    duplicate_levels: Option<DuplicateLevelPolicy>,

    /// Override how two constraints on one level are treated.
    #[arg(long, value_enum)]
    repeated_constraints: Option<RepeatedConstraintPolicy>,
}

/// The call shape picked from the command line.
enum Call {
    Bound(Axis, AxisInput),
    Tuple(CallerInput),
}

fn options(args: &Args) -> Result<SelectOptions> {
    let mut opts = match &args.config {
        Some(path) => SelectOptions::from_json_file(path)?,
        None => SelectOptions::default(),
    };
    if let Some(policy) = args.duplicate_levels {
        opts.duplicate_levels = policy;
    }
    if let Some(policy) = args.repeated_constraints {
        opts.repeated_constraints = policy;
    }
    Ok(opts)
}

fn call(args: &Args) -> Result<Call> {
    let rows = parse_axis_input(args.rows.as_slice()).context("parsing --rows")?;
    let columns = parse_axis_input(args.columns.as_slice()).context("parsing --columns")?;
    if let Some(axis) = args.axis {
        if columns.is_some() {
            bail!("--axis takes its selector from --rows; drop --columns");
        }
        return Ok(Call::Bound(axis, rows.unwrap_or_else(AxisInput::everything)));
    }
    Ok(Call::Tuple(match (rows, columns) {
        (rows, None) => CallerInput::Axis(rows.unwrap_or_else(AxisInput::everything)),
        (rows, Some(columns)) => {
            CallerInput::AxisPair(rows.unwrap_or_else(AxisInput::everything), columns)
        }
    }))
}

fn run(args: Args) -> Result<()> {
    let opts = options(&args)?;
    let call = call(&args)?;
    let mut frame: Frame = load_file(&args.file)?;

    let Some(value) = args.set else {
        let selected = match call {
            Call::Bound(axis, input) => frame.dloc_with(opts).axis(axis).get(input),
            Call::Tuple(input) => frame.dloc_with(opts).get(input),
        }
        .context("selecting")?;
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    };

    match call {
        Call::Bound(axis, input) => frame.dloc_mut_with(opts).axis(axis).set(input, value),
        Call::Tuple(input) => frame.dloc_mut_with(opts).set(input, value),
    }
    .context("assigning")?;

    match &args.output {
        Some(path) => {
            save_file(&frame, path)?;
            info!("wrote {}", path.display());
        }
        None => {
            write_json(&frame, std::io::stdout().lock())?;
            println!();
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
