//! boardscan CLI: print the FEN placement of a chessboard photograph.

use std::path::PathBuf;
use std::process::ExitCode;

use boardscan::{
    check_placement, load_detections, load_image, load_mask, BoardScanner, ScanError, ScanParams,
    Side,
};
use clap::Parser;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser, Debug)]
#[command(name = "boardscan")]
#[command(about = "Read the piece placement of a chessboard photograph as FEN")]
#[command(version)]
struct Cli {
    /// Photograph of the board.
    #[arg(long)]
    image: PathBuf,

    /// Board-region mask (non-zero = board), any size.
    #[arg(long)]
    mask: PathBuf,

    /// JSON array of {x1, y1, x2, y2, class_id, class_label} detections
    /// in the photograph's pixel space.
    #[arg(long)]
    detections: PathBuf,

    /// JSON scan configuration; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side to move (w or b). Appends ` <side> - - 0 0` to the output.
    #[arg(long)]
    side: Option<Side>,

    /// Write the warped board with its boxes drawn in to this path.
    #[arg(long)]
    debug_image: Option<PathBuf>,

    /// Log every per-piece decision to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(fen) => {
            println!("{fen}");
            ExitCode::SUCCESS
        }
        Err(e) if e.is::<ScanError>() => {
            eprintln!("failed to process the image: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(_verbose: bool) {
    boardscan::core::init_tracing(false);
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) {
    use log::LevelFilter;

    let _ = if verbose {
        boardscan::core::init_with_level(LevelFilter::Debug)
    } else {
        boardscan::core::init_from_env(LevelFilter::Warn)
    };
}

fn run(cli: &Cli) -> CliResult<String> {
    let mut params = match &cli.config {
        Some(path) => ScanParams::load_json(path)?,
        None => ScanParams::default(),
    };
    if let Some(side) = cli.side {
        params.side_to_move = Some(side);
    }
    if let Some(path) = &cli.debug_image {
        params.debug_image = Some(path.clone());
    }

    let image = load_image(&cli.image)?;
    let mask = load_mask(&cli.mask)?;
    let boxes = load_detections(&cli.detections)?;

    let result = BoardScanner::new(params)?.scan(&image, &mask, &boxes)?;
    check_placement(&result.placement_field())?;
    Ok(result.fen())
}
