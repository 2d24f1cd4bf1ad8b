use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use flood_eraser::{
    default_output_path, parse_script, ClickOutcome, EditorOptions, EditorSession,
};

#[derive(Parser)]
#[command(
    name = "flood-eraser",
    about = "Make connected same-color regions of an image transparent",
    version,
    after_help = "Simple usage: flood-eraser <image> -c 0,0  (erase the region under the top-left pixel)\n\n\
                  Clicks are window coordinates at the current zoom. Output is always PNG."
)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input image file (.jpg, .jpeg or .png)
    input: String,

    /// Output file (default: {name}_transparent.png); extension is forced to .png
    #[arg(short, long)]
    output: Option<String>,

    /// Click at X,Y; repeat for several clicks, applied in order
    #[arg(short, long = "click", value_name = "X,Y", value_parser = parse_point)]
    clicks: Vec<(f64, f64)>,

    /// Zoom steps before clicking: positive zooms in, negative zooms out
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    zoom: i32,

    /// Run commands from a script file after the clicks
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Also write the checkerboard preview of the result
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Do not record clicks on regions that are already transparent
    #[arg(long)]
    skip_noop: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    quiet: bool,
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad X in {s:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad Y in {s:?}: {e}"))?;
    Ok((x, y))
}

fn init_logging(opts: &EditorOptions) {
    let default_level = if opts.verbose {
        "debug"
    } else if opts.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flood_eraser={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let opts = EditorOptions {
        skip_noop_edits: cli.skip_noop,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };
    init_logging(&opts);

    let input_path = Path::new(&cli.input);
    if !input_path.exists() {
        eprintln!("Error: Input path does not exist: {}", cli.input);
        process::exit(1);
    }

    let mut session = EditorSession::new(opts.clone());
    if let Err(e) = session.open(input_path) {
        eprintln!("Error: Failed to open {}: {e}", cli.input);
        process::exit(1);
    }

    session.zoom_by(cli.zoom);
    if !opts.quiet && cli.zoom != 0 {
        eprintln!("Zoom: {:.0}%", session.scale() * 100.0);
    }

    let mut fail_count = 0u32;

    for &(x, y) in &cli.clicks {
        report_click(x, y, session.click(x, y), &opts);
    }

    if let Some(script_path) = &cli.script {
        let commands = match std::fs::read_to_string(script_path)
            .map_err(flood_eraser::Error::from)
            .and_then(|text| parse_script(&text))
        {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: Failed to read script {}: {e}", script_path.display());
                process::exit(1);
            }
        };
        for cmd in &commands {
            match session.execute(cmd) {
                Ok(_) => {
                    if opts.verbose {
                        eprintln!("[OK] {cmd}");
                    }
                }
                Err(e) => {
                    eprintln!("[FAIL] {cmd}: {e}");
                    fail_count += 1;
                }
            }
        }
    }

    let output_path = match &cli.output {
        Some(o) => PathBuf::from(o),
        None => default_output_path(input_path),
    };

    match session.save(&output_path) {
        Ok(written) => {
            if !opts.quiet {
                print_summary(&session, &written);
            }
        }
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", output_path.display());
            fail_count += 1;
        }
    }

    if let Some(preview_path) = &cli.preview {
        match session.preview(preview_path) {
            Ok(written) if !opts.quiet => eprintln!("Preview: {}", written.display()),
            Ok(_) => {}
            Err(e) => {
                eprintln!("[FAIL] preview {}: {e}", preview_path.display());
                fail_count += 1;
            }
        }
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn report_click(x: f64, y: f64, outcome: ClickOutcome, opts: &EditorOptions) {
    if opts.quiet {
        return;
    }
    match outcome {
        ClickOutcome::Erased { pixels } => eprintln!("[OK] click {x},{y}: {pixels} pixels erased"),
        ClickOutcome::Unchanged => eprintln!("[SKIP] click {x},{y}: region already transparent"),
        ClickOutcome::Ignored => eprintln!("[SKIP] click {x},{y}: outside the image"),
    }
}

fn print_summary(session: &EditorSession, written: &Path) {
    let Some(editor) = session.editor() else {
        return;
    };
    let buffer = editor.buffer();
    eprintln!();
    eprintln!(
        "[Summary] Edits: {}, Transparent: {}/{} pixels -> {}",
        editor.history().cursor(),
        buffer.transparent_count(),
        u64::from(buffer.width()) * u64::from(buffer.height()),
        written.display()
    );
}
