use estuary_core::{FlowDataset, PaletteMode, discover};
use estuary_render::svg::SvgRenderOptions;
use estuary_render::{RenderOptions, render_diagram_svg};
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(estuary_core::Error),
    Render(estuary_render::Error),
    Json(serde_json::Error),
    UnknownDataset {
        name: String,
        suggestion: Option<String>,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::UnknownDataset { name, suggestion } => {
                write!(f, "dataset not found: {name}")?;
                if let Some(hint) = suggestion {
                    write!(f, " (did you mean {hint:?}?)")?;
                }
                Ok(())
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<estuary_core::Error> for CliError {
    fn from(value: estuary_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<estuary_render::Error> for CliError {
    fn from(value: estuary_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    List,
    Parse,
    Layout,
    #[default]
    Render,
}

#[derive(Debug)]
struct Args {
    command: Command,
    dataset: Option<String>,
    dir: PathBuf,
    pretty: bool,
    mode: PaletteMode,
    viewport_width: f64,
    viewport_height: f64,
    seed: Option<u64>,
    background: Option<String>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Render,
            dataset: None,
            dir: PathBuf::from("."),
            pretty: false,
            mode: PaletteMode::Regular,
            viewport_width: 600.0,
            viewport_height: 500.0,
            seed: None,
            background: None,
            out: None,
        }
    }
}

fn usage() -> &'static str {
    "estuary-cli\n\
\n\
USAGE:\n\
  estuary-cli list [--dir <path>]\n\
  estuary-cli parse [--dir <path>] [--pretty] <dataset>\n\
  estuary-cli layout [--dir <path>] [--viewport-width <w>] [--viewport-height <h>] [--pretty] <dataset>\n\
  estuary-cli render [--dir <path>] [--mode regular|random|unit] [--viewport-width <w>] [--viewport-height <h>] [--seed <n>] [--background <css-color>] [--out <path>] <dataset>\n\
\n\
NOTES:\n\
  - <dataset> is a file path, or an id resolved as <dir>/<id>.txt (a typed .txt suffix is stripped).\n\
  - An unrecognized --mode renders the regular palette; this mirrors the diagram's input policy.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - --seed makes random/unit palette draws reproducible.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command_seen = false;

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "list" if !command_seen => {
                args.command = Command::List;
                command_seen = true;
            }
            "parse" if !command_seen => {
                args.command = Command::Parse;
                command_seen = true;
            }
            "layout" if !command_seen => {
                args.command = Command::Layout;
                command_seen = true;
            }
            "render" if !command_seen => {
                args.command = Command::Render;
                command_seen = true;
            }
            "--pretty" => args.pretty = true,
            "--dir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.dir = PathBuf::from(dir);
            }
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.mode = PaletteMode::resolve(mode);
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = w.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.viewport_width.is_finite() && args.viewport_width > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = h.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.viewport_height.is_finite() && args.viewport_height > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.background = Some(bg.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            dataset => {
                if args.dataset.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.dataset = Some(dataset.to_string());
            }
        }
    }

    if args.dataset.is_none() && !matches!(args.command, Command::List) {
        return Err(CliError::Usage(usage()));
    }

    Ok(args)
}

fn load_dataset(dir: &Path, raw: &str) -> Result<(FlowDataset, String), CliError> {
    let path = match discover::resolve(dir, raw) {
        Ok(path) => path,
        Err(estuary_core::Error::DatasetNotFound { name }) => {
            let known = discover::list_datasets(dir).unwrap_or_default();
            let suggestion = discover::suggest(&name, &known).map(str::to_string);
            return Err(CliError::UnknownDataset { name, suggestion });
        }
        Err(err) => return Err(err.into()),
    };
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("diagram")
        .to_string();
    Ok((FlowDataset::from_path(&path)?, id))
}

fn write_json(value: &impl serde::Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::List => {
            for id in discover::list_datasets(&args.dir)? {
                println!("{id}");
            }
            Ok(())
        }
        Command::Parse => {
            let raw = args.dataset.as_deref().unwrap_or_default();
            let (dataset, _) = load_dataset(&args.dir, raw)?;
            write_json(&dataset, args.pretty)
        }
        Command::Layout => {
            let raw = args.dataset.as_deref().unwrap_or_default();
            let (dataset, _) = load_dataset(&args.dir, raw)?;
            let layout = estuary_render::layout::compute_layout(
                &dataset,
                args.viewport_width,
                args.viewport_height,
            );
            write_json(&layout, args.pretty)
        }
        Command::Render => {
            let raw = args.dataset.as_deref().unwrap_or_default();
            let (dataset, id) = load_dataset(&args.dir, raw)?;
            let svg = render_diagram_svg(
                &dataset,
                args.mode,
                args.viewport_width,
                args.viewport_height,
                &RenderOptions {
                    palette_seed: args.seed,
                },
                &SvgRenderOptions {
                    diagram_id: Some(id),
                    title: Some(dataset.title.clone()),
                    background: args.background.clone(),
                },
            )?;
            write_text(&svg, args.out.as_deref())
        }
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err @ CliError::UnknownDataset { .. }) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
