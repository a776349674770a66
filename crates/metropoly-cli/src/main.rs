use metropoly::render::raster::{self, RasterError, RasterFormat, RasterOptions};
use metropoly::render::{
    Artifact, AssetGenerator, BoardFormat, DirectoryTileCatalog, EmbeddedFont, TileCatalog,
    write_artifact, write_artifacts,
};
use metropoly::{BoardConfig, BoardManifest, Palette, PropertyStore, SizingPolicy};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Data(metropoly::Error),
    Render(metropoly_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Data(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<metropoly::Error> for CliError {
    fn from(value: metropoly::Error) -> Self {
        Self::Data(value)
    }
}

impl From<metropoly_render::Error> for CliError {
    fn from(value: metropoly_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    Tiles,
    Cards,
    #[default]
    Board,
    Layout,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Svg,
    Html,
    Raster(RasterFormat),
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            "png" => Ok(Self::Raster(RasterFormat::Png)),
            "jpg" | "jpeg" => Ok(Self::Raster(RasterFormat::Jpeg)),
            "pdf" => Ok(Self::Raster(RasterFormat::Pdf)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    props: Option<PathBuf>,
    palette: Option<PathBuf>,
    config: Option<PathBuf>,
    manifest: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    out: Option<PathBuf>,
    tiles_dir: Option<PathBuf>,
    font: Option<PathBuf>,
    format: Option<OutputFormat>,
    scale: Option<f32>,
    fit: bool,
    pretty: bool,
    verbose: bool,
}

const DEFAULT_PROPS: &str = "props/propiedades.json";
const DEFAULT_PALETTE: &str = "src/palette.html";

fn usage() -> &'static str {
    "metropoly-cli\n\
\n\
USAGE:\n\
  metropoly-cli tiles  [--props <file>] [--palette <html>] [--config <file>] [--out-dir <dir>] [--format svg|png|jpg|pdf] [--scale <n>] [--font <file>]\n\
  metropoly-cli cards  [--props <file>] [--palette <html>] [--config <file>] [--out-dir <dir>] [--format svg|png|jpg|pdf] [--scale <n>] [--font <file>]\n\
  metropoly-cli board  [--props <file>] [--palette <html>] [--config <file>] [--manifest <json>] [--fit] [--format html|svg|png|jpg|pdf] [--out <file>] [--tiles-dir <dir>]\n\
  metropoly-cli layout [--props <file>] [--config <file>] [--manifest <json>] [--fit] [--format html|svg] [--pretty]\n\
  metropoly-cli all    [--props <file>] [--palette <html>] [--config <file>] [--manifest <json>] [--fit] [--out-dir <dir>] [--format html|svg] [--font <file>]\n\
\n\
OPTIONS:\n\
  -v, --verbose   log layout decisions (same as METROPOLY_LOG=debug)\n\
\n\
NOTES:\n\
  - Property data may be .json, .csv, .xlsx, .xls or .ods (default: props/propiedades.json).\n\
  - The palette defaults to src/palette.html when present, otherwise built-in colors.\n\
  - Without --manifest, lane lists come from the lane and kind of every property.\n\
  - board references tiles as ../casillas/<file>; --tiles-dir checks they exist.\n\
  - layout prints the computed board layout as JSON.\n\
  - METROPOLY_LOG sets the log filter (default: warn).\n\
"
}

fn next_path<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<PathBuf, CliError> {
    it.next()
        .map(PathBuf::from)
        .ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut command: Option<Command> = None;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "tiles" | "cards" | "board" | "layout" | "all" if command.is_none() => {
                command = Some(match a.as_str() {
                    "tiles" => Command::Tiles,
                    "cards" => Command::Cards,
                    "board" => Command::Board,
                    "layout" => Command::Layout,
                    _ => Command::All,
                });
            }
            "--props" => args.props = Some(next_path(&mut it)?),
            "--palette" => args.palette = Some(next_path(&mut it)?),
            "--config" => args.config = Some(next_path(&mut it)?),
            "--manifest" => args.manifest = Some(next_path(&mut it)?),
            "--out-dir" => args.out_dir = Some(next_path(&mut it)?),
            "--out" => args.out = Some(next_path(&mut it)?),
            "--tiles-dir" => args.tiles_dir = Some(next_path(&mut it)?),
            "--font" => args.font = Some(next_path(&mut it)?),
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = Some(
                    fmt.parse::<OutputFormat>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.scale = Some(scale);
            }
            "--fit" => args.fit = true,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            _ => return Err(CliError::Usage(usage())),
        }
    }

    args.command = command.ok_or(CliError::Usage(usage()))?;
    let format_ok = match (args.command, args.format) {
        (_, None) => true,
        (Command::Tiles | Command::Cards, Some(f)) => f != OutputFormat::Html,
        (Command::Layout | Command::All, Some(f)) => !matches!(f, OutputFormat::Raster(_)),
        (Command::Board, Some(_)) => true,
    };
    if !format_ok {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("METROPOLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Shared inputs of every command.
struct Session {
    store: PropertyStore,
    generator: AssetGenerator,
}

impl Session {
    fn load(args: &Args) -> Result<Self, CliError> {
        let mut config = match &args.config {
            Some(path) => BoardConfig::load(path)?,
            None => BoardConfig::default(),
        };
        if args.fit {
            config.sizing = SizingPolicy::Fit;
        }
        if let Some(root) = &args.out_dir {
            if args.command == Command::All {
                let files = &mut config.files;
                files.tiles_dir = rebase(&files.tiles_dir, root);
                files.cards_dir = rebase(&files.cards_dir, root);
                files.board_dir = rebase(&files.board_dir, root);
            }
        }

        let palette = match &args.palette {
            Some(path) => Palette::load(path)?,
            None if Path::new(DEFAULT_PALETTE).is_file() => Palette::load(DEFAULT_PALETTE)?,
            None => Palette::builtin(),
        };

        let props = args
            .props
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROPS));
        let store = PropertyStore::load(&props)?;
        tracing::info!(records = store.len(), path = %props.display(), "loaded properties");

        let mut generator = AssetGenerator::new(config, palette);
        if let Some(font) = &args.font {
            generator = generator.with_font(EmbeddedFont::load(font)?);
        }
        Ok(Self { store, generator })
    }

    fn manifest(&self, args: &Args) -> Result<BoardManifest, CliError> {
        Ok(match &args.manifest {
            Some(path) => BoardManifest::load(path)?,
            None => BoardManifest::from_store(&self.store),
        })
    }
}

/// `root/<last component of dir>`.
fn rebase(dir: &Path, root: &Path) -> PathBuf {
    match dir.file_name() {
        Some(name) => root.join(name),
        None => root.to_path_buf(),
    }
}

fn raster_options(args: &Args, resources_dir: Option<PathBuf>) -> RasterOptions {
    RasterOptions {
        scale: args.scale.unwrap_or(1.0),
        resources_dir,
        ..RasterOptions::default()
    }
}

/// Writes SVG artifacts as they are, or converted to `format` with the matching extension.
fn write_assets(
    artifacts: Vec<Artifact>,
    format: Option<OutputFormat>,
    args: &Args,
) -> Result<usize, CliError> {
    let count = artifacts.len();
    match format {
        None | Some(OutputFormat::Svg) | Some(OutputFormat::Html) => {
            write_artifacts(&artifacts)?;
        }
        Some(OutputFormat::Raster(raster_format)) => {
            for artifact in &artifacts {
                let resources = artifact.path.parent().map(Path::to_path_buf);
                let bytes = raster::convert(
                    &artifact.contents,
                    raster_format,
                    &raster_options(args, resources),
                )?;
                let path = artifact.path.with_extension(raster_format.extension());
                write_artifact(&path, bytes)?;
            }
        }
    }
    Ok(count)
}

fn run_tiles(session: &Session, args: &Args, format: Option<OutputFormat>) -> Result<(), CliError> {
    let artifacts = session
        .generator
        .tile_artifacts(&session.store, args.out_dir.as_deref());
    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| session.generator.config.files.tiles_dir.clone());
    let count = write_assets(artifacts, format, args)?;
    println!("tiles: {count} files -> {}", dir.display());
    Ok(())
}

fn run_cards(session: &Session, args: &Args, format: Option<OutputFormat>) -> Result<(), CliError> {
    let artifacts = session
        .generator
        .card_artifacts(&session.store, args.out_dir.as_deref());
    let dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| session.generator.config.files.cards_dir.clone());
    let count = write_assets(artifacts, format, args)?;
    println!("cards: {count} files -> {}", dir.display());
    Ok(())
}

fn board_format(format: Option<OutputFormat>) -> BoardFormat {
    match format {
        Some(OutputFormat::Svg) | Some(OutputFormat::Raster(_)) => BoardFormat::Svg,
        None | Some(OutputFormat::Html) => BoardFormat::Html,
    }
}

fn tile_catalog(session: &Session, args: &Args) -> Option<Arc<dyn TileCatalog + Send + Sync>> {
    let dir = args.tiles_dir.as_ref()?;
    let catalog = DirectoryTileCatalog::new(session.generator.config.files.clone()).with_root(dir);
    Some(Arc::new(catalog))
}

fn run_board(session: &Session, args: &Args) -> Result<(), CliError> {
    let manifest = session.manifest(args)?;
    let format = board_format(args.format);
    let layout = session.generator.layout_board(
        &manifest,
        &session.store,
        format,
        tile_catalog(session, args),
    );
    let markup = session.generator.render_board(&layout, format);

    let files = &session.generator.config.files;
    let extension = match args.format {
        Some(OutputFormat::Raster(raster_format)) => raster_format.extension(),
        _ => format.extension(),
    };
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| files.board_dir.join(files.board_file_name(extension)));

    match args.format {
        Some(OutputFormat::Raster(raster_format)) => {
            let resources = out.parent().map(Path::to_path_buf);
            let bytes = raster::convert(&markup, raster_format, &raster_options(args, resources))?;
            write_artifact(&out, bytes)?;
        }
        _ => write_artifact(&out, &markup)?,
    }
    println!(
        "board: {} rings, {} warnings -> {}",
        layout.rings.len(),
        layout.diagnostics.len(),
        out.display()
    );
    Ok(())
}

fn run_layout(session: &Session, args: &Args) -> Result<(), CliError> {
    let manifest = session.manifest(args)?;
    let layout = session.generator.layout_board(
        &manifest,
        &session.store,
        board_format(args.format),
        tile_catalog(session, args),
    );
    if args.pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &layout)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), &layout)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let session = Session::load(&args)?;
    match args.command {
        Command::Tiles => run_tiles(&session, &args, args.format),
        Command::Cards => run_cards(&session, &args, args.format),
        Command::Board => run_board(&session, &args),
        Command::Layout => run_layout(&session, &args),
        Command::All => {
            // Directories were already rebased onto --out-dir; assets stay SVG for the board.
            let scoped = Args::default();
            run_tiles(&session, &scoped, None)?;
            run_cards(&session, &scoped, None)?;
            run_board(&session, &args)
        }
    }
}

fn main() {
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

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("metropoly-cli")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_board_flags() {
        let args = parse_args(&argv(&[
            "board",
            "--props",
            "p.csv",
            "--fit",
            "--format",
            "svg",
            "--out",
            "b.svg",
        ]))
        .unwrap();
        assert_eq!(args.command, Command::Board);
        assert_eq!(args.props, Some(PathBuf::from("p.csv")));
        assert!(args.fit);
        assert_eq!(args.format, Some(OutputFormat::Svg));
        assert_eq!(args.out, Some(PathBuf::from("b.svg")));
    }

    #[test]
    fn rejects_missing_command_and_bad_formats() {
        assert!(matches!(parse_args(&argv(&[])), Err(CliError::Usage(_))));
        assert!(matches!(
            parse_args(&argv(&["tiles", "--format", "html"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["layout", "--format", "png"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["board", "--props"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["board", "--scale", "0"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn rebase_keeps_the_last_directory_name() {
        let root = Path::new("out");
        assert_eq!(
            rebase(Path::new("repo/casillas"), root),
            PathBuf::from("out/casillas")
        );
    }
}
