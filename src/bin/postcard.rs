use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use postcard_compositor::{ComposeRequest, Compositor, CompositorConfig, ExportFormat};

#[derive(Parser, Debug)]
#[command(name = "postcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a request into an image file.
    Compose(ComposeArgs),
    /// Print the resolved layout of a request as JSON.
    Geometry(GeometryArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Compose request JSON.
    #[arg(long)]
    request: PathBuf,

    /// Compositor config JSON. `POSTCARD_*` environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Root for relative image paths. Defaults to the request file's directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Override the request's export scale.
    #[arg(long)]
    export_scale: Option<f64>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Output format. Defaults to the config, or the output extension when it is known.
    #[arg(long, value_enum)]
    format: Option<FormatChoice>,
}

#[derive(Parser, Debug)]
struct GeometryArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Jpeg,
    Png,
}

impl From<FormatChoice> for ExportFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Jpeg => ExportFormat::Jpeg,
            FormatChoice::Png => ExportFormat::Png,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Geometry(args) => cmd_geometry(args),
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<CompositorConfig> {
    let mut config = match &common.config {
        Some(path) => CompositorConfig::from_path(path)?,
        None => CompositorConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(root) = &common.assets_root {
        config.assets_root = Some(root.clone());
    } else if config.assets_root.is_none() {
        let dir = common.request.parent().unwrap_or_else(|| Path::new("."));
        config.assets_root = Some(dir.to_path_buf());
    }
    Ok(config)
}

fn load_request(common: &CommonArgs) -> anyhow::Result<ComposeRequest> {
    let mut request = ComposeRequest::from_path(&common.request)?;
    if let Some(scale) = common.export_scale {
        request.export_scale = scale;
    }
    Ok(request)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.common)?;
    if let Some(choice) = args.format {
        config.format = choice.into();
    } else if let Some(format) = args
        .out
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ExportFormat::from_extension)
    {
        config.format = format;
    }
    let request = load_request(&args.common)?;

    let mut compositor = Compositor::new(config);
    let image = compositor.compose(&request)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &image.bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, {} bytes)",
        args.out.display(),
        image.width,
        image.height,
        image.bytes.len()
    );
    Ok(())
}

fn cmd_geometry(args: GeometryArgs) -> anyhow::Result<()> {
    let config = load_config(&args.common)?;
    let request = load_request(&args.common)?;

    let mut compositor = Compositor::new(config);
    let layout = compositor.layout(&request)?;
    let json = serde_json::to_string_pretty(&layout).context("serialize layout")?;
    println!("{json}");
    Ok(())
}
