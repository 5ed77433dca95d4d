//! icon-sheet CLI - SVG symbol sheet to JSON icon set converter

use clap::{Parser, ValueEnum};
use icon_sheet::config::Config;
use icon_sheet::{export_json, export_json_to, import_sheet, FsSink, SheetSource};
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "icon-sheet")]
#[command(about = "Extract icons from an SVG symbol sheet into a JSON icon set")]
#[command(version)]
struct Cli {
    /// SVG sheet (or - for stdin)
    file: String,

    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Hoist common width/height to the top level
    #[arg(long)]
    optimize: bool,

    /// Icon set prefix (detected from keys when omitted)
    #[arg(long)]
    prefix: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report skipped symbols
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    config.merge_cli(cli.optimize, cli.prefix.clone(), cli.debug);

    let source = if cli.file == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        SheetSource::Markup(buffer)
    } else {
        SheetSource::File(PathBuf::from(&cli.file))
    };

    let mut collection = import_sheet(source, &config.import_options()).await?;
    if let Some(prefix) = &config.export.prefix {
        collection.prefix = Some(prefix.clone());
    }

    if cli.verbose {
        eprintln!("Imported {} icons", collection.len());
    }

    let options = config.export_options();

    if let OutputFormat::Text = cli.format {
        let json = export_json(&mut collection, &options);
        if let Some(prefix) = &json.prefix {
            println!("prefix: {}", prefix);
        }
        for (keyword, icon) in collection.iter() {
            println!("{}: {}x{}", keyword, icon.width, icon.height);
        }
        for (name, alias) in &json.aliases {
            println!("{} -> {}", name, alias.parent);
        }
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let sink = FsSink {
                pretty: config.export.pretty,
            };
            let json = export_json_to(&mut collection, path, &options, &sink).await?;
            if cli.verbose {
                eprintln!("Wrote {} icons to {}", json.icons.len(), path.display());
            }
        }
        None => {
            let json = export_json(&mut collection, &options);
            println!("{}", json.to_json_string(config.export.pretty)?);
        }
    }

    Ok(())
}
