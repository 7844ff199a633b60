use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use spdlog::{info, warn};

use mdexport::auth::LocalOperator;
use mdexport::config::{find_config_file, read_config, CFG_FILE_NAME, SAMPLE_CONFIG};
use mdexport::content_query::FilePostRepository;
use mdexport::export::converter::HtmdConverter;
use mdexport::export::filter::{FIELD_CATEGORY, FIELD_DATE_FROM, FIELD_DATE_TO, FIELD_FILENAME, FIELD_TAG};
use mdexport::export::{ExportOrchestrator, ExportRequest};
use mdexport::form_data::FormData;
use mdexport::logger::configure_logger;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
enum Args {
    /// Exports posts to a ZIP archive without going through the web server
    Export(ExportArgs),
    /// Prints or writes a sample configuration
    SampleConfig(SampleConfigArgs),
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ExportArgs {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    /// Only posts with this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Only posts in this category
    #[arg(short = 'g', long)]
    category: Option<String>,

    /// Posts published on or after this day (YYYY-MM-DD)
    #[arg(long)]
    date_from: Option<String>,

    /// Posts published on or before this day (YYYY-MM-DD)
    #[arg(long)]
    date_to: Option<String>,

    /// Archive file name. Defaults to today's date
    #[arg(short, long)]
    filename: Option<String>,

    /// Directory where the archive is written
    #[arg(short, long, default_value = ".")]
    out_dir: String,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct SampleConfigArgs {
    /// Output file. Prints to stdout if empty
    #[arg(short, long)]
    output: Option<String>,
}

fn export_cmd(args: ExportArgs) -> Result<()> {
    let config_path = match args.config_path.map(PathBuf::from).or_else(|| find_config_file(CFG_FILE_NAME)) {
        Some(path) => path,
        None => return Err(anyhow!("Could not find {} configuration", CFG_FILE_NAME)),
    };
    let config = read_config(&config_path)?;
    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let fields: Vec<(&str, String)> = [
        (FIELD_TAG, args.tag),
        (FIELD_CATEGORY, args.category),
        (FIELD_DATE_FROM, args.date_from),
        (FIELD_DATE_TO, args.date_to),
        (FIELD_FILENAME, args.filename),
    ].into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
    let request = ExportRequest {
        admin_credential: None,
        form: FormData::from_pairs(fields),
    };

    let repository = FilePostRepository::new(config.paths.posts_dir.clone(), config.index_base_name(), &config.site.url);
    let converter = HtmdConverter::default();
    let operator = LocalOperator {};
    let mut orchestrator = ExportOrchestrator::new(&repository, &converter, &operator, config.export_settings());
    let exported = orchestrator.run(&request)?;

    let out_path = PathBuf::from(args.out_dir).join(&exported.file_name);
    fs::copy(exported.archive.path(), &out_path)?;
    info!("Archive written to {}", out_path.display());
    println!("{} posts exported to {} ({} skipped)", exported.exported, out_path.display(), exported.skipped);

    Ok(())
}

fn sample_config_cmd(args: SampleConfigArgs) -> Result<()> {
    match args.output {
        Some(output) => {
            fs::write(&output, SAMPLE_CONFIG)?;
            println!("Sample configuration written to {}", output);
        }
        None => std::io::stdout().write_all(SAMPLE_CONFIG.as_bytes())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args {
        Args::Export(args) => export_cmd(args),
        Args::SampleConfig(args) => sample_config_cmd(args),
    }
}
