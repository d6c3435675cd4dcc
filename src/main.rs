//! page-reflow - headless overflow redistribution for template JSON

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use page_reflow::layout::renumber_template;
use page_reflow::{reflow_template, HeightEstimator, ReflowConfig, Template};

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "page-reflow")]
#[command(version, about = "Split overflowing pages into continuation subpages", long_about = None)]
#[command(after_help = "EXAMPLES:
    page-reflow report.json                  Reflow and print compact JSON
    page-reflow report.json --pretty         Pretty-print the result
    page-reflow report.json --numbering on   Number headings while reflowing")]
struct Cli {
    /// Template JSON file
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Config JSON file (missing keys keep their defaults)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the template's heading numbering switch
    #[arg(short, long, value_enum)]
    numbering: Option<Switch>,

    /// Visible height of every page surface
    #[arg(long, default_value_t = 960.0)]
    height: f32,

    /// Pretty-print the output
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> page_reflow::Result<String> {
    let config = match &cli.config {
        Some(path) => ReflowConfig::load(path)?,
        None => ReflowConfig::default(),
    };

    let mut template = Template::from_json(&std::fs::read_to_string(&cli.template)?)?;
    if let Some(switch) = cli.numbering {
        template.heading_numbering = matches!(switch, Switch::On);
        renumber_template(&mut template);
    }

    let before = template.surface_count();
    let template = reflow_template(template, config, HeightEstimator::default(), cli.height)?;
    log::info!(
        "{} pages, {} surfaces before, {} after",
        template.pages.len(),
        before,
        template.surface_count()
    );

    template.to_json(cli.pretty)
}
