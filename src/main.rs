//! Revenue projector entry point: CLI wiring, logging and output files.

use std::path::Path;
use std::process;

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};

use revenue_projector::chart::export_chart;
use revenue_projector::cli::{CliOptions, SankeyOptions, parse_args, print_usage};
use revenue_projector::config::ScenarioConfig;
use revenue_projector::io::export::{
    export_generation_csv, export_portfolio_csv, export_sankey_json, export_sankey_links_csv,
    export_series_csv,
};
use revenue_projector::io::import::{import_portfolio_csv, import_statement_csv};
use revenue_projector::portfolio::generate_portfolio;
use revenue_projector::projection::project;
use revenue_projector::reporting::{
    assumption_lines, export_summary_json, key_figure_lines, print_report,
};
use revenue_projector::sankey;
use revenue_projector::sankey::render::export_sankey_svg;

/// Loads the scenario: `--scenario` file or a named preset.
fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig> {
    let mut scenario = match (&cli.scenario, &cli.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path)?,
        (None, Some(name)) => ScenarioConfig::from_preset(name)?,
        (None, None) => ScenarioConfig::baseline(),
    };

    if let Some(seed) = cli.seed {
        scenario.portfolio.seed = seed;
    }

    let errors = scenario.validate();
    if let Some(first) = errors.first() {
        for e in &errors {
            error!("{e}");
        }
        return Err(anyhow!("{} invalid scenario field(s), first: {first}", errors.len()));
    }
    Ok(scenario)
}

fn run(cli: &CliOptions) -> Result<()> {
    let scenario = load_scenario(cli)?;
    let params = scenario.projection_params();
    let generator = scenario.generator_params();

    let (portfolio, generated) = match &cli.portfolio {
        Some(path) => {
            let p = import_portfolio_csv(path)
                .with_context(|| format!("failed to load portfolio {}", path.display()))?;
            info!(assets = p.len(), path = %path.display(), "loaded portfolio");
            (p, false)
        }
        None => (generate_portfolio(&generator)?, true),
    };

    let projection = project(&portfolio, &params)?;
    print_report(&projection.series, &projection.summary);

    write_output(cli.portfolio_out.as_deref(), "portfolio", |p| {
        export_portfolio_csv(&portfolio, p)
    })?;
    write_output(cli.series_out.as_deref(), "annual series", |p| {
        export_series_csv(projection.series.records(), p)
    })?;
    write_output(cli.generation_out.as_deref(), "generation table", |p| {
        export_generation_csv(&projection.table, p)
    })?;
    write_output(cli.summary_json.as_deref(), "summary", |p| {
        export_summary_json(&projection.summary, p)
    })?;

    if let Some(path) = &cli.chart_out {
        let key_figures = key_figure_lines(&projection.summary);
        let assumptions = assumption_lines(&params, generated.then_some(&generator));
        export_chart(
            &projection.series,
            &projection.summary,
            &key_figures,
            &assumptions,
            path,
        )?;
        info!(path = %path.display(), "chart written");
    }

    Ok(())
}

/// Builds a Sankey diagram from a statement CSV and writes the requested outputs.
fn run_sankey(opts: &SankeyOptions) -> Result<()> {
    let statement = import_statement_csv(&opts.input)
        .with_context(|| format!("failed to load statement {}", opts.input.display()))?;
    let title = opts.title.clone().unwrap_or_else(|| {
        let stem = opts.input.file_stem().unwrap_or_default().to_string_lossy();
        format!("{} ({stem})", opts.kind.label())
    });
    let diagram = sankey::build(opts.kind, &statement, title)?;
    info!(
        kind = opts.kind.name(),
        nodes = diagram.nodes().len(),
        links = diagram.links().len(),
        "built Sankey diagram"
    );

    if opts.svg_out.is_none() && opts.links_out.is_none() && opts.json_out.is_none() {
        println!("{}", diagram.title);
        for (source, target, value) in diagram.labelled_links() {
            println!("{source} -> {target}: {value:.1}");
        }
        return Ok(());
    }

    write_output(opts.links_out.as_deref(), "Sankey links", |p| {
        export_sankey_links_csv(&diagram, p)
    })?;
    write_output(opts.json_out.as_deref(), "Sankey JSON", |p| {
        export_sankey_json(&diagram, p)
    })?;
    if let Some(path) = &opts.svg_out {
        export_sankey_svg(&diagram, path)?;
        info!(path = %path.display(), "Sankey diagram written");
    }
    Ok(())
}

/// Runs `write` for an optional output path, attaching the path on failure.
fn write_output(
    path: Option<&Path>,
    what: &str,
    write: impl FnOnce(&Path) -> std::io::Result<()>,
) -> Result<()> {
    if let Some(path) = path {
        write(path).with_context(|| format!("failed to write {what} to {}", path.display()))?;
        info!(path = %path.display(), "{what} written");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        print_usage();
        return;
    }

    let result = match &cli.sankey {
        Some(opts) => run_sankey(opts),
        None => run(&cli),
    };
    if let Err(err) = result {
        error!("{err:#}");
        process::exit(1);
    }
}
