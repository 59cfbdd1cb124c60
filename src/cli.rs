//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::sankey::StatementKind;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    /// Load assets from CSV instead of generating them.
    pub portfolio: Option<PathBuf>,
    pub portfolio_out: Option<PathBuf>,
    pub series_out: Option<PathBuf>,
    pub generation_out: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
    pub chart_out: Option<PathBuf>,
    /// Set by the `sankey` subcommand; projection options are then unused.
    pub sankey: Option<SankeyOptions>,
    pub help: bool,
}

/// Options of the `sankey` subcommand.
#[derive(Debug)]
pub struct SankeyOptions {
    pub kind: StatementKind,
    /// `Metric`/`Value` statement CSV.
    pub input: PathBuf,
    pub title: Option<String>,
    pub svg_out: Option<PathBuf>,
    pub links_out: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    if args.first().map(String::as_str) == Some("sankey") {
        return parse_sankey_args(&args[1..]);
    }

    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                if opts.seed.replace(seed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--scenario" | "--portfolio" | "--portfolio-out" | "--series-out"
            | "--generation-out" | "--summary-json" | "--chart-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    &format!("missing value for {flag} (expected a file path)"),
                )?;
                let slot = match flag {
                    "--scenario" => &mut opts.scenario,
                    "--portfolio" => &mut opts.portfolio,
                    "--portfolio-out" => &mut opts.portfolio_out,
                    "--series-out" => &mut opts.series_out,
                    "--generation-out" => &mut opts.generation_out,
                    "--summary-json" => &mut opts.summary_json,
                    _ => &mut opts.chart_out,
                };
                if slot.replace(PathBuf::from(path)).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.scenario.is_none() && opts.preset.is_none() {
        opts.preset = Some("baseline".to_string());
    }

    Ok(opts)
}

fn parse_sankey_args(args: &[String]) -> Result<CliOptions, String> {
    let mut kind = None;
    let mut input = None;
    let mut title = None;
    let (mut svg_out, mut links_out, mut json_out) = (None, None, None);

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => {
                return Ok(CliOptions {
                    help: true,
                    ..CliOptions::default()
                });
            }
            "--kind" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --kind")?;
                let parsed = StatementKind::from_name(name).ok_or_else(|| {
                    format!(
                        "--kind \"{name}\" is not one of: {}",
                        StatementKind::NAMES.join(", ")
                    )
                })?;
                if kind.replace(parsed).is_some() {
                    return Err("--kind provided more than once".to_string());
                }
            }
            "--title" => {
                i += 1;
                let text = args.next_or_err(i, "missing value for --title")?;
                if title.replace(text.to_string()).is_some() {
                    return Err("--title provided more than once".to_string());
                }
            }
            "--input" | "--out" | "--links-out" | "--json" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    &format!("missing value for {flag} (expected a file path)"),
                )?;
                let slot = match flag {
                    "--input" => &mut input,
                    "--out" => &mut svg_out,
                    "--links-out" => &mut links_out,
                    _ => &mut json_out,
                };
                if slot.replace(PathBuf::from(path)).is_some() {
                    return Err(format!("{flag} provided more than once"));
                }
            }
            other => return Err(format!("unknown sankey argument: {other}")),
        }
        i += 1;
    }

    let kind = kind.ok_or("sankey requires --kind (balance-sheet or cash-flow)")?;
    let input = input.ok_or("sankey requires --input <csv>")?;
    Ok(CliOptions {
        sankey: Some(SankeyOptions {
            kind,
            input,
            title,
            svg_out,
            links_out,
            json_out,
        }),
        ..CliOptions::default()
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("revenue-projector — wind portfolio revenue and NPV projection");
    eprintln!();
    eprintln!("Usage: revenue-projector [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, low_price, high_discount)");
    eprintln!("  --seed <u64>             Override the portfolio random seed");
    eprintln!("  --portfolio <path>       Load assets from CSV instead of generating them");
    eprintln!("  --portfolio-out <path>   Write the portfolio template CSV");
    eprintln!("  --series-out <path>      Write the annual series CSV");
    eprintln!("  --generation-out <path>  Write the per-asset generation CSV");
    eprintln!("  --summary-json <path>    Write the summary as JSON");
    eprintln!("  --chart-out <path>       Render the SVG chart");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!();
    eprintln!("Usage: revenue-projector sankey --kind <kind> --input <csv> [OPTIONS]");
    eprintln!();
    eprintln!("Sankey options:");
    eprintln!("  --kind <kind>            Statement layout: balance-sheet or cash-flow");
    eprintln!("  --input <path>           Statement CSV with Metric and Value columns");
    eprintln!("  --title <text>           Diagram title");
    eprintln!("  --out <path>             Render the SVG diagram");
    eprintln!("  --links-out <path>       Write the links as CSV");
    eprintln!("  --json <path>            Write nodes and links as JSON");
    eprintln!();
    eprintln!("Without output options the links are printed to stdout.");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;
    use crate::sankey::StatementKind;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_baseline_preset() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert!(opts.scenario.is_none());
        assert!(!opts.help);
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_args_from(&args(&["--scenario", "scenario.toml"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn parses_outputs_and_seed() {
        let opts = parse_args_from(&args(&[
            "--preset",
            "low_price",
            "--seed",
            "11",
            "--series-out",
            "series.csv",
            "--chart-out",
            "chart.svg",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.seed, Some(11));
        assert_eq!(
            opts.series_out.as_deref().and_then(|p| p.to_str()),
            Some("series.csv")
        );
        assert_eq!(
            opts.chart_out.as_deref().and_then(|p| p.to_str()),
            Some("chart.svg")
        );
        assert!(opts.generation_out.is_none());
    }

    #[test]
    fn rejects_conflicting_sources() {
        let err = parse_args_from(&args(&["--scenario", "a.toml", "--preset", "baseline"]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_repeated_and_unknown_flags() {
        assert!(parse_args_from(&args(&["--series-out", "a", "--series-out", "b"])).is_err());
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
        assert!(parse_args_from(&args(&["--seed", "abc"])).is_err());
        assert!(parse_args_from(&args(&["--chart-out"])).is_err());
    }

    #[test]
    fn parses_sankey_subcommand() {
        let opts = parse_args_from(&args(&[
            "sankey",
            "--kind",
            "cash-flow",
            "--input",
            "cash_flow.csv",
            "--out",
            "cf.svg",
            "--title",
            "Cash Flow 2024",
        ]))
        .expect("parse should succeed");
        let sankey = opts.sankey.expect("sankey options");
        assert_eq!(sankey.kind, StatementKind::CashFlow);
        assert_eq!(sankey.input.to_str(), Some("cash_flow.csv"));
        assert_eq!(sankey.svg_out.as_deref().and_then(|p| p.to_str()), Some("cf.svg"));
        assert_eq!(sankey.title.as_deref(), Some("Cash Flow 2024"));
        assert!(sankey.links_out.is_none());
        assert!(opts.preset.is_none());
    }

    #[test]
    fn sankey_requires_kind_and_input() {
        assert!(parse_args_from(&args(&["sankey", "--input", "a.csv"])).is_err());
        assert!(parse_args_from(&args(&["sankey", "--kind", "balance-sheet"])).is_err());
        assert!(
            parse_args_from(&args(&["sankey", "--kind", "income", "--input", "a.csv"])).is_err()
        );
        assert!(parse_args_from(&args(&["sankey", "--preset", "baseline"])).is_err());
        // Subcommand must come first.
        assert!(parse_args_from(&args(&["--preset", "baseline", "sankey"])).is_err());
    }

    #[test]
    fn help_short_circuits() {
        let opts = parse_args_from(&args(&["--help", "--bogus"])).expect("help parses");
        assert!(opts.help);
    }
}
