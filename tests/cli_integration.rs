//! End-to-end tests driving the `revenue-projector` binary.

use std::fs;
use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_revenue-projector"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(args)
        .output()
        .expect("revenue-projector process should run")
}

fn run_ok(args: &[&str]) -> String {
    let output = run(args);
    assert!(
        output.status.success(),
        "run {args:?} failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn parse_npv(stdout: &str) -> f64 {
    let label = "NPV of net cash flows:";
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing NPV line in output: {stdout}"));
    let raw = line.trim_start()[label.len()..].trim();
    let numeric = raw.trim_start_matches('£').trim_end_matches('m');
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from line `{line}`"))
}

#[test]
fn presets_produce_ordered_npvs() {
    let baseline = parse_npv(&run_ok(&["--preset", "baseline"]));
    let low_price = parse_npv(&run_ok(&["--preset", "low_price"]));
    let high_discount = parse_npv(&run_ok(&["--preset", "high_discount"]));

    assert!(baseline > 0.0);
    assert!(
        low_price < baseline,
        "low price NPV {low_price} should be below baseline {baseline}"
    );
    assert!(
        high_discount < baseline,
        "high discount NPV {high_discount} should be below baseline {baseline}"
    );
}

#[test]
fn scenario_file_matches_baseline_preset() {
    let from_file = parse_npv(&run_ok(&["--scenario", "scenarios/baseline.toml"]));
    let from_preset = parse_npv(&run_ok(&[]));
    assert_eq!(from_file, from_preset);
}

#[test]
fn long_life_scenario_runs() {
    let stdout = run_ok(&["--scenario", "scenarios/long_life.toml"]);
    assert!(stdout.lines().any(|l| l.starts_with("2054 |")));
}

#[test]
fn writes_all_requested_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    let (portfolio, series, generation, summary, chart) = (
        path("portfolio.csv"),
        path("series.csv"),
        path("generation.csv"),
        path("summary.json"),
        path("chart.svg"),
    );

    run_ok(&[
        "--portfolio-out",
        portfolio.as_str(),
        "--series-out",
        series.as_str(),
        "--generation-out",
        generation.as_str(),
        "--summary-json",
        summary.as_str(),
        "--chart-out",
        chart.as_str(),
    ]);

    let series_csv = fs::read_to_string(&series).expect("series csv written");
    // 1 header + 25 years
    assert_eq!(series_csv.lines().count(), 26);

    let portfolio_csv = fs::read_to_string(&portfolio).expect("portfolio csv written");
    assert_eq!(portfolio_csv.lines().next(), Some("asset,mw,commission_year"));
    assert_eq!(portfolio_csv.lines().count(), 121);

    let generation_csv = fs::read_to_string(&generation).expect("generation csv written");
    let header_cols = generation_csv.lines().next().map(|l| l.split(',').count());
    assert_eq!(header_cols, Some(121));

    let summary_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary json written"))
            .expect("valid JSON");
    assert!(summary_json["npv_m"].as_f64().is_some());

    assert!(
        fs::read_to_string(&chart)
            .expect("chart written")
            .contains("<svg")
    );
}

#[test]
fn loaded_portfolio_reproduces_generated_run() {
    let dir = tempfile::tempdir().expect("temp dir");
    let portfolio = dir.path().join("portfolio.csv");
    let portfolio = portfolio.to_string_lossy().into_owned();

    let generated = parse_npv(&run_ok(&["--portfolio-out", portfolio.as_str()]));
    let loaded = parse_npv(&run_ok(&["--portfolio", portfolio.as_str()]));
    assert_eq!(generated, loaded);
}

#[test]
fn invalid_scenario_fails_with_field_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let scenario = dir.path().join("bad.toml");
    fs::write(
        &scenario,
        "[economics]\nom_cost_ratio = 0.6\nmgmt_fee_ratio = 0.5\n",
    )
    .expect("write scenario");

    let scenario = scenario.to_string_lossy().into_owned();
    let output = run(&["--scenario", scenario.as_str()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("economics.om_cost_ratio"), "stderr: {stderr}");
}

#[test]
fn unknown_preset_and_missing_portfolio_fail() {
    assert!(!run(&["--preset", "nope"]).status.success());
    assert!(!run(&["--portfolio", "missing.csv"]).status.success());
}

#[test]
fn sankey_balance_sheet_writes_all_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    let (svg, links, json) = (path("bs.svg"), path("bs_links.csv"), path("bs.json"));

    run_ok(&[
        "sankey",
        "--kind",
        "balance-sheet",
        "--input",
        "statements/balance_sheet_example.csv",
        "--out",
        svg.as_str(),
        "--links-out",
        links.as_str(),
        "--json",
        json.as_str(),
    ]);

    let links_csv = fs::read_to_string(&links).expect("links csv written");
    assert_eq!(links_csv.lines().next(), Some("source,target,value"));
    // 3 funding links + 4 holding links
    assert_eq!(links_csv.lines().count(), 8);
    assert!(links_csv.contains("Net Assets / Equity,Balance Sheet,3000.0"));

    let diagram: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).expect("json written"))
            .expect("valid JSON");
    assert_eq!(diagram["title"], "Balance Sheet (balance_sheet_example)");
    assert_eq!(diagram["nodes"].as_array().map(Vec::len), Some(8));

    assert!(fs::read_to_string(&svg).expect("svg written").contains("<svg"));
}

#[test]
fn sankey_cash_flow_prints_links_without_outputs() {
    let stdout = run_ok(&[
        "sankey",
        "--kind",
        "cash-flow",
        "--input",
        "statements/cash_flow_example.csv",
        "--title",
        "Cash Flow example",
    ]);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.first().copied(), Some("Cash Flow example"));
    assert!(lines.contains(&"Operating Cash Flow -> Cash Available: 310.5"));
    assert!(lines.contains(&"Financing -> Debt Interest Payments: 60.2"));
    assert!(lines.contains(&"Cash Available -> Net increase in cash and cash equivalents: 45.2"));
}

#[test]
fn sankey_missing_metric_fails_with_field_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let statement = dir.path().join("partial.csv");
    fs::write(&statement, "Metric,Value\nNet assets / Equity,100\n").expect("write statement");

    let statement = statement.to_string_lossy().into_owned();
    let output = run(&["sankey", "--kind", "balance-sheet", "--input", statement.as_str()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("statement.metric"), "stderr: {stderr}");
    assert!(stderr.contains("Loans"), "stderr: {stderr}");
}
