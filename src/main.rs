use clap::Parser;
use serde::Serialize;
use sheet_planner::config::{DEFAULT_MIN_WASTE_SIZE, MergePolicy, PlannerConfig};
use sheet_planner::render;
use sheet_planner::solver::Solver;
use sheet_planner::summary::PlanSummary;
use sheet_planner::types::{CutRequest, PackingPlan, StockSpec, validate_input};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "sheet_planner",
    about = "Plan guillotine cuts of rectangular pieces from stock sheets"
)]
struct Cli {
    /// Stock sheet as WxH or WxH:qty (e.g. 244x122:4)
    #[arg(long)]
    stock: String,

    /// Pieces as WxH:qty, or WxH:qty:fixed to forbid rotating that piece
    #[arg(long = "cuts", num_args = 1..)]
    cuts: Vec<String>,

    /// Disable piece rotation
    #[arg(long)]
    no_rotate: bool,

    /// Smallest leftover side reported as a reusable waste piece
    #[arg(long, default_value_t = DEFAULT_MIN_WASTE_SIZE)]
    min_waste: f64,

    /// Free-rectangle merging: single-pass or fixed-point
    #[arg(long, default_value = "single-pass", value_parser = parse_merge_policy)]
    merge: MergePolicy,

    /// Evaluate sort strategies in parallel
    #[arg(long)]
    parallel: bool,

    /// Show ASCII layout of each sheet
    #[arg(long)]
    layout: bool,

    /// Print the plan and summary as JSON
    #[arg(long)]
    json: bool,

    /// Log each sheet pass and strategy to stderr
    #[arg(long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    plan: &'a PackingPlan,
    summary: &'a PlanSummary,
    exceeds_supply: bool,
}

fn parse_merge_policy(s: &str) -> Result<MergePolicy, String> {
    match s {
        "single-pass" => Ok(MergePolicy::SinglePass),
        "fixed-point" => Ok(MergePolicy::FixedPoint),
        _ => Err(format!(
            "invalid merge policy '{}', expected: single-pass or fixed-point",
            s
        )),
    }
}

fn parse_dimensions(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    Ok((width, height))
}

fn parse_quantity(s: &str, arg: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", arg))
}

fn parse_stock(s: &str) -> Result<StockSpec, String> {
    let (dims, qty) = match s.split_once(':') {
        Some((dims, qty)) => (dims, parse_quantity(qty, s)?),
        None => (s, 1),
    };
    let (width, height) = parse_dimensions(dims)?;
    Ok(StockSpec::new(width, height, qty))
}

fn parse_cut(s: &str) -> Result<CutRequest, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let (dims, qty, fixed) = match parts.as_slice() {
        [dims, qty] => (*dims, *qty, false),
        [dims, qty, "fixed"] => (*dims, *qty, true),
        _ => return Err(format!("invalid cut '{}', expected WxH:qty[:fixed]", s)),
    };
    let (width, height) = parse_dimensions(dims)?;
    let cut = CutRequest::new(width, height, parse_quantity(qty, s)?);
    Ok(if fixed { cut.fixed() } else { cut })
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let stock = parse_stock(&cli.stock).unwrap_or_else(|e| exit_with(e));
    let cuts: Vec<CutRequest> = cli
        .cuts
        .iter()
        .map(|c| parse_cut(c))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|e| exit_with(e));

    validate_input(&stock, &cuts).unwrap_or_else(|e| exit_with(e));
    if cli.min_waste.is_nan() || cli.min_waste < 0.0 {
        exit_with("--min-waste must be non-negative");
    }

    let config = PlannerConfig {
        allow_rotation: !cli.no_rotate,
        min_waste_size: cli.min_waste,
        merge_policy: cli.merge,
        parallel: cli.parallel,
    };
    let plan = Solver::new(stock, cuts, config)
        .solve()
        .unwrap_or_else(|e| exit_with(e));
    let summary = PlanSummary::from_sheets(&plan.sheets);

    if cli.json {
        let output = JsonOutput {
            plan: &plan,
            summary: &summary,
            exceeds_supply: plan.exceeds_supply(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => exit_with(e),
        }
        return;
    }

    for sheet in &plan.sheets {
        println!("Sheet {}:", sheet.sheet_index);
        for c in &sheet.cuts {
            let rot = if c.rotated { " [rotated]" } else { "" };
            println!("  {}x{} @ ({}, {}){}", c.width, c.height, c.x, c.y, rot);
        }
        for w in &sheet.waste_pieces {
            println!("  waste {}x{} @ ({}, {})", w.width, w.height, w.x, w.y);
        }
        if cli.layout {
            print!("{}", render::render_sheet(sheet));
        }
        println!();
    }

    print!("{summary}");
    println!("Best ordering: by {}", plan.strategy);
    if plan.exceeds_supply() {
        println!(
            "Warning: {} sheets needed but only {} in stock",
            plan.sheet_count(),
            stock.quantity
        );
    }
}
