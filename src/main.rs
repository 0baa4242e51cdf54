// File: ./src/main.rs
use anyhow::Result;
use clap::Parser;
use completionist::cli::{Cli, Command, ListArgs};
use completionist::config::Config;
use completionist::model::filter::{FilterSet, StatusFilter};
use completionist::model::record::{Screened, Status};
use completionist::stats::GroupBy;
use completionist::{export, query, render, stats};
use log::LevelFilter;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Refuse impossible filter bounds before the export is even opened.
    let criteria = cli.command.criteria()?;
    let json = match &cli.command {
        Command::Stats { json, .. } | Command::Years { json } => *json,
        Command::List(args) => args.json,
    };

    let config = Config::load()?;
    let export_path = config.resolve_export_path(cli.export.as_deref())?;
    let screened = export::load(&export_path)?;
    log::info!(
        "loaded {} records from '{}' ({} excluded)",
        screened.records.len(),
        export_path.display(),
        screened.excluded()
    );

    match cli.command {
        Command::Stats {
            include_planned,
            json,
        } => run_stats(&screened, &config, include_planned, json)?,
        Command::Years { json } => run_years(&screened, json)?,
        Command::List(args) => run_list(&screened, &config, &args, &criteria)?,
    }

    // In JSON mode the payload itself carries the excluded count.
    if !json {
        report_exclusions(&screened);
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = TermLogger::init(
        level,
        LogConfig::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Malformed entries were skipped, not dropped silently; say so next to the
/// normal output.
fn report_exclusions(screened: &Screened) {
    if let Some(note) = render::exclusion_note(screened.excluded()) {
        println!("{}", note);
    }
}

fn run_stats(
    screened: &Screened,
    config: &Config,
    include_planned: bool,
    json: bool,
) -> Result<()> {
    let mut summary = stats::summarize(&screened.records, GroupBy::Status);
    summary.seed_statuses();
    let denominator = config.denominator_statuses(include_planned);
    let rate = stats::completion_rate(&screened.records, &denominator);

    if json {
        let payload =
            render::stats_json(&summary, &rate, screened.records.len(), screened.excluded());
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render::status_table(&summary));
        print!("{}", render::rate_line(&rate));
    }
    Ok(())
}

fn run_years(screened: &Screened, json: bool) -> Result<()> {
    // Only terminal entries can be "finished"; the rest would distort the
    // undated row.
    let criteria = FilterSet {
        status: Some(StatusFilter::new([Status::Completed, Status::Dropped])),
        ..FilterSet::default()
    };
    let finished = query::run(&screened.records, &criteria);
    let summary = stats::summarize(&finished, GroupBy::FinishYear);

    if json {
        let payload = render::years_json(&summary, screened.excluded());
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", render::year_table(&summary));
    }
    Ok(())
}

fn run_list(
    screened: &Screened,
    config: &Config,
    args: &ListArgs,
    criteria: &FilterSet,
) -> Result<()> {
    let matches = query::run(&screened.records, criteria);

    if args.json {
        let payload = render::list_json(&matches, screened.excluded());
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let limit = args.limit.unwrap_or(config.default_limit);
    let shown = if limit == 0 || limit >= matches.len() {
        matches.len()
    } else {
        limit
    };
    print!("{}", render::record_table(&matches[..shown]));
    if shown < matches.len() {
        println!(
            "Showing {} of {} matches (raise --limit or pass --limit 0 for all)",
            shown,
            matches.len()
        );
    }
    Ok(())
}
