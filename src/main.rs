mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossbeam::channel::unbounded;
use std::io::{self, BufRead};
use std::path::Path;
use std::thread;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use cli::Args;
use jobscan::config::Settings;
use jobscan::load::read_file;
use jobscan::query::{Filters, Selection, SortKey, evaluate};
use jobscan::record::Dimension;
use jobscan::render::{Presenter, Writer};
use jobscan::session::{Session, UiEvent};
use jobscan::store::JobStore;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings =
        Settings::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = &args.log_level {
        settings.log_level = level.clone();
    }
    if let Some(output) = &args.output {
        settings.output = output.clone();
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let selection = Selection {
        filters: filters_from(&args),
        sort: SortKey::from_name(args.sort.as_deref().unwrap_or(&settings.default_sort)),
    };
    let writer = Writer::create(&settings.output)?;

    if args.interactive {
        return run_interactive(&args, writer, selection);
    }

    let Some(file) = args.file.as_deref() else {
        bail!("no listing file given (pass FILE, or --interactive and `load <path>`)");
    };
    run_once(&args, file, writer, &selection)
}

fn filters_from(args: &Args) -> Filters {
    let mut filters = Filters::default();
    for (dim, value) in [
        (Dimension::Level, &args.level),
        (Dimension::Type, &args.kind),
        (Dimension::Skill, &args.skill),
    ] {
        if let Some(v) = value {
            filters.set(dim, v.as_str());
        }
    }
    filters
}

fn run_once(
    args: &Args,
    file: &Path,
    mut writer: Writer<io::Stdout>,
    selection: &Selection,
) -> Result<()> {
    let start_time = Instant::now();
    let file_size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);

    let records = match read_file(file) {
        Ok(records) => records,
        Err(err) => bail!(err.user_message()),
    };
    let mut store = JobStore::new();
    store.load(records);

    if args.options {
        writer.show_options(&store.facets())?;
    }

    let shown = evaluate(store.all(), &selection.filters, selection.sort);
    writer.show_listing(&shown)?;

    if let Some(n) = args.detail {
        match n.checked_sub(1).and_then(|i| shown.get(i)) {
            Some(job) => writer.show_detail(job)?,
            None => bail!("--detail {} is out of range ({} listed)", n, shown.len()),
        }
    }

    if args.benchmark {
        print_benchmark_results(file_size, &store, shown.len(), start_time.elapsed());
    }

    Ok(())
}

fn run_interactive(args: &Args, writer: Writer<io::Stdout>, selection: Selection) -> Result<()> {
    let (tx, rx) = unbounded::<UiEvent>();
    let mut session = Session::new(writer, tx.clone()).with_selection(selection);

    if let Some(file) = &args.file {
        tx.send(UiEvent::LoadRequested(file.clone()))?;
    }

    // stdin reader: one event per command line
    let input_tx = tx;
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match cli::parse_command(&line) {
                Ok(Some(event)) => {
                    let quit = matches!(event, UiEvent::Quit);
                    if input_tx.send(event).is_err() || quit {
                        return;
                    }
                }
                Ok(None) => {}
                Err(msg) => eprintln!("{}", msg),
            }
        }
        let _ = input_tx.send(UiEvent::Quit);
    });

    session.run(&rx)
}

fn print_benchmark_results(
    file_size: u64,
    store: &JobStore,
    shown: usize,
    duration: std::time::Duration,
) {
    let duration_secs = duration.as_secs_f64();
    let file_size_mb = file_size as f64 / (1024.0 * 1024.0);
    let total = store.len();

    eprintln!("\n=== BENCHMARK RESULTS ===");
    if let Some(at) = store.loaded_at() {
        eprintln!("Loaded at: {}", at.to_rfc3339());
    }
    eprintln!("File size: {:.2} MB", file_size_mb);
    eprintln!("Listings: {}", total);
    eprintln!("Shown: {}", shown);
    eprintln!("Processing time: {:.3}s", duration_secs);
    eprintln!("Throughput: {:.2} MB/s", file_size_mb / duration_secs);
    eprintln!("Throughput: {:.0} listings/s", total as f64 / duration_secs);
}
