use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use hai_cli::pipeline::{BatchRequest, SummaryRow, run_batch};
use hai_cli::worker::{BatchUpdate, spawn_batch};
use hai_standards::{Catalog, load_catalog, load_default_catalog};

use crate::cli::{CatalogArgs, ExtractArgs};
use crate::summary::{apply_table_style, dim_cell, header_cell, print_ordered, print_summary};

pub fn run_catalog(args: &CatalogArgs) -> Result<()> {
    let catalog = resolve_catalog(args.config.as_deref())?;
    println!("Entity label: {}", catalog.entity_label);
    println!("Totals patterns: {}", catalog.totals_patterns.join(", "));
    println!("Entity markers: {}", catalog.entity_markers.join(", "));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Report"),
        header_cell("Key"),
        header_cell("Fragment"),
        header_cell("Canonical names"),
    ]);
    apply_table_style(&mut table);
    for profile in &catalog.reports {
        for (idx, spec) in profile.indicators.iter().enumerate() {
            let names = spec
                .output_names()
                .iter()
                .map(|name| match catalog.output_position(name) {
                    Some(position) => format!("{}. {name}", position + 1),
                    None => format!("-. {name}"),
                })
                .collect::<Vec<_>>()
                .join("\n");
            let (label, key) = if idx == 0 {
                (Cell::new(&profile.label), Cell::new(profile.kind.as_str()))
            } else {
                (dim_cell(""), dim_cell(""))
            };
            table.add_row(vec![label, key, Cell::new(&spec.fragment), Cell::new(names)]);
        }
    }
    println!("{table}");
    Ok(())
}

pub fn run_extract(args: &ExtractArgs) -> Result<()> {
    let catalog = resolve_catalog(args.config.as_deref())?;
    let request = BatchRequest {
        input_dir: args.input_dir.clone(),
        output_dir: args.output_dir.clone(),
        output_path: args.output.clone(),
        format: args.format.into(),
        dry_run: args.dry_run,
    };

    if args.progress {
        let entity_label = catalog.entity_label.clone();
        let finished = run_with_progress(request, catalog)?;
        if args.json {
            print_json(&finished)?;
        } else {
            print_ordered(finished.output.as_deref(), &finished.ordered, &entity_label);
        }
        return Ok(());
    }

    let result = run_batch(&request, &catalog)
        .with_context(|| format!("summarize {}", args.input_dir.display()))?;
    if args.json {
        print_json(&result)?;
    } else {
        print_summary(&result, &catalog.entity_label);
    }
    Ok(())
}

#[derive(Serialize)]
struct Finished {
    output: Option<std::path::PathBuf>,
    ordered: Vec<SummaryRow>,
}

fn run_with_progress(request: BatchRequest, catalog: Catalog) -> Result<Finished> {
    let input_dir = request.input_dir.clone();
    let (sender, receiver) = mpsc::channel();
    let _handle = spawn_batch(request, catalog, sender);

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{elapsed}] {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("reading {}", input_dir.display()));

    // The channel closes when the worker thread exits.
    for update in receiver {
        match update {
            BatchUpdate::Log(line) => spinner.println(line),
            BatchUpdate::Finished { output, ordered } => {
                spinner.finish_and_clear();
                return Ok(Finished { output, ordered });
            }
            BatchUpdate::Failed { message } => {
                spinner.finish_and_clear();
                bail!("summarize {}: {message}", input_dir.display());
            }
        }
    }
    spinner.finish_and_clear();
    bail!("worker stopped without a result")
}

fn resolve_catalog(config: Option<&Path>) -> Result<Catalog> {
    match config {
        Some(path) => {
            let catalog = load_catalog(path)
                .with_context(|| format!("load catalog {}", path.display()))?;
            info!(path = %path.display(), reports = catalog.reports.len(), "catalog loaded");
            Ok(catalog)
        }
        None => load_default_catalog().context("load built-in catalog"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize result")?;
    println!("{json}");
    Ok(())
}
