// /////////////////////////////////////////////////////////////////////////////
// LeakSift
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LeakSift CLI Application
//!
//! Entry point for the stealer-log parsing engine. Wires the bootstrap
//! layer (CLI, logging, shutdown), the definition store and strategy
//! registry, the leak processor, and the PostgreSQL sink, then runs a
//! bounded worker pool with one task per input archive.
//!
//! ## Usage
//!
//! ```bash
//! # Parse one unpacked leak directory and export to the sink
//! leaksift /data/leaks/2024-03-dump/
//!
//! # Parse several leaks, four at a time, without exporting
//! leaksift --no-export /data/leaks/a /data/leaks/b /data/leaks/c
//!
//! # Keep a JSON copy of the parsed output
//! leaksift --dump-json parsed.json /data/leaks/a
//! ```
//!
//! ## Configuration
//!
//! Settings layer defaults → `leaksift.toml` → `LEAKSIFT_*` environment
//! variables (`LEAKSIFT_DB_HOST`, `LEAKSIFT_PARSER_MATCH_THRESHOLD`, ...).
//! See the settings module for the full option set.
//!
//! ## Concurrency
//!
//! Each leak is processed sequentially on a blocking thread (the pipeline
//! is CPU-bound regex work); the worker pool bounds how many leaks are in
//! flight at once. Every worker owns its aggregator; the definition store
//! and strategy registry are shared read-only. Ctrl-C cancels
//! cooperatively between files.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use leaksift_bootstrap::{bootstrap_cli, init_logging, CancellationToken, ShutdownCoordinator};
use leaksift_domain::entities::Leak;
use leaksift_domain::services::{Archive, LeakSink};

use leaksift::application::services::LeakProcessor;
use leaksift::infrastructure::archive::DirectoryArchive;
use leaksift::infrastructure::config::Settings;
use leaksift::infrastructure::parsing::{
    DefinitionStore, ParserFactory, ParserSelector, StrategyRegistry,
};
use leaksift::infrastructure::repositories::PostgresLeakSink;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("leaksift: {err}");
            return ExitCode::from(2);
        }
    };
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: leaksift_bootstrap::ValidatedCli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    let shutdown = ShutdownCoordinator::new();
    shutdown.install_ctrl_c_handler();

    let definition_dirs: Vec<PathBuf> = settings
        .record_definitions_dirs
        .iter()
        .map(PathBuf::from)
        .collect();
    let store = DefinitionStore::load(&definition_dirs)?;
    info!(definitions = store.len(), "definition store ready");

    let factory = ParserFactory::new(Arc::new(StrategyRegistry::with_builtin_strategies()));
    let selector = Arc::new(ParserSelector::new(
        store,
        factory,
        settings.parser_match_threshold,
        settings.prefer_definition_parsers,
    ));
    let processor = Arc::new(LeakProcessor::new(selector, &settings.user_file_keywords));

    let sink = if cli.no_export {
        None
    } else {
        let sink = PostgresLeakSink::connect(&settings)
            .await
            .context("sink connection failed")?;
        sink.ping().await.context("sink ping failed")?;
        if settings.db_create_schema {
            sink.recreate_schema().await?;
        } else {
            sink.ensure_schema().await?;
        }
        Some(Arc::new(sink))
    };

    let semaphore = Arc::new(Semaphore::new(settings.worker_count.max(1)));
    let mut workers = JoinSet::new();
    let multiple_inputs = cli.inputs.len() > 1;
    let dump_json = cli.dump_json.clone();

    for (index, input) in cli.inputs.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let processor = Arc::clone(&processor);
        let sink = sink.clone();
        let token = shutdown.token();
        let dump_target = dump_json
            .as_deref()
            .map(|base| dump_path(base, index, multiple_inputs));
        workers.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            process_input(input, processor, sink, token, dump_target).await
        });
    }

    let mut failures = 0usize;
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                error!("{err:#}");
                failures += 1;
            }
            Err(err) => {
                error!("worker panicked: {err}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        bail!("{failures} input(s) failed");
    }
    Ok(())
}

/// Process one input end to end: parse on a blocking thread, optionally
/// dump JSON, then export.
async fn process_input(
    input: PathBuf,
    processor: Arc<LeakProcessor>,
    sink: Option<Arc<PostgresLeakSink>>,
    token: CancellationToken,
    dump_json: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !input.is_dir() {
        bail!(
            "{}: container decompression is external; unpack the archive and pass the directory",
            input.display()
        );
    }

    let parse_result = tokio::task::spawn_blocking(move || {
        let mut archive = DirectoryArchive::open(&input)?;
        let result = processor.process_leak(&archive, &token);
        archive.close();
        result
    })
    .await
    .context("leak worker crashed")?;

    let leak = match parse_result {
        Err(err) if err.is_cancellation() => {
            warn!(error = %err, "leak aborted by shutdown");
            return Ok(());
        }
        other => other?,
    };
    info!(
        leak = %leak.filename,
        systems = leak.systems.len(),
        records = leak.systems.iter().map(|s| s.record_count()).sum::<usize>(),
        "leak parsed"
    );

    if let Some(path) = dump_json {
        dump_leak_json(&path, &leak)?;
    }

    if let Some(sink) = sink {
        let stats = sink.export_leak(&leak).await?;
        info!(
            leak = %leak.filename,
            systems = stats.systems,
            credentials = stats.credentials,
            cookies = stats.cookies,
            vaults = stats.vaults,
            user_files = stats.user_files,
            "export completed"
        );
    }
    Ok(())
}

/// Target path for a JSON dump; multiple inputs get a 1-based index
/// between stem and extension.
fn dump_path(base: &Path, index: usize, multiple: bool) -> PathBuf {
    if !multiple {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("leak");
    let extension = base
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("json");
    base.with_file_name(format!("{stem}.{}.{extension}", index + 1))
}

fn dump_leak_json(path: &Path, leak: &Leak) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(leak)?;
    std::fs::write(path, json)
        .with_context(|| format!("writing JSON dump to {}", path.display()))?;
    info!(path = %path.display(), "JSON dump written");
    Ok(())
}
