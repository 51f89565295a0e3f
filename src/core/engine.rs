use crate::config::CheckConfig;
use crate::core::prober::Prober;
use crate::core::worker::{run_worker, WorkerContext};
use crate::core::{sink, source};
use crate::domain::model::{LogLine, RunStats};
use crate::domain::ports::Resolver;
use crate::utils::error::{CheckError, Result};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Wires the pipeline: domain source, worker pool, prober and the two log
/// sinks, then runs the shutdown handshake in the order that makes the
/// final error count trustworthy.
pub struct CheckEngine<R: ?Sized> {
    config: CheckConfig,
    resolver: Arc<R>,
}

impl<R: Resolver + ?Sized + 'static> CheckEngine<R> {
    pub fn new(config: CheckConfig, resolver: Arc<R>) -> Self {
        Self { config, resolver }
    }

    /// Runs one complete check. Every discovered domain is processed to
    /// completion; per-domain failures are logged and counted, never fatal.
    ///
    /// Shutdown order is load-bearing: workers must all be done before the
    /// error channel closes, and the error sink must have drained before
    /// its count goes into the summary block, which in turn precedes the
    /// normal channel closing.
    pub async fn run(&self) -> Result<RunStats> {
        let pattern = self.config.compiled_pattern()?;
        let config_file =
            self.config
                .config_file
                .as_deref()
                .ok_or_else(|| CheckError::ConfigError {
                    message: "no configuration file given".to_string(),
                })?;

        // configuration errors abort before the pipeline starts
        let domains = source::domains_from_file(config_file, &pattern)?;
        tracing::info!("Discovered {} unique domains", domains.len());

        let start = Local::now();
        let started = Instant::now();

        let log_dir = self.config.resolve_log_dir()?;
        let stamp = start.format(&self.config.time_file_format).to_string();
        let main_path = log_dir.join(format!("main.{}.log", stamp));
        let error_path = log_dir.join(format!("error.{}.log", stamp));

        let main_file = sink::open_log_file(&main_path).await?;
        let error_file = sink::open_log_file(&error_path).await?;

        let (ok_tx, ok_rx) = mpsc::unbounded_channel();
        let (err_tx, err_rx) = mpsc::unbounded_channel();

        let error_sink = sink::spawn_error_sink(error_file, err_rx, error_path);
        let main_sink = sink::spawn_main_sink(main_file, ok_rx, main_path);

        let _ = ok_tx.send(LogLine::Status(format!(
            "{} --> Starting",
            start.format(&self.config.time_log_format)
        )));

        let prober = Prober::new(&self.config)?;
        let ctx = Arc::new(WorkerContext {
            expected: self.config.expected_set(),
            time_log_format: self.config.time_log_format.clone(),
        });

        let (intake_tx, intake_rx) = mpsc::channel::<String>(self.config.workers);
        let intake = Arc::new(Mutex::new(intake_rx));

        let mut pool = JoinSet::new();
        for _ in 0..self.config.workers {
            pool.spawn(run_worker(
                intake.clone(),
                self.resolver.clone(),
                prober.clone(),
                ok_tx.clone(),
                err_tx.clone(),
                ctx.clone(),
            ));
        }

        for domain in &domains {
            // workers keep receiving until every sender is gone, so this
            // only fails if the whole pool died; nothing to do about it here
            let _ = intake_tx.send(domain.clone()).await;
        }
        drop(intake_tx);

        // wait-group: the pool must be idle before the error channel closes
        while let Some(joined) = pool.join_next().await {
            joined?;
        }

        // workers dropped their error senders when they exited; dropping
        // ours closes the channel and lets the error sink drain out
        drop(err_tx);
        let errors = error_sink.await?;

        let elapsed = started.elapsed();
        let now = Local::now().format(&self.config.time_log_format);
        let _ = ok_tx.send(LogLine::Status(format!("{} --> Finished", now)));
        let _ = ok_tx.send(LogLine::Status(format!(
            "\t\t    --> Duration: {:?}",
            elapsed
        )));
        let _ = ok_tx.send(LogLine::Status(format!(
            "\t\t    --> Domains:  {}",
            domains.len()
        )));
        let _ = ok_tx.send(LogLine::Status(format!("\t\t    --> Error:\t  {}", errors)));

        drop(ok_tx);
        let ok = main_sink.await?;

        Ok(RunStats {
            domains: domains.len(),
            ok,
            errors,
            elapsed,
        })
    }
}
