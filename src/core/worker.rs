use crate::core::prober::Prober;
use crate::domain::model::{CheckOutcome, LogLine};
use crate::domain::ports::Resolver;
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio::sync::Mutex;

/// Shared per-run data every worker needs to classify a domain.
#[derive(Debug)]
pub struct WorkerContext {
    pub expected: HashSet<IpAddr>,
    pub time_log_format: String,
}

/// One worker of the fixed pool. Takes domains off the shared intake until
/// the queue is closed and drained; the queue itself decides which worker
/// gets a domain, so no domain is processed twice.
pub async fn run_worker<R: Resolver + ?Sized>(
    intake: Arc<Mutex<Receiver<String>>>,
    resolver: Arc<R>,
    prober: Prober,
    ok_sink: UnboundedSender<LogLine>,
    err_sink: UnboundedSender<String>,
    ctx: Arc<WorkerContext>,
) {
    loop {
        // the lock guards only the receive; it is released before checking
        let domain = { intake.lock().await.recv().await };
        let Some(domain) = domain else {
            break;
        };

        check_domain(&domain, resolver.as_ref(), &prober, &ok_sink, &err_sink, &ctx).await;
    }
}

/// Runs the per-domain checks in order: DNS, address count, address match,
/// then the URI probes. Every admitted domain yields exactly one ok message
/// or one to three error messages; errors never abort the run.
async fn check_domain<R: Resolver + ?Sized>(
    domain: &str,
    resolver: &R,
    prober: &Prober,
    ok_sink: &UnboundedSender<LogLine>,
    err_sink: &UnboundedSender<String>,
    ctx: &WorkerContext,
) {
    let addresses = match resolver.lookup(domain).await {
        Ok(addresses) => addresses,
        Err(e) => {
            let line = CheckOutcome::DnsError.log_line(
                &ctx.time_log_format,
                domain,
                &format!("Problem getting A records: {}", e),
            );
            let _ = err_sink.send(line);
            return;
        }
    };

    // Exactly one address is required: round-robin and CDN domains cannot be
    // verified against a fixed server set, so they are rejected.
    if addresses.len() != 1 {
        let line = CheckOutcome::MultipleAddresses.log_line(
            &ctx.time_log_format,
            domain,
            &format!("Got more than one returned IP address: {:?}", addresses),
        );
        let _ = err_sink.send(line);
        return;
    }

    if !ctx.expected.contains(&addresses[0]) {
        let line = CheckOutcome::WrongAddress.log_line(
            &ctx.time_log_format,
            domain,
            &format!("A record resolves to wrong IP address: {}", addresses[0]),
        );
        let _ = err_sink.send(line);
        return;
    }

    // the prober reports its own failures; only full success earns an ok line
    if prober.check(domain, err_sink).await {
        let line = CheckOutcome::Ok.log_line(&ctx.time_log_format, domain, "ok");
        let _ = ok_sink.send(LogLine::DomainOk(line));
    }
}
