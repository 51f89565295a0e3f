use crate::config::CheckConfig;
use crate::domain::model::CheckOutcome;
use crate::utils::error::Result;
use reqwest::Client;
use tokio::sync::mpsc::UnboundedSender;

/// Probes the two configured request paths on a validated domain.
///
/// Only transport-level failures count: a reachable server answering with a
/// non-2xx status is still considered available. Both requests always run to
/// completion so both can report their own failure.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    path1: String,
    path2: String,
    http_port: u16,
    time_log_format: String,
}

impl Prober {
    pub fn new(config: &CheckConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        Ok(Self {
            client,
            path1: config.path1.clone(),
            path2: config.path2.clone(),
            http_port: config.http_port,
            time_log_format: config.time_log_format.clone(),
        })
    }

    fn url_for(&self, domain: &str, path: &str) -> String {
        if self.http_port == 80 {
            format!("http://{}{}", domain, path)
        } else {
            format!("http://{}:{}{}", domain, self.http_port, path)
        }
    }

    /// Checks both paths concurrently and blocks until both complete; no
    /// early cancellation, so one domain can produce two error messages.
    /// Returns true iff neither request hit a transport error.
    pub async fn check(&self, domain: &str, errors: &UnboundedSender<String>) -> bool {
        let url1 = self.url_for(domain, &self.path1);
        let url2 = self.url_for(domain, &self.path2);

        let (first, second) = tokio::join!(self.fetch(&url1), self.fetch(&url2));

        if let Err(e) = &first {
            let line = CheckOutcome::Uri1Failure.log_line(
                &self.time_log_format,
                domain,
                &format!("Problem receiving uri1-resource: {}", e),
            );
            let _ = errors.send(line);
        }

        if let Err(e) = &second {
            let line = CheckOutcome::Uri2Failure.log_line(
                &self.time_log_format,
                domain,
                &format!("Problem receiving uri2-resource: {}", e),
            );
            let _ = errors.send(line);
        }

        first.is_ok() && second.is_ok()
    }

    async fn fetch(&self, url: &str) -> std::result::Result<(), reqwest::Error> {
        tracing::debug!("Probing {}", url);
        let response = self.client.get(url).send().await?;

        // Dropping the response releases the connection; the status code is
        // deliberately not inspected.
        drop(response);
        Ok(())
    }
}
