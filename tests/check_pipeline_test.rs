use async_trait::async_trait;
use domain_check::{CheckConfig, CheckEngine, CheckError, Resolver, Result};
use httpmock::prelude::*;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct MockResolver {
    table: HashMap<String, Vec<IpAddr>>,
}

impl MockResolver {
    fn new(entries: &[(&str, &[&str])]) -> Self {
        let table = entries
            .iter()
            .map(|(domain, addrs)| {
                (
                    domain.to_string(),
                    addrs.iter().map(|a| a.parse().unwrap()).collect(),
                )
            })
            .collect();
        Self { table }
    }
}

#[async_trait]
impl Resolver for MockResolver {
    async fn lookup(&self, domain: &str) -> Result<Vec<IpAddr>> {
        self.table
            .get(domain)
            .cloned()
            .ok_or_else(|| CheckError::DnsError(format!("no A records for {}", domain)))
    }
}

fn write_conf(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("nginx.conf");
    std::fs::write(&path, body).unwrap();
    path
}

fn test_config(conf: PathBuf, log_dir: PathBuf, port: u16) -> CheckConfig {
    CheckConfig {
        config_file: Some(conf),
        workers: 4,
        expected_addresses: vec!["127.0.0.1".parse().unwrap()],
        path1: "/alpha".to_string(),
        path2: "/beta".to_string(),
        timeout_secs: 2,
        http_port: port,
        domain_pattern: r"^\s*server_name\s+([A-Za-z0-9._-]+);\s*$".to_string(),
        log_dir: Some(log_dir),
        time_log_format: "%Y-%m-%d %H:%M:%S".to_string(),
        time_file_format: "%Y%m%d-%H%M".to_string(),
        verbose: false,
    }
}

/// Finds the single run log file with the given prefix in the log directory.
fn read_log(dir: &Path, prefix: &str) -> String {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".log"))
        })
        .collect();
    assert_eq!(matches.len(), 1, "expected one {}*.log file", prefix);
    std::fs::read_to_string(matches.pop().unwrap()).unwrap()
}

#[tokio::test]
async fn test_ok_and_wrong_address_domains() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    let alpha = server.mock(|when, then| {
        when.method(GET).path("/alpha");
        then.status(200);
    });
    let beta = server.mock(|when, then| {
        when.method(GET).path("/beta");
        then.status(200);
    });

    let conf = write_conf(
        temp.path(),
        "server {\n    server_name localhost;\n    server_name bad.example.com;\n}\n",
    );

    let resolver = Arc::new(MockResolver::new(&[
        ("localhost", &["127.0.0.1"]),
        ("bad.example.com", &["10.0.0.99"]),
    ]));

    let config = test_config(conf, temp.path().to_path_buf(), server.port());
    let engine = CheckEngine::new(config, resolver);
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.domains, 2);
    assert_eq!(stats.ok, 1);
    assert_eq!(stats.errors, 1);
    assert!(!stats.is_clean());

    // only the valid domain reached the prober
    alpha.assert_hits(1);
    beta.assert_hits(1);

    let main_log = read_log(temp.path(), "main.");
    assert!(main_log.contains("--> Starting"));
    assert!(main_log.contains("'localhost': ok"));
    assert!(main_log.contains("--> Finished"));
    assert!(main_log.contains("--> Domains:  2"));
    assert!(main_log.contains("--> Error:\t  1"));
    assert_eq!(main_log.lines().last().unwrap(), "\t\t    --> Ok:\t  1");

    let error_log = read_log(temp.path(), "error.");
    assert_eq!(error_log.lines().count(), 1);
    assert!(error_log.contains("'bad.example.com'"));
    assert!(error_log.contains("(e03)"));
    assert!(error_log.contains("10.0.0.99"));
}

#[tokio::test]
async fn test_empty_domain_set_is_a_clean_run() {
    let temp = TempDir::new().unwrap();
    let conf = write_conf(temp.path(), "listen 80;\nroot /var/www;\n");

    let resolver = Arc::new(MockResolver::new(&[]));
    let config = test_config(conf, temp.path().to_path_buf(), 80);
    let engine = CheckEngine::new(config, resolver);
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.domains, 0);
    assert_eq!(stats.ok, 0);
    assert_eq!(stats.errors, 0);
    assert!(stats.is_clean());

    let main_log = read_log(temp.path(), "main.");
    let lines: Vec<&str> = main_log.lines().collect();
    assert!(lines[0].contains("--> Starting"));
    assert!(main_log.contains("--> Domains:  0"));
    assert!(main_log.contains("--> Error:\t  0"));
    assert_eq!(*lines.last().unwrap(), "\t\t    --> Ok:\t  0");

    let error_log = read_log(temp.path(), "error.");
    assert!(error_log.is_empty());
}

#[tokio::test]
async fn test_error_count_matches_emitted_messages() {
    let temp = TempDir::new().unwrap();

    // a port nothing listens on, so the validated domain fails both probes
    let dead_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let conf = write_conf(
        temp.path(),
        concat!(
            "server_name gone.example.com;\n",
            "server_name multi.example.com;\n",
            "server_name localhost;\n",
        ),
    );

    let resolver = Arc::new(MockResolver::new(&[
        // gone.example.com is absent: DNS failure (e01)
        ("multi.example.com", &["127.0.0.1", "192.0.2.20"]),
        ("localhost", &["127.0.0.1"]),
    ]));

    let config = test_config(conf, temp.path().to_path_buf(), dead_port);
    let engine = CheckEngine::new(config, resolver);
    let stats = engine.run().await.unwrap();

    // e01 + e02 + e04 + e05
    assert_eq!(stats.domains, 3);
    assert_eq!(stats.ok, 0);
    assert_eq!(stats.errors, 4);

    let error_log = read_log(temp.path(), "error.");
    assert_eq!(error_log.lines().count() as u64, stats.errors);
    assert!(error_log.contains("(e01)"));
    assert!(error_log.contains("(e02)"));
    assert!(error_log.contains("(e04)"));
    assert!(error_log.contains("(e05)"));

    let main_log = read_log(temp.path(), "main.");
    assert!(main_log.contains("--> Error:\t  4"));
    assert_eq!(main_log.lines().last().unwrap(), "\t\t    --> Ok:\t  0");
}

#[tokio::test]
async fn test_duplicate_directives_check_once() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start();
    let alpha = server.mock(|when, then| {
        when.method(GET).path("/alpha");
        then.status(200);
    });
    let beta = server.mock(|when, then| {
        when.method(GET).path("/beta");
        then.status(200);
    });

    let conf = write_conf(
        temp.path(),
        "server_name localhost;\nserver_name localhost;\nserver_name localhost;\n",
    );

    let resolver = Arc::new(MockResolver::new(&[("localhost", &["127.0.0.1"])]));
    let config = test_config(conf, temp.path().to_path_buf(), server.port());
    let engine = CheckEngine::new(config, resolver);
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.domains, 1);
    assert_eq!(stats.ok, 1);
    assert_eq!(stats.errors, 0);
    alpha.assert_hits(1);
    beta.assert_hits(1);
}

#[tokio::test]
async fn test_missing_config_file_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = test_config(
        temp.path().join("does-not-exist.conf"),
        temp.path().to_path_buf(),
        80,
    );
    let resolver = Arc::new(MockResolver::new(&[]));
    let engine = CheckEngine::new(config, resolver);

    assert!(engine.run().await.is_err());

    // the pipeline never started: no log files were created
    let leftovers = std::fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
        .count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_many_domains_through_small_pool() {
    let temp = TempDir::new().unwrap();

    // more domains than workers so the intake queue actually fans out; each
    // resolves to a wrong address, producing exactly one e03 message apiece
    let mut body = String::new();
    let mut entries: Vec<(String, Vec<IpAddr>)> = Vec::new();
    for i in 0..20 {
        let domain = format!("host{}.example.com", i);
        body.push_str(&format!("server_name {};\n", domain));
        entries.push((domain, vec!["192.0.2.77".parse().unwrap()]));
    }
    let conf = write_conf(temp.path(), &body);

    let table: HashMap<String, Vec<IpAddr>> = entries.into_iter().collect();
    let resolver = Arc::new(MockResolver { table });

    let mut config = test_config(conf, temp.path().to_path_buf(), 80);
    config.workers = 4;
    let engine = CheckEngine::new(config, resolver);
    let stats = engine.run().await.unwrap();

    assert_eq!(stats.domains, 20);
    assert_eq!(stats.ok, 0);
    assert_eq!(stats.errors, 20);

    let error_log = read_log(temp.path(), "error.");
    assert_eq!(error_log.lines().count(), 20);
    assert!(error_log.lines().all(|l| l.contains("(e03)")));

    let main_log = read_log(temp.path(), "main.");
    assert!(main_log.contains("--> Error:\t  20"));
    assert_eq!(main_log.lines().last().unwrap(), "\t\t    --> Ok:\t  0");
}
