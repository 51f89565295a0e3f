use crate::utils::error::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Applies the line pattern to every line of the configuration text and
/// collects the captured domain names. Duplicates collapse; order is
/// irrelevant downstream.
pub fn extract_domains(text: &str, pattern: &Regex) -> HashSet<String> {
    text.lines()
        .filter_map(|line| pattern.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Reads the configuration file and extracts the domain set. An unreadable
/// file is a fatal configuration error; the pipeline never starts.
pub fn domains_from_file(path: &Path, pattern: &Regex) -> Result<HashSet<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(extract_domains(&text, pattern))
}
