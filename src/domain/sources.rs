//! Domain list sources: plain lists, directory listings and web server configs.

use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::error_handling::ConfigError;

/// nginx `server_name` and Apache `ServerName` / `ServerAlias` directives.
static VHOST_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:server_name|servername|serveralias)\s+([^;#\r\n]+)")
        .expect("vhost directive pattern is valid")
});

fn unreadable(path: &Path, source: io::Error) -> ConfigError {
    ConfigError::SourceUnreadable {
        path: path.display().to_string(),
        source,
    }
}

/// Reads domains from a line-oriented list.
///
/// Blank lines are skipped, `#` starts a comment, and a line may hold several
/// whitespace-separated domains.
pub fn read_domains<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut domains = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default();
        domains.extend(content.split_whitespace().map(str::to_string));
    }
    Ok(domains)
}

/// Reads a domain list file, or stdin when `path` is `-`.
pub fn read_domain_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let domains = if path.as_os_str() == "-" {
        info!("Reading domains from stdin");
        read_domains(io::stdin().lock())
    } else {
        let file = fs::File::open(path).map_err(|e| unreadable(path, e))?;
        read_domains(BufReader::new(file))
    }
    .map_err(|e| unreadable(path, e))?;

    info!("Read {} domain(s) from {}", domains.len(), path.display());
    Ok(domains)
}

/// Uses the entry names of a directory as domains, sorted by name.
///
/// Hidden entries and README files are skipped, which fits certificate stores
/// laid out as one directory per domain.
pub fn list_domain_directory(path: &Path) -> Result<Vec<String>, ConfigError> {
    let mut domains: Vec<String> = fs::read_dir(path)
        .map_err(|e| unreadable(path, e))?
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| !name.starts_with('.') && !name.eq_ignore_ascii_case("README"))
        .collect();
    domains.sort();

    info!("Found {} domain(s) in {}", domains.len(), path.display());
    Ok(domains)
}

/// Scrapes server names from a web server config file, or from every file in
/// a directory (not recursive, sorted by file name).
pub fn scrape_vhosts(path: &Path) -> Result<Vec<String>, ConfigError> {
    let files: Vec<PathBuf> = if path.is_dir() {
        let mut files: Vec<PathBuf> = fs::read_dir(path)
            .map_err(|e| unreadable(path, e))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.'))
            })
            .collect();
        files.sort();
        files
    } else {
        vec![path.to_path_buf()]
    };

    let mut text = String::new();
    for file in &files {
        debug!("Scraping server names from {}", file.display());
        text.push_str(&fs::read_to_string(file).map_err(|e| unreadable(file, e))?);
        text.push('\n');
    }

    let domains = scrape_vhost_text(&text);
    info!(
        "Scraped {} server name(s) from {}",
        domains.len(),
        path.display()
    );
    Ok(domains)
}

/// Extracts server names from config text, first-seen order, no duplicates.
///
/// Catch-all (`_`), `localhost`, wildcard and regex names are skipped and any
/// `:port` suffix is removed.
pub fn scrape_vhost_text(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for caps in VHOST_DIRECTIVE.captures_iter(text) {
        for token in caps[1].split_whitespace() {
            let Some(name) = clean_server_name(token) else {
                continue;
            };
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }

    names
}

fn clean_server_name(token: &str) -> Option<String> {
    let token = token.trim_end_matches(';').trim_matches('"');
    let name = match token.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => token,
    };

    let skip = name.is_empty()
        || name == "_"
        || name.eq_ignore_ascii_case("localhost")
        || name.contains('*')
        || name.starts_with('~')
        || name.starts_with('$');
    (!skip).then(|| name.to_string())
}
