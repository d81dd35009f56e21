//! Connection profiles read from a pgpass-style credentials file.
//!
//! This module handles:
//! - Loading `host:port:database:username:secret` lines from ~/.pgpass
//! - Skipping comments, blank lines and malformed entries
//! - The composite label shown in the list and matched by the filter
//! - Substring filtering over a connection list

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Number of colon-separated fields in a well-formed entry.
const FIELD_COUNT: usize = 5;

/// Wildcard value pgpass allows in any field but the secret.
pub const WILDCARD: &str = "*";

/// Errors raised while reading a credentials source.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The credentials file could not be opened or read.
    #[error("cannot read credentials file {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A password that never shows up in Debug output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the raw value. Callers must not display or log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(********)")
    }
}

/// One parsed credentials entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: String,
    pub port: String,
    pub database: String,
    pub username: String,
    pub secret: Secret,
}

impl Connection {
    /// Parse a single line. Returns `None` for blank lines, comments and
    /// anything that does not split into five non-empty fields.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if is_blank_or_comment(line) {
            return None;
        }

        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != FIELD_COUNT || fields.iter().any(|f| f.is_empty()) {
            return None;
        }

        Some(Self {
            host: fields[0].to_string(),
            port: fields[1].to_string(),
            database: fields[2].to_string(),
            username: fields[3].to_string(),
            secret: Secret::new(fields[4]),
        })
    }

    /// Composite label: `username@host:port/database`.
    ///
    /// This is both what the list renders and what the filter matches, so
    /// users always type against what they see.
    pub fn label(&self) -> String {
        format!(
            "{}@{}:{}/{}",
            self.username, self.host, self.port, self.database
        )
    }

    /// Check the label against a filter query (case-sensitive substring).
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.label().contains(query)
    }
}

/// Lines that are skipped silently rather than reported as malformed.
fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse every well-formed entry in `content`, keeping file order.
pub fn parse_connections(content: &str) -> Vec<Connection> {
    collect_entries(content.lines().map(Some))
}

/// Like [`parse_connections`], for raw file contents. A line that is not
/// valid UTF-8 is malformed and skipped; the rest of the file still loads.
pub fn parse_connection_bytes(content: &[u8]) -> Vec<Connection> {
    collect_entries(
        content
            .split(|b| *b == b'\n')
            .map(|line| std::str::from_utf8(line).ok()),
    )
}

/// `None` marks a line that could not be decoded.
fn collect_entries<'a>(lines: impl Iterator<Item = Option<&'a str>>) -> Vec<Connection> {
    let mut connections = Vec::new();
    for (idx, line) in lines.enumerate() {
        match line.map(|l| (l, Connection::parse_line(l))) {
            Some((_, Some(conn))) => connections.push(conn),
            Some((l, None)) if is_blank_or_comment(l) => {}
            _ => {
                // Never log the line itself, it may hold a secret.
                debug!(line = idx + 1, "skipping malformed credentials entry");
            }
        }
    }
    connections
}

/// Load connections from a credentials file.
pub fn load_connections(path: &Path) -> Result<Vec<Connection>, StoreError> {
    let content = std::fs::read(path).map_err(|source| StoreError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let connections = parse_connection_bytes(&content);
    info!(
        path = %path.display(),
        count = connections.len(),
        "loaded connections"
    );
    Ok(connections)
}

/// Keep the connections whose label contains `query`, in their original order.
///
/// An empty query returns the input unchanged.
pub fn filter_connections(connections: &[Connection], query: &str) -> Vec<Connection> {
    if query.is_empty() {
        return connections.to_vec();
    }
    connections
        .iter()
        .filter(|c| c.matches(query))
        .cloned()
        .collect()
}

/// Returns the default credentials file path (~/.pgpass)
pub fn default_pgpass_path() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".pgpass"))
}

/// Somewhere connections can be (re)loaded from.
pub trait ConnectionSource {
    fn load(&self) -> Result<Vec<Connection>, StoreError>;

    /// Human-readable origin, used in status messages.
    fn describe(&self) -> String;
}

/// A credentials file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgpassFile {
    path: PathBuf,
}

impl PgpassFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionSource for PgpassFile {
    fn load(&self) -> Result<Vec<Connection>, StoreError> {
        load_connections(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn conn(host: &str, database: &str, username: &str) -> Connection {
        Connection {
            host: host.to_string(),
            port: "5432".to_string(),
            database: database.to_string(),
            username: username.to_string(),
            secret: Secret::new("pw"),
        }
    }

    #[test]
    fn test_parse_line_well_formed() {
        let c = Connection::parse_line("db1:5432:appdb:alice:secretA").unwrap();
        assert_eq!(c.host, "db1");
        assert_eq!(c.port, "5432");
        assert_eq!(c.database, "appdb");
        assert_eq!(c.username, "alice");
        assert_eq!(c.secret.expose(), "secretA");
    }

    #[test]
    fn test_parse_line_wrong_field_count() {
        assert!(Connection::parse_line("bad:line").is_none());
        assert!(Connection::parse_line("a:b:c:d").is_none());
        // No escaping: a colon in the secret makes six fields.
        assert!(Connection::parse_line("h:1:db:u:pa:ss").is_none());
    }

    #[test]
    fn test_parse_line_empty_field_is_malformed() {
        assert!(Connection::parse_line("h::db:u:pw").is_none());
        assert!(Connection::parse_line("h:5432:db:u:").is_none());
    }

    #[test]
    fn test_parse_line_blank_and_comment() {
        assert!(Connection::parse_line("").is_none());
        assert!(Connection::parse_line("   ").is_none());
        assert!(Connection::parse_line("# h:5432:db:u:pw").is_none());
        assert!(Connection::parse_line("  # indented comment").is_none());
    }

    #[test]
    fn test_parse_line_strips_carriage_return() {
        let c = Connection::parse_line("h:5432:db:u:pw\r").unwrap();
        assert_eq!(c.secret.expose(), "pw");
    }

    #[test]
    fn test_parse_connections_keeps_order_and_duplicates() {
        let content = "\
# production
db2:5432:appdb:bob:secretB
db1:5432:appdb:alice:secretA

bad:line
db2:5432:appdb:bob:secretB
";
        let conns = parse_connections(content);
        let hosts: Vec<&str> = conns.iter().map(|c| c.host.as_str()).collect();
        assert_eq!(hosts, vec!["db2", "db1", "db2"]);
    }

    #[test]
    fn test_label_format() {
        let c = conn("db1", "appdb", "alice");
        assert_eq!(c.label(), "alice@db1:5432/appdb");
    }

    #[test]
    fn test_secret_debug_is_masked() {
        let c = Connection::parse_line("h:5432:db:u:hunter2").unwrap();
        let debug = format!("{:?}", c);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("********"));
    }

    #[test]
    fn test_filter_empty_query_returns_all() {
        let all = vec![conn("a", "x", "u"), conn("b", "y", "u")];
        assert_eq!(filter_connections(&all, ""), all);
    }

    #[test]
    fn test_filter_is_case_sensitive_substring() {
        let all = vec![
            conn("db1", "appdb", "alice"),
            conn("DB1", "appdb", "bob"),
            conn("db2", "other", "carol"),
        ];
        let result = filter_connections(&all, "db1");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].username, "alice");

        let result = filter_connections(&all, "appdb");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].username, "alice");
        assert_eq!(result[1].username, "bob");
    }

    #[test]
    fn test_filter_does_not_match_secret() {
        let all = vec![conn("db1", "appdb", "alice")];
        assert!(filter_connections(&all, "pw").is_empty());
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let all = vec![conn("db1", "appdb", "alice")];
        assert!(filter_connections(&all, "zzz").is_empty());
    }

    #[test]
    fn test_load_connections_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "db1:5432:appdb:alice:secretA").unwrap();
        writeln!(file, "db2:5432:appdb:bob:secretB").unwrap();
        writeln!(file, "bad:line").unwrap();

        let conns = load_connections(file.path()).unwrap();
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[0].host, "db1");
        assert_eq!(conns[1].host, "db2");
    }

    #[test]
    fn test_load_connections_skips_non_utf8_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"db1:5432:appdb:alice:secretA\n").unwrap();
        file.write_all(b"db2:5432:appdb:bob:p\xe4ss\n").unwrap();
        file.write_all(b"db3:5432:appdb:carol:secretC\r\n").unwrap();

        let conns = load_connections(file.path()).unwrap();
        let hosts: Vec<&str> = conns.iter().map(|c| c.host.as_str()).collect();
        assert_eq!(hosts, vec!["db1", "db3"]);
        assert_eq!(conns[1].secret.expose(), "secretC");
    }

    #[test]
    fn test_whitespace_only_lines_are_blank() {
        assert!(is_blank_or_comment(" \t "));
        assert!(is_blank_or_comment("\r"));
        assert!(is_blank_or_comment("   # note"));
        assert!(!is_blank_or_comment("h:5432:db:u:pw"));
        assert!(Connection::parse_line(" \t ").is_none());
        assert_eq!(parse_connections(" \t \n\nh:5432:db:u:pw\n").len(), 1);
    }

    #[test]
    fn test_load_connections_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist");

        let err = load_connections(&path).unwrap_err();
        match err {
            StoreError::SourceUnavailable { path: p, .. } => assert_eq!(p, path),
        }
    }

    #[test]
    fn test_pgpass_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "h:5432:db:u:pw").unwrap();

        let source = PgpassFile::new(file.path());
        assert_eq!(source.load().unwrap().len(), 1);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn arb_field() -> impl Strategy<Value = String> {
            "[a-c1-3]{1,3}"
        }

        fn arb_connection() -> impl Strategy<Value = Connection> {
            (arb_field(), arb_field(), arb_field(), arb_field()).prop_map(
                |(host, port, database, username)| Connection {
                    host,
                    port,
                    database,
                    username,
                    secret: Secret::new("pw"),
                },
            )
        }

        proptest! {
            /// Filtering yields an order-preserving subsequence of matches.
            #[test]
            fn filter_is_ordered_subsequence(
                all in prop::collection::vec(arb_connection(), 0..20),
                query in "[a-c1-3@:/]{0,3}",
            ) {
                let result = filter_connections(&all, &query);

                for c in &result {
                    prop_assert!(c.label().contains(&query));
                }

                let mut rest = all.iter();
                for c in &result {
                    prop_assert!(rest.any(|a| a == c), "result is not a subsequence");
                }

                let expected = all.iter().filter(|c| c.label().contains(&query)).count();
                prop_assert_eq!(result.len(), expected);

                if query.is_empty() {
                    prop_assert_eq!(&result, &all);
                }
            }
        }
    }
}
