// Local env file module
// Reads `KEY=VALUE` lines used to pre-populate the environment map at startup

use std::collections::HashMap;
use std::path::Path;

/// Read a key=value file. A missing or unreadable file yields an empty map.
pub fn read(path: &Path) -> HashMap<String, String> {
    std::fs::read_to_string(path)
        .map(|content| parse(&content))
        .unwrap_or_default()
}

/// Parse env file content
///
/// Each line is split at the first `=`; both sides are trimmed. Lines without `=`,
/// lines with a blank key and `#` comments are skipped.
pub fn parse(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_lines() {
        let vars = parse("RP_HOST=rp.example.com\n  RP_TOKEN = abc \nPORT=9090\n");
        assert_eq!(vars.get("RP_HOST").map(String::as_str), Some("rp.example.com"));
        assert_eq!(vars.get("RP_TOKEN").map(String::as_str), Some("abc"));
        assert_eq!(vars.get("PORT").map(String::as_str), Some("9090"));
    }

    #[test]
    fn test_value_keeps_later_equals() {
        let vars = parse("RP_TOKEN=a=b==\n");
        assert_eq!(vars.get("RP_TOKEN").map(String::as_str), Some("a=b=="));
    }

    #[test]
    fn test_skips_malformed_and_comments() {
        let vars = parse("# RP_HOST=commented\nnot a pair\n=orphan\n\r\nRP_PROJECT=p\r\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("RP_PROJECT").map(String::as_str), Some("p"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read(&dir.path().join(".env")).is_empty());
    }

    #[test]
    fn test_read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RP_PROJECT=nightly").unwrap();
        let vars = read(file.path());
        assert_eq!(vars.get("RP_PROJECT").map(String::as_str), Some("nightly"));
    }
}
