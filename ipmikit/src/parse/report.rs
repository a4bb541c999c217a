//! Whitespace-aligned report tables (`user list`, `channel getciphers`).

use super::{Record, Value};

/// Convert a column-oriented report into one record per data row.
///
/// The first non-empty line is the header. Header and rows are split on
/// whitespace and zipped positionally, so a row with fewer fields than the
/// header yields a shorter record and extra header words are ignored.
pub fn outbuf_to_report(out_buf: &str) -> Vec<Record> {
    let lines: Vec<&str> = out_buf.lines().filter(|line| !line.is_empty()).collect();
    list_to_report(&lines, true)
}

/// Convert report lines into records. Fewer than two lines yields nothing.
pub fn list_to_report<S: AsRef<str>>(lines: &[S], to_lower: bool) -> Vec<Record> {
    let Some((header, rows)) = lines.split_first() else {
        return Vec::new();
    };
    if rows.is_empty() {
        return Vec::new();
    }

    let header = header.as_ref();
    let header = if to_lower {
        header.to_lowercase()
    } else {
        header.to_string()
    };
    let columns: Vec<&str> = header.split_whitespace().collect();

    rows.iter()
        .map(|row| {
            columns
                .iter()
                .zip(row.as_ref().split_whitespace())
                .map(|(column, field)| (column.to_string(), Value::from(field)))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::text_record;

    #[test]
    fn test_user_list() {
        let out_buf = "\
ID  Name\t     Callin  Link Auth\tIPMI Msg   Channel Priv Limit
1   root             false   true       true       ADMINISTRATOR
2   axzIDwnz         true    false      true       ADMINISTRATOR
";
        let users = outbuf_to_report(out_buf);
        assert_eq!(users.len(), 2);
        assert_eq!(
            users[0],
            text_record([
                ("id", "1"),
                ("name", "root"),
                ("callin", "false"),
                ("link", "true"),
                ("auth", "true"),
                ("ipmi", "ADMINISTRATOR"),
            ])
        );
        assert_eq!(users[1]["name"], Value::from("axzIDwnz"));
    }

    #[test]
    fn test_header_only() {
        assert!(outbuf_to_report("ID   IANA    Auth_Alg\n").is_empty());
        assert!(outbuf_to_report("").is_empty());
    }

    #[test]
    fn test_keep_case() {
        let records = list_to_report(&["ID Name", "1 root"], false);
        assert_eq!(records[0]["Name"], Value::from("root"));
    }
}
