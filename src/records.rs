//! CSV record loading and role classification.
//!
//! Reads the user CSV (header row required: `username, firstname, lastname,
//! email, password, groups`) into typed [`UserRecord`]s and the admin CSV
//! into a username set. An absent admin file yields an empty set.

use crate::error::{Result, simple_error};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// One parsed input row. Immutable after parsing; `groups` holds the
/// trimmed, non-empty tokens of the `;`-separated groups field.
#[derive(Clone, Debug)]
pub struct UserRecord {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub groups: Vec<String>,
}

impl UserRecord {
    /// Space-joined first and last name, as rendered into the `cn` attribute.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Split a raw groups field on `;`, trimming each token and dropping empty
/// ones (blank field, trailing separators).
pub fn split_groups(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read all user records from `path`, in file order.
///
/// A missing required column is a data-contract violation and fails the run.
/// Duplicate usernames are kept (each row still renders its own entry) but
/// logged, since loading two entries under one DN will fail server-side.
pub fn read_users(path: &Path) -> Result<Vec<UserRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| simple_error(format!("failed to open {}: {}", path.display(), e)))?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            simple_error(format!(
                "{}: missing required column '{}'",
                path.display(),
                name
            ))
        })
    };
    let username_col = column("username")?;
    let firstname_col = column("firstname")?;
    let lastname_col = column("lastname")?;
    let email_col = column("email")?;
    let password_col = column("password")?;
    let groups_col = column("groups")?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let line = idx + 2; // header is line 1

        let username = field(&row, username_col, path, line)?;
        if !seen.insert(username.clone()) {
            warn!(username = %username, line, "duplicate username in input, rendering both entries");
        }
        records.push(UserRecord {
            first_name: field(&row, firstname_col, path, line)?,
            last_name: field(&row, lastname_col, path, line)?,
            email: field(&row, email_col, path, line)?,
            password: field(&row, password_col, path, line)?,
            groups: split_groups(&field(&row, groups_col, path, line)?),
            username,
        });
    }
    Ok(records)
}

fn field(row: &csv::StringRecord, col: usize, path: &Path, line: usize) -> Result<String> {
    row.get(col)
        .map(str::to_string)
        .ok_or_else(|| simple_error(format!("{}: line {} is truncated", path.display(), line)))
}

/// Read the admin username set from `path`. Only a `username` column is
/// required; an absent file is not an error and yields an empty set.
pub fn read_admins(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| simple_error(format!("failed to open {}: {}", path.display(), e)))?;

    let headers = reader.headers()?.clone();
    let username_col = headers.iter().position(|h| h == "username").ok_or_else(|| {
        simple_error(format!(
            "{}: missing required column 'username'",
            path.display()
        ))
    })?;

    let mut admins = HashSet::new();
    for row in reader.records() {
        let row = row?;
        if let Some(username) = row.get(username_col) {
            admins.insert(username.to_string());
        }
    }
    Ok(admins)
}

/// Partition records into (admin, standard) by membership in `admin_ids`,
/// preserving relative order within each partition.
pub fn classify<'a>(
    records: &'a [UserRecord],
    admin_ids: &HashSet<String>,
) -> (Vec<&'a UserRecord>, Vec<&'a UserRecord>) {
    records
        .iter()
        .partition(|record| admin_ids.contains(&record.username))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    fn tmp_path(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let n = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        p.push(format!("ugl_{tag}_{}_{}.csv", std::process::id(), n));
        p
    }

    fn mk_record(username: &str, groups: &[&str]) -> UserRecord {
        UserRecord {
            username: username.to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            email: format!("{username}@example.com"),
            password: "pw".to_string(),
            groups: groups.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn split_groups_trims_and_drops_empty_tokens() {
        assert_eq!(split_groups("eng;ops"), vec!["eng", "ops"]);
        assert_eq!(split_groups(" eng ; ops ;"), vec!["eng", "ops"]);
        assert_eq!(split_groups(""), Vec::<String>::new());
        assert_eq!(split_groups(" ; ; "), Vec::<String>::new());
    }

    #[test]
    fn read_users_basic() {
        let path = tmp_path("users");
        let data = "\
username,firstname,lastname,email,password,groups
jdoe,Jane,Doe,jdoe@x.com,secret,eng;ops
bob,Bob,Barker,bob@x.com,hunter2,
";
        fs::write(&path, data).unwrap();

        let users = read_users(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "jdoe");
        assert_eq!(users[0].full_name(), "Jane Doe");
        assert_eq!(users[0].groups, vec!["eng", "ops"]);
        assert_eq!(users[1].username, "bob");
        assert!(users[1].groups.is_empty());
    }

    #[test]
    fn read_users_missing_column_fails() {
        let path = tmp_path("badusers");
        let data = "\
username,firstname,lastname,email
jdoe,Jane,Doe,jdoe@x.com
";
        fs::write(&path, data).unwrap();

        let err = read_users(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn read_admins_absent_file_is_empty_set() {
        let path = tmp_path("noadmins");
        let admins = read_admins(&path).unwrap();
        assert!(admins.is_empty());
    }

    #[test]
    fn read_admins_collects_usernames() {
        let path = tmp_path("admins");
        let data = "\
username,firstname
alice,Alice
root,Root
";
        fs::write(&path, data).unwrap();

        let admins = read_admins(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(admins.len(), 2);
        assert!(admins.contains("alice"));
        assert!(admins.contains("root"));
    }

    #[test]
    fn classify_partitions_and_preserves_order() {
        let records = vec![
            mk_record("alice", &[]),
            mk_record("bob", &[]),
            mk_record("carol", &[]),
            mk_record("dave", &[]),
        ];
        let admin_ids: HashSet<String> =
            ["carol", "alice"].iter().map(|s| s.to_string()).collect();

        let (admins, standard) = classify(&records, &admin_ids);
        let admin_names: Vec<&str> = admins.iter().map(|r| r.username.as_str()).collect();
        let standard_names: Vec<&str> = standard.iter().map(|r| r.username.as_str()).collect();

        assert_eq!(admin_names, vec!["alice", "carol"]);
        assert_eq!(standard_names, vec!["bob", "dave"]);
    }

    #[test]
    fn classify_empty_admin_set_all_standard() {
        let records = vec![mk_record("alice", &[]), mk_record("bob", &[])];
        let (admins, standard) = classify(&records, &HashSet::new());
        assert!(admins.is_empty());
        assert_eq!(standard.len(), 2);
    }

    #[test]
    fn classify_ignores_admin_ids_not_in_records() {
        let records = vec![mk_record("bob", &[])];
        let admin_ids: HashSet<String> = ["ghost".to_string()].into_iter().collect();
        let (admins, standard) = classify(&records, &admin_ids);
        assert!(admins.is_empty());
        assert_eq!(standard.len(), 1);
    }
}
