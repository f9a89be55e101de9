//! Mode resolution and run orchestration.
//!
//! One call to [`run`] performs a full conversion pass: load the admin set
//! and the user records, resolve the output mode, clear stale documents,
//! then render and write the three LDIF documents. The caller gets a
//! [`RunSummary`] back; all console output is the caller's business.

use crate::config::Config;
use crate::error::{Result, simple_error};
use crate::groups::index_groups;
use crate::hash::sha_password;
use crate::ldif::Renderer;
use crate::records::{UserRecord, classify, read_admins, read_users};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which population the input was judged to hold.
///
/// Under the current output layout every run writes the same three
/// documents; the mode is resolved for operator feedback and recorded in
/// the [`RunSummary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Input contains only known admin users.
    Admins,
    /// Input contains only users outside the admin set.
    Additional,
    /// Input mixes admin and non-admin users.
    All,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Admins => "admins",
            Mode::Additional => "additional",
            Mode::All => "all",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the output mode. Priority: caller-forced mode, then filename
/// tokens (`admins` / `users`), then record-content inspection against the
/// admin set. Empty input falls back to [`Mode::Additional`].
pub fn resolve_mode(
    forced: Option<Mode>,
    input_path: &Path,
    records: &[UserRecord],
    admin_ids: &HashSet<String>,
) -> Mode {
    if let Some(mode) = forced {
        info!(mode = %mode, "forced mode");
        return mode;
    }

    let name = input_path.to_string_lossy().to_lowercase();
    if name.contains("admins") {
        info!("auto-detected mode 'admins' (filename suggests admin users)");
        return Mode::Admins;
    }
    if name.contains("users") {
        info!("auto-detected mode 'additional' (filename suggests additional users)");
        return Mode::Additional;
    }

    let usernames: HashSet<&str> = records.iter().map(|r| r.username.as_str()).collect();
    let overlap = usernames.iter().filter(|u| admin_ids.contains(*u)).count();
    let outside = usernames.len() - overlap;

    let mode = match (overlap > 0, outside > 0) {
        (true, false) => Mode::Admins,
        (false, true) => Mode::Additional,
        (true, true) => Mode::All,
        (false, false) => Mode::Additional,
    };
    info!(mode = %mode, admin_overlap = overlap, outside, "auto-detected mode from content");
    mode
}

/// What a completed run produced, reported back to the caller.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub mode: Mode,
    /// Usernames rendered into the admin document, in input order.
    pub admins: Vec<String>,
    /// Usernames rendered into the standard-user document, in input order.
    pub users: Vec<String>,
    /// Every group seen across both populations, in first-occurrence order.
    pub groups: Vec<String>,
    /// Paths of the documents written.
    pub written: Vec<PathBuf>,
}

/// Remove documents left over from a previous run and make sure the output
/// directory exists. Runs before any rendering; output paths are only ever
/// fully overwritten, never appended to.
fn prepare_output_dir(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.output_dir).map_err(|e| {
        simple_error(format!(
            "failed to create output directory {}: {}",
            config.output_dir.display(),
            e
        ))
    })?;
    for path in [
        config.admins_ldif(),
        config.users_ldif(),
        config.group_assign_ldif(),
    ] {
        if path.exists() {
            info!(path = %path.display(), "deleting stale LDIF file");
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Execute one conversion pass over `config.users_csv`.
///
/// Always writes three documents:
/// 1. the admin document: base structure, admin person entries, admin-only
///    groups with gids from `admin_gid_base`;
/// 2. the standard-user document: standard person entries and standard-only
///    groups with gids from `user_gid_base`, no base structure;
/// 3. the group-assignment document: one modify-add block per group across
///    both populations.
pub fn run(config: &Config, forced: Option<Mode>) -> Result<RunSummary> {
    if !config.users_csv.exists() {
        return Err(simple_error(format!(
            "CSV file '{}' not found",
            config.users_csv.display()
        )));
    }

    let admin_ids = read_admins(&config.admins_csv)?;
    debug!(count = admin_ids.len(), "known admin users loaded");

    let records = read_users(&config.users_csv)?;
    let mode = resolve_mode(forced, &config.users_csv, &records, &admin_ids);

    prepare_output_dir(config)?;

    let (admin_records, user_records) = classify(&records, &admin_ids);
    let index = index_groups(&records, &admin_ids);

    let mut renderer = Renderer::new(config);
    renderer.base_structure();
    for record in &admin_records {
        renderer.person(record, &sha_password(&record.password));
    }
    renderer.groups(&index.admins, config.admin_gid_base);
    let admins_path = config.admins_ldif();
    fs::write(&admins_path, renderer.into_string())?;

    let mut renderer = Renderer::new(config);
    for record in &user_records {
        renderer.person(record, &sha_password(&record.password));
    }
    renderer.groups(&index.standard, config.user_gid_base);
    let users_path = config.users_ldif();
    fs::write(&users_path, renderer.into_string())?;

    let mut renderer = Renderer::new(config);
    for (name, members) in index.all.iter() {
        renderer.group_modify(name, members);
    }
    let group_assign_path = config.group_assign_ldif();
    fs::write(&group_assign_path, renderer.into_string())?;

    info!(
        mode = %mode,
        admins = admin_records.len(),
        users = user_records.len(),
        groups = index.all.len(),
        "LDIF files generated"
    );

    Ok(RunSummary {
        mode,
        admins: admin_records.iter().map(|r| r.username.clone()).collect(),
        users: user_records.iter().map(|r| r.username.clone()).collect(),
        groups: index.all.names().to_vec(),
        written: vec![admins_path, users_path, group_assign_path],
    })
}
