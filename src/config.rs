//! Run configuration: directory constants, input/output paths, and a
//! `key = value` override file.
//!
//! A [`Config`] is resolved once by the binary layer (config file, layout
//! probe, CLI overrides, in that order) and passed into [`crate::run::run`];
//! the conversion itself never inspects the environment.

use std::path::{Path, PathBuf};

/// Output file names, fixed across runs so stale documents can be removed.
pub const ADMINS_LDIF: &str = "admins_only.ldif";
pub const USERS_LDIF: &str = "users.ldif";
pub const GROUP_ASSIGN_LDIF: &str = "group_assign.ldif";

/// Settings for one conversion run.
///
/// Directory constants (`domain_dn`, OU names, gid bases) have defaults that
/// match a typical self-hosted LDAP layout and can be overridden via
/// [`Config::from_file`].
#[derive(Clone, Debug)]
pub struct Config {
    /// CSV file with the user records to convert.
    pub users_csv: PathBuf,
    /// CSV file naming the admin usernames. May be absent.
    pub admins_csv: PathBuf,
    /// Directory the LDIF documents are written to.
    pub output_dir: PathBuf,

    /// Root DN every entry hangs under, e.g. `dc=mycompany,dc=local`.
    pub domain_dn: String,
    /// Organization name for the domain root entry (`o` attribute).
    pub organization: String,
    /// Name of the OU that holds person entries.
    pub users_ou: String,
    /// Name of the OU that holds group entries.
    pub groups_ou: String,
    /// Emit the domain root entry itself. Off when the directory root is
    /// provisioned out of band and only the OUs need creating.
    pub emit_domain_root: bool,

    /// First gidNumber assigned to groups in the admin document.
    pub admin_gid_base: u32,
    /// First gidNumber assigned to groups in the standard-user document.
    pub user_gid_base: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            users_csv: PathBuf::from("data/users.csv"),
            admins_csv: PathBuf::from("data/admins.csv"),
            output_dir: PathBuf::from("ldif"),
            domain_dn: "dc=mycompany,dc=local".to_string(),
            organization: "My Company".to_string(),
            users_ou: "users".to_string(),
            groups_ou: "groups".to_string(),
            emit_domain_root: false,
            admin_gid_base: 5000,
            user_gid_base: 6000,
        }
    }
}

impl Config {
    /// DN of the users OU, e.g. `ou=users,dc=mycompany,dc=local`.
    pub fn users_dn(&self) -> String {
        format!("ou={},{}", self.users_ou, self.domain_dn)
    }

    /// DN of the groups OU.
    pub fn groups_dn(&self) -> String {
        format!("ou={},{}", self.groups_ou, self.domain_dn)
    }

    /// Value of the leading `dc=` component of `domain_dn`, used for the
    /// `dc` attribute on the domain root entry.
    pub fn domain_dc(&self) -> &str {
        self.domain_dn
            .split(',')
            .next()
            .and_then(|rdn| rdn.split_once('='))
            .map(|(_, value)| value.trim())
            .unwrap_or("")
    }

    pub fn admins_ldif(&self) -> PathBuf {
        self.output_dir.join(ADMINS_LDIF)
    }

    pub fn users_ldif(&self) -> PathBuf {
        self.output_dir.join(USERS_LDIF)
    }

    pub fn group_assign_ldif(&self) -> PathBuf {
        self.output_dir.join(GROUP_ASSIGN_LDIF)
    }

    /// Switch to the container filesystem layout (`/opt/import`,
    /// `/opt/output`) when the mounted import file is present; the local
    /// `data/` + `ldif/` defaults stay otherwise.
    pub fn detect_layout(&mut self) {
        if Path::new("/opt/import/users.csv").exists() {
            self.users_csv = PathBuf::from("/opt/import/users.csv");
            self.admins_csv = PathBuf::from("/opt/import/admins.csv");
            self.output_dir = PathBuf::from("/opt/output");
        }
    }

    /// Load overrides from a simple `key = value` file on top of the
    /// defaults. Comments (lines starting with '#'), blank lines, and
    /// unknown keys are skipped.
    ///
    /// Returns `None` if the file cannot be read.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut cfg = Self::default();

        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }

            match lhs {
                "domain_dn" => cfg.domain_dn = rhs.to_string(),
                "organization" => cfg.organization = rhs.to_string(),
                "users_ou" => cfg.users_ou = rhs.to_string(),
                "groups_ou" => cfg.groups_ou = rhs.to_string(),
                "emit_domain_root" => cfg.emit_domain_root = parse_bool(rhs),
                "admin_gid_base" => {
                    if let Ok(base) = rhs.parse() {
                        cfg.admin_gid_base = base;
                    }
                }
                "user_gid_base" => {
                    if let Ok(base) = rhs.parse() {
                        cfg.user_gid_base = base;
                    }
                }
                "users_csv" => cfg.users_csv = PathBuf::from(rhs),
                "admins_csv" => cfg.admins_csv = PathBuf::from(rhs),
                "output_dir" => cfg.output_dir = PathBuf::from(rhs),
                _ => {}
            }
        }
        Some(cfg)
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
