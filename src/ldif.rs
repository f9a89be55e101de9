//! LDIF rendering.
//!
//! A [`Renderer`] appends entry blocks to an in-memory buffer in the order
//! the caller asks for them; earlier lines are never revisited. Each block
//! ends with a blank line, per the LDIF grammar.

use crate::config::Config;
use crate::groups::GroupIndex;
use crate::records::UserRecord;
use std::fmt::Write as _;

pub struct Renderer<'a> {
    config: &'a Config,
    out: String,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            out: String::new(),
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    /// DN of a person entry: `uid=<username>,<users-ou-dn>`.
    pub fn person_dn(&self, username: &str) -> String {
        format!("uid={},{}", username, self.config.users_dn())
    }

    /// DN of a group entry: `cn=<name>,<groups-ou-dn>`.
    pub fn group_dn(&self, name: &str) -> String {
        format!("cn={},{}", name, self.config.groups_dn())
    }

    /// Emit the container entries: the domain root (only when configured to
    /// create everything from scratch), then the users OU, then the groups OU.
    pub fn base_structure(&mut self) {
        let cfg = self.config;
        if cfg.emit_domain_root {
            let _ = writeln!(self.out, "dn: {}", cfg.domain_dn);
            self.out.push_str("objectClass: dcObject\n");
            self.out.push_str("objectClass: organization\n");
            let _ = writeln!(self.out, "dc: {}", cfg.domain_dc());
            let _ = writeln!(self.out, "o: {}", cfg.organization);
            self.out.push('\n');
        }

        let _ = writeln!(self.out, "dn: {}", cfg.users_dn());
        self.out.push_str("objectClass: organizationalUnit\n");
        let _ = writeln!(self.out, "ou: {}", cfg.users_ou);
        self.out.push('\n');

        let _ = writeln!(self.out, "dn: {}", cfg.groups_dn());
        self.out.push_str("objectClass: organizationalUnit\n");
        let _ = writeln!(self.out, "ou: {}", cfg.groups_ou);
        self.out.push('\n');
    }

    /// Emit one person entry. `password` is the already-hashed credential;
    /// plaintext never reaches the renderer.
    pub fn person(&mut self, record: &UserRecord, password: &str) {
        let dn = self.person_dn(&record.username);
        let _ = writeln!(self.out, "dn: {}", dn);
        self.out.push_str("objectClass: inetOrgPerson\n");
        let _ = writeln!(self.out, "cn: {}", record.full_name());
        let _ = writeln!(self.out, "sn: {}", record.last_name);
        let _ = writeln!(self.out, "givenName: {}", record.first_name);
        let _ = writeln!(self.out, "mail: {}", record.email);
        let _ = writeln!(self.out, "uid: {}", record.username);
        let _ = writeln!(self.out, "userPassword: {}", password);
        self.out.push('\n');
    }

    /// Emit one posixGroup entry with its members in stored order.
    pub fn group(&mut self, name: &str, members: &[String], gid: u32) {
        let dn = self.group_dn(name);
        let _ = writeln!(self.out, "dn: {}", dn);
        self.out.push_str("objectClass: top\n");
        self.out.push_str("objectClass: posixGroup\n");
        let _ = writeln!(self.out, "cn: {}", name);
        let _ = writeln!(self.out, "gidNumber: {}", gid);
        for member in members {
            let _ = writeln!(self.out, "memberUid: {}", member);
        }
        self.out.push('\n');
    }

    /// Emit every group of `index` in first-occurrence order, assigning
    /// gidNumbers sequentially from `gid_base`.
    pub fn groups(&mut self, index: &GroupIndex, gid_base: u32) {
        for (idx, (name, members)) in index.iter().enumerate() {
            self.group(name, members, gid_base + idx as u32);
        }
    }

    /// Emit an incremental modify-add block for an existing group.
    pub fn group_modify(&mut self, name: &str, members: &[String]) {
        let dn = self.group_dn(name);
        let _ = writeln!(self.out, "# Add new members to existing group {}", name);
        let _ = writeln!(self.out, "dn: {}", dn);
        self.out.push_str("changetype: modify\n");
        self.out.push_str("add: memberUid\n");
        for member in members {
            let _ = writeln!(self.out, "memberUid: {}", member);
        }
        self.out.push('\n');
    }
}
