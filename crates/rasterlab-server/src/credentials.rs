//! The credential store.
//!
//! Accounts are pre-hashed `user:md5hex` strings, loaded once at server
//! start and read-only afterwards, so every connection task can check
//! logins without locking. Lookup is an exact match against the account
//! string the client transmits - the store is a set, not a keyed map.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use md5::{Digest, Md5};

/// Read-only set of `user:md5hex` account strings.
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: HashSet<String>,
}

impl CredentialStore {
    /// A store that rejects every login.
    pub fn empty() -> Self {
        CredentialStore::default()
    }

    /// Load accounts from a file: one `user:md5hex` entry per line,
    /// blank lines and `#` comments skipped.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut store = CredentialStore::empty();
        for line in content.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            store.accounts.insert(entry.to_string());
        }
        Ok(store)
    }

    /// Register an account from a cleartext password.
    pub fn add_account(&mut self, user: &str, password: &str) {
        self.accounts
            .insert(format!("{}:{}", user, password_digest(password)));
    }

    /// Exact-match check of the transmitted `user` + `digest` pair.
    pub fn verify(&self, user: &str, digest: &str) -> bool {
        self.accounts.contains(&format!("{}:{}", user, digest))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Lowercase md5 hex of a password, as the login line carries it.
pub fn password_digest(password: &str) -> String {
    let digest = Md5::digest(password.as_bytes());
    format!("{digest:x}")
}
