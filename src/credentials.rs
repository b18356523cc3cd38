//! Local storage for the dashboard auth secret.
//!
//! The secret gates destructive actions (settings reset) when the server
//! has authentication enabled. Lookup order: environment variable,
//! OS keyring, file fallback.

use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_SECRET: &str = "FLOWDASH_SECRET";
const KEYRING_SERVICE: &str = "flowdash";
const KEYRING_KEY: &str = "auth-secret";

pub struct CredentialStore {
    secret_file: PathBuf,
}

impl CredentialStore {
    pub fn new() -> Self {
        let secret_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".auth_secret");
        Self { secret_file }
    }

    fn env_secret() -> Option<String> {
        env::var(ENV_SECRET).ok().filter(|s| !s.is_empty())
    }

    fn keyring_get(&self) -> Option<String> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY).ok()?;
        entry.get_password().ok()
    }

    fn keyring_set(&self, secret: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY) {
            entry.set_password(secret).is_ok()
        } else {
            false
        }
    }

    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.secret_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn file_set(&self, secret: &str) -> Result<()> {
        if let Some(parent) = self.secret_file.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.secret_file)?;
            file.write_all(secret.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.secret_file, secret)?;
        }

        Ok(())
    }

    /// The stored secret, if any backend has one.
    pub fn load(&self) -> Option<String> {
        if let Some(secret) = Self::env_secret() {
            return Some(secret);
        }
        if let Some(secret) = self.keyring_get() {
            return Some(secret);
        }
        self.file_get()
    }

    pub fn store(&self, secret: &str) -> Result<()> {
        if self.keyring_set(secret) && self.keyring_get().is_some() {
            return Ok(());
        }

        // Keyring failed, use file fallback
        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(secret)
    }

    pub fn has_secret(&self) -> bool {
        self.load().is_some()
    }

    pub fn clear(&self) -> Result<()> {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY) {
            let _ = entry.delete_credential();
        }
        let _ = fs::remove_file(&self.secret_file);
        Ok(())
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel test interference with env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn env_secret_takes_priority() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::set_var(ENV_SECRET, "from-env") };
        let store = CredentialStore::new();
        assert_eq!(store.load().as_deref(), Some("from-env"));
        unsafe { env::remove_var(ENV_SECRET) };
    }

    #[test]
    fn empty_env_var_counts_as_absent() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::set_var(ENV_SECRET, "") };
        assert!(CredentialStore::env_secret().is_none());
        unsafe { env::remove_var(ENV_SECRET) };
    }

    #[test]
    fn file_fallback_round_trips() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var(ENV_SECRET) };

        let store = CredentialStore {
            secret_file: std::env::temp_dir()
                .join(format!(".flowdash_secret_test_{}", std::process::id())),
        };
        let _ = fs::remove_file(&store.secret_file);

        store.file_set("s3cret").unwrap();
        assert_eq!(store.file_get().as_deref(), Some("s3cret"));

        let _ = fs::remove_file(&store.secret_file);
    }
}
