//! Environment helpers for tests that load configuration.

use std::sync::{Mutex, MutexGuard};

// Environment overrides are process-wide, so every test that loads
// configuration or touches REASONABLE_EXCUSE_* holds this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes access to the process environment.
pub fn lock_env() -> MutexGuard<'static, ()> {
    // a panicking test must not poison the lock for the rest of the suite
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Restores touched environment variables on drop
pub struct EnvGuard {
    vars_to_restore: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            vars_to_restore: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
        unsafe {
            std::env::set_var(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        let original = std::env::var(key).ok();
        self.vars_to_restore.push((key.to_string(), original));
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // restore in reverse so a key touched twice ends at its first value
        for (key, original_value) in self.vars_to_restore.iter().rev() {
            unsafe {
                match original_value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
