//! Admin session state machine and credential verification.
//!
//! The editor UI is gated behind a three-state session: `Locked` (initial),
//! `PromptOpen` (password prompt visible), `Unlocked` (editing enabled). A
//! keyboard chord toggles the prompt open from `Locked` and locks again from
//! `Unlocked`; submitting a password runs it through a [`CredentialVerifier`].
//!
//! This is deliberately not a security boundary. The encoded credential ships
//! with the deployed site and the comparison runs on the client; anyone
//! inspecting the bundle can bypass it. The gate exists to keep the editing
//! chrome out of casual visitors' way, nothing more.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use folio_core::auth::{AdminSession, AdminState, Credential, MemorySessionStore, DEFAULT_CHORD};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), folio_core::FolioError> {
//! let credential = Credential::generate("hunter2")?;
//! let mut session = AdminSession::new(
//!     DEFAULT_CHORD,
//!     Arc::new(credential),
//!     Arc::new(MemorySessionStore::default()),
//! );
//!
//! // Chord opens the prompt...
//! session.on_key(true, true, 'e');
//! assert_eq!(session.state(), AdminState::PromptOpen);
//!
//! // ...and the right password unlocks the editor.
//! session.submit("hunter2").await?;
//! assert_eq!(session.state(), AdminState::Unlocked);
//! # Ok(())
//! # }
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use parking_lot::Mutex;
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::{
    fmt::{Display, Formatter},
    fs,
    path::PathBuf,
    str::FromStr,
    sync::Arc,
};
use subtle::ConstantTimeEq;

use crate::error::FolioError;

/// Default admin chord: Ctrl+Shift+E anywhere in the document.
pub const DEFAULT_CHORD: Chord = Chord {
    ctrl: true,
    shift: true,
    key: 'e',
};

const PBKDF2_SCHEME: &str = "pbkdf2-sha256";
const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Two modifiers plus a letter, matched against key events the embedding UI
/// forwards from its global keyboard listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub ctrl: bool,
    pub shift: bool,
    pub key: char,
}

impl Chord {
    pub fn matches(&self, ctrl: bool, shift: bool, key: char) -> bool {
        ctrl == self.ctrl && shift == self.shift && key.eq_ignore_ascii_case(&self.key)
    }
}

impl Display for Chord {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        write!(f, "{}", self.key.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminState {
    #[default]
    Locked,
    PromptOpen,
    Unlocked,
}

impl Display for AdminState {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            AdminState::Locked => write!(f, "Locked"),
            AdminState::PromptOpen => write!(f, "PromptOpen"),
            AdminState::Unlocked => write!(f, "Unlocked"),
        }
    }
}

/// One-way password check. Implementations must be timing-safe and must not
/// panic on malformed stored material; report it as an error instead.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> Result<bool, FolioError>;
}

/// Salted PBKDF2-HMAC-SHA256 credential, encoded as
/// `pbkdf2-sha256$<iterations>$<base64 salt>$<base64 hash>`.
///
/// The encoded form is what gets baked into the deployed site's
/// configuration; see [`Credential::generate`] for producing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl Credential {
    /// Derive a fresh credential from a plaintext password with a random salt.
    pub fn generate(password: &str) -> Result<Credential, FolioError> {
        Credential::generate_with_iterations(password, PBKDF2_ITERATIONS)
    }

    pub fn generate_with_iterations(
        password: &str,
        iterations: u32,
    ) -> Result<Credential, FolioError> {
        if password.is_empty() {
            return Err(FolioError::Credential(
                "refusing to derive a credential from an empty password".to_string(),
            ));
        }
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let iterations = iterations.max(1);
        Ok(Credential {
            iterations,
            hash: derive_key(password, &salt, iterations),
            salt: salt.to_vec(),
        })
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key.to_vec()
}

impl CredentialVerifier for Credential {
    fn verify(&self, candidate: &str) -> Result<bool, FolioError> {
        if candidate.is_empty() {
            return Ok(false);
        }
        let derived = derive_key(candidate, &self.salt, self.iterations.max(1));
        Ok(derived.ct_eq(&self.hash).into())
    }
}

impl Display for Credential {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{PBKDF2_SCHEME}${}${}${}",
            self.iterations,
            BASE64.encode(&self.salt),
            BASE64.encode(&self.hash)
        )
    }
}

impl FromStr for Credential {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('$');
        let scheme = parts.next().unwrap_or_default();
        if scheme != PBKDF2_SCHEME {
            return Err(FolioError::Credential(format!(
                "unsupported credential scheme '{scheme}'"
            )));
        }
        let iterations = parts
            .next()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                FolioError::Credential("credential iteration count is missing or zero".to_string())
            })?;
        let salt = BASE64.decode(parts.next().unwrap_or_default())?;
        let hash = BASE64.decode(parts.next().unwrap_or_default())?;
        if salt.is_empty() || hash.is_empty() || parts.next().is_some() {
            return Err(FolioError::Credential(
                "credential must have exactly scheme, iterations, salt and hash fields".to_string(),
            ));
        }
        Ok(Credential {
            iterations,
            salt,
            hash,
        })
    }
}

/// Session-scoped persistence for the unlocked flag. The store's lifetime is
/// the embedder's notion of a "browser session"; clearing it relocks the
/// editor on next load.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<bool, FolioError>;
    fn save(&self, unlocked: bool) -> Result<(), FolioError>;
    fn clear(&self) -> Result<(), FolioError>;
}

/// In-memory session flag. State dies with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    unlocked: Mutex<bool>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<bool, FolioError> {
        Ok(*self.unlocked.lock())
    }

    fn save(&self, unlocked: bool) -> Result<(), FolioError> {
        *self.unlocked.lock() = unlocked;
        Ok(())
    }

    fn clear(&self) -> Result<(), FolioError> {
        *self.unlocked.lock() = false;
        Ok(())
    }
}

/// Marker-file session flag. The file's presence is the unlocked state, so
/// wiping the runtime directory ends the session the way closing a browser
/// tab would.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> FileSessionStore {
        FileSessionStore { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<bool, FolioError> {
        Ok(self.path.exists())
    }

    fn save(&self, unlocked: bool) -> Result<(), FolioError> {
        if unlocked {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, b"unlocked\n")?;
            Ok(())
        } else {
            self.clear()
        }
    }

    fn clear(&self) -> Result<(), FolioError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// The admin authentication state machine.
///
/// Owns the chord binding, the credential verifier and the session store;
/// the embedding UI forwards key events to [`AdminSession::on_key`] and
/// password submissions to [`AdminSession::submit`], and renders whatever
/// [`AdminSession::state`] says.
pub struct AdminSession {
    state: AdminState,
    chord: Chord,
    verifier: Arc<dyn CredentialVerifier>,
    sessions: Arc<dyn SessionStore>,
    pending: bool,
    error: Option<String>,
}

impl AdminSession {
    /// Build a session, resuming `Unlocked` when the store still carries the
    /// flag from earlier in the same browser session.
    pub fn new(
        chord: Chord,
        verifier: Arc<dyn CredentialVerifier>,
        sessions: Arc<dyn SessionStore>,
    ) -> AdminSession {
        let resumed = sessions.load().unwrap_or_else(|err| {
            tracing::warn!("session store unreadable, starting locked: {err}");
            false
        });
        AdminSession {
            state: if resumed {
                AdminState::Unlocked
            } else {
                AdminState::Locked
            },
            chord,
            verifier,
            sessions,
            pending: false,
            error: None,
        }
    }

    pub fn state(&self) -> AdminState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == AdminState::Unlocked
    }

    /// True while a password comparison is in flight; the UI disables the
    /// submit control when set.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn chord(&self) -> Chord {
        self.chord
    }

    /// Consume the current user-visible error message, if any.
    pub fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }

    /// Feed one key event through the chord matcher. Returns true when the
    /// event matched and was consumed (the UI suppresses the browser default
    /// in that case).
    pub fn on_key(&mut self, ctrl: bool, shift: bool, key: char) -> bool {
        if !self.chord.matches(ctrl, shift, key) {
            return false;
        }
        match self.state {
            AdminState::Locked => {
                tracing::debug!("admin chord: opening prompt");
                self.error = None;
                self.state = AdminState::PromptOpen;
            }
            AdminState::Unlocked => {
                tracing::debug!("admin chord: locking");
                self.lock();
            }
            AdminState::PromptOpen => {}
        }
        true
    }

    /// Explicit close action on the prompt. No side effects.
    pub fn close_prompt(&mut self) {
        if self.state == AdminState::PromptOpen {
            self.state = AdminState::Locked;
            self.error = None;
        }
    }

    /// Explicit logout from the unlocked editor.
    pub fn logout(&mut self) {
        if self.state == AdminState::Unlocked {
            self.lock();
        }
    }

    /// Submit a password from the open prompt.
    ///
    /// A match moves the session to `Unlocked` and persists the flag; a
    /// mismatch, or any verifier failure (which must never crash the prompt),
    /// stays in `PromptOpen` with a single generic error message. The
    /// internal failure detail is logged, not surfaced.
    pub async fn submit(&mut self, password: &str) -> Result<AdminState, FolioError> {
        if self.state != AdminState::PromptOpen {
            return Ok(self.state);
        }
        if self.pending {
            return Err(FolioError::OperationPending);
        }
        self.pending = true;

        let verifier = Arc::clone(&self.verifier);
        let candidate = password.to_string();
        let outcome = tokio::task::spawn_blocking(move || verifier.verify(&candidate))
            .await
            .unwrap_or_else(|join_err| {
                Err(FolioError::Credential(format!(
                    "verifier task failed: {join_err}"
                )))
            });
        self.pending = false;

        match outcome {
            Ok(true) => {
                self.error = None;
                self.unlock();
            }
            Ok(false) => {
                tracing::debug!("authentication rejected: password mismatch");
                self.error = Some("Incorrect password".to_string());
            }
            Err(err) => {
                // Same user-visible message as a plain mismatch.
                tracing::debug!("authentication rejected: verifier error: {err}");
                self.error = Some("Incorrect password".to_string());
            }
        }
        Ok(self.state)
    }

    fn unlock(&mut self) {
        self.state = AdminState::Unlocked;
        if let Err(err) = self.sessions.save(true) {
            tracing::warn!("could not persist session flag: {err}");
        }
    }

    fn lock(&mut self) {
        self.state = AdminState::Locked;
        self.error = None;
        if let Err(err) = self.sessions.clear() {
            tracing::warn!("could not clear session flag: {err}");
        }
    }
}

impl std::fmt::Debug for AdminSession {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("AdminSession")
            .field("state", &self.state)
            .field("chord", &self.chord)
            .field("pending", &self.pending)
            .field("error", &self.error)
            .finish()
    }
}
