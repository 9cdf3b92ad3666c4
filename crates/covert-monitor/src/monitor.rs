//! Bell-LaPadula reference monitor.
//!
//! Every subject/object interaction goes through [`ReferenceMonitor::execute`],
//! which holds one mutex for the whole check-then-act sequence. The object
//! store and the object-level table live behind that same mutex, so a
//! successful CREATE or DESTROY updates both before anyone else can look.
//!
//! | Command | Allowed iff                     | On allow                 |
//! |---------|---------------------------------|--------------------------|
//! | READ    | exists and subject >= object    | stored value             |
//! | WRITE   | exists and subject <= object    | store, return new value  |
//! | CREATE  | absent                          | value 0 at subject level |
//! | DESTROY | exists and subject <= object    | remove value and level   |
//! | BAD     | never                           |                          |
//!
//! Anything not allowed returns `Ok(0)`.

use covert_core::error::{CovertError, CovertResult};
use covert_core::types::{Command, Instruction, SecurityLevel};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::store::ObjectStore;

/// One row of [`ReferenceMonitor::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectState {
    pub name: String,
    pub level: SecurityLevel,
    pub value: i32,
}

/// The single trusted gatekeeper in front of an [`ObjectStore`].
///
/// Owns its store so nothing can reach objects around it. Share across
/// threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct ReferenceMonitor {
    state: Mutex<MonitorState>,
}

#[derive(Debug, Default)]
struct MonitorState {
    store: ObjectStore,
    object_levels: HashMap<String, SecurityLevel>,
    subject_levels: HashMap<String, SecurityLevel>,
}

impl ReferenceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subject. Names are case-insensitive. A level is fixed
    /// once assigned, so registering the same name twice is an error.
    pub fn register_subject(&self, name: &str, level: SecurityLevel) -> CovertResult<()> {
        let name = name.to_lowercase();
        let mut state = self.lock();
        if state.subject_levels.contains_key(&name) {
            return Err(CovertError::DuplicateSubject(name));
        }
        tracing::debug!(subject = %name, %level, "subject registered");
        state.subject_levels.insert(name, level);
        Ok(())
    }

    /// Level of a registered subject; unregistered names are an error.
    pub fn subject_level(&self, name: &str) -> CovertResult<SecurityLevel> {
        self.lock().subject_level(&name.to_lowercase())
    }

    /// Level of a live object, `None` if it does not exist.
    pub fn object_level(&self, name: &str) -> CovertResult<Option<SecurityLevel>> {
        self.lock().existing_level(&name.to_lowercase())
    }

    /// Places an object at `level` with value 0 without going through a
    /// subject. Returns `false` (and changes nothing) if it already exists.
    pub fn seed_object(&self, name: &str, level: SecurityLevel) -> CovertResult<bool> {
        let name = name.to_lowercase();
        let mut state = self.lock();
        if state.existing_level(&name)?.is_some() {
            return Ok(false);
        }
        state.store.create(&name, 0);
        state.object_levels.insert(name, level);
        Ok(true)
    }

    /// Runs `instr` on behalf of `subject` under the monitor lock.
    ///
    /// Policy denials and no-ops are `Ok(0)`. `Err` means the caller broke
    /// a contract: the subject was never registered, a SLEEP was routed
    /// here, or the store and level table disagree.
    pub fn execute(&self, subject: &str, instr: &Instruction) -> CovertResult<i32> {
        let subject = subject.to_lowercase();
        let result = self.lock().apply(&subject, instr);
        if let Err(ref e) = result {
            tracing::error!(subject = %subject, instruction = %instr, error = %e, "reference monitor violation");
        }
        result
    }

    /// All live objects sorted by name.
    pub fn snapshot(&self) -> Vec<ObjectState> {
        let state = self.lock();
        let mut rows: Vec<ObjectState> = state
            .store
            .iter()
            .filter_map(|(name, value)| {
                state.object_levels.get(name).map(|level| ObjectState {
                    name: name.to_string(),
                    level: *level,
                    value,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows
    }

    /// Whether the object currently exists.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().store.contains(&name.to_lowercase())
    }

    // The guarded state is only mutated through complete check-then-act
    // sequences, so a panic elsewhere cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MonitorState {
    fn subject_level(&self, subject: &str) -> CovertResult<SecurityLevel> {
        self.subject_levels
            .get(subject)
            .copied()
            .ok_or_else(|| CovertError::UnregisteredSubject(subject.to_string()))
    }

    /// `Some(level)` if the object exists, `None` if it does not, `Err` if
    /// the store and the level table disagree.
    fn existing_level(&self, object: &str) -> CovertResult<Option<SecurityLevel>> {
        match (self.store.contains(object), self.object_levels.get(object)) {
            (true, Some(level)) => Ok(Some(*level)),
            (false, None) => Ok(None),
            _ => Err(CovertError::UnregisteredObject(object.to_string())),
        }
    }

    fn apply(&mut self, subject: &str, instr: &Instruction) -> CovertResult<i32> {
        let object = instr.object();

        let subject_level = match instr.command() {
            Command::Bad => {
                tracing::debug!(subject, "bad instruction denied");
                return Ok(0);
            }
            Command::Sleep => return Err(CovertError::MisroutedSleep(subject.to_string())),
            _ => self.subject_level(subject)?,
        };

        let object_level = self.existing_level(object)?;

        match (instr.command(), object_level) {
            (Command::Create, None) => {
                self.store.create(object, 0);
                self.object_levels.insert(object.to_string(), subject_level);
                tracing::debug!(subject, object, level = %subject_level, "created");
                Ok(0)
            }
            (Command::Create, Some(_)) => {
                tracing::debug!(subject, object, "create no-op: already exists");
                Ok(0)
            }
            (_, None) => {
                tracing::debug!(subject, object, command = %instr.command(), "no-op: object absent");
                Ok(0)
            }
            (Command::Read, Some(level)) if subject_level.can_read(level) => {
                let value = self.store.get(object)?;
                tracing::debug!(subject, object, value, "read granted");
                Ok(value)
            }
            (Command::Write, Some(level)) if subject_level.can_write(level) => {
                self.store.set(object, instr.value())?;
                let value = self.store.get(object)?;
                tracing::debug!(subject, object, value, "write granted");
                Ok(value)
            }
            (Command::Destroy, Some(level)) if subject_level.can_write(level) => {
                self.store.destroy(object);
                self.object_levels.remove(object);
                tracing::debug!(subject, object, "destroyed");
                Ok(0)
            }
            (command, Some(level)) => {
                tracing::debug!(
                    subject,
                    object,
                    %command,
                    subject_level = %subject_level,
                    object_level = %level,
                    "access denied"
                );
                Ok(0)
            }
        }
    }
}
