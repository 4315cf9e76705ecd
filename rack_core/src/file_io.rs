//! # Project Files
//!
//! Saving and loading `.rkp` project files:
//! - **Atomic saves**: write `.rkp.tmp`, fsync, rename over the target
//! - **Advisory locking**: an OS lock via `fs2` plus a `.rkp.lock` file that
//!   records who holds it, so a second estimator opening the same file on a
//!   shared drive sees who is editing
//! - **Version checks**: files from an incompatible schema are refused
//!
//! ## Example
//!
//! ```rust,no_run
//! use rack_core::file_io::{load_project, save_project, FileLock};
//! use rack_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("Dana Estimator", "Perris DC", "ACME Logistics");
//! let path = Path::new("perris.rkp");
//!
//! let lock = FileLock::acquire(path, "dana@example.com")?;
//! save_project(&project, path)?;
//! drop(lock);
//!
//! let reloaded = load_project(path)?;
//! assert_eq!(reloaded.meta.project_name, "Perris DC");
//! # Ok::<(), rack_core::errors::CalcError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, SCHEMA_VERSION};

/// File extension for project files.
pub const PROJECT_EXTENSION: &str = "rkp";

/// Locks older than this are considered abandoned.
const STALE_LOCK_HOURS: i64 = 24;

/// Metadata stored in the `.lock` file next to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// Email or username
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// A lock is stale when it is older than a day, or when it was taken on
    /// this machine by a process that no longer exists.
    fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        match hostname() {
            Some(machine) if machine == self.machine => !process_alive(self.pid),
            _ => false,
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    // No cheap liveness probe; rely on the age check.
    true
}

/// Exclusive lock on a project file, released on drop.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    // Holds the OS-level lock for as long as the guard lives.
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// Fails with [`CalcError::FileLocked`] when a live lock exists. Stale
    /// locks are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::info!(path = %path.display(), holder = %existing.user_id, "taking over stale lock");
        }

        let lock_err = |op: &str, e: std::io::Error| CalcError::file_error(op, lock_path.display().to_string(), e.to_string());

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| lock_err("create lock", e))?;

        handle
            .try_lock_exclusive()
            .map_err(|_| CalcError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(|e| CalcError::serialization(e.to_string()))?;
        handle.write_all(json.as_bytes()).map_err(|e| lock_err("write lock", e))?;
        handle.sync_all().map_err(|e| lock_err("sync lock", e))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");

        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Who holds the lock on `path`, if anyone (stale locks are ignored).
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|info| !info.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `perris.rkp` → `perris.rkp.lock`
fn lock_path_for(project_path: &Path) -> PathBuf {
    with_suffix(project_path, "lock")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    let extension = match path.extension() {
        Some(ext) => format!("{}.{}", ext.to_string_lossy(), suffix),
        None => suffix.to_string(),
    };
    out.set_extension(extension);
    out
}

/// Unreadable or malformed lock files are treated as absent.
fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

/// Save a project atomically.
///
/// The JSON goes to `<path>.tmp` first, is synced to disk and then renamed
/// over `path`, so an interrupted save never leaves a truncated project.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::serialization(e.to_string()))?;
    let tmp_path = with_suffix(path, "tmp");

    let tmp_err = |op: &str, e: std::io::Error| CalcError::file_error(op, tmp_path.display().to_string(), e.to_string());

    let mut tmp = File::create(&tmp_path).map_err(|e| tmp_err("create temp file", e))?;
    tmp.write_all(json.as_bytes()).map_err(|e| tmp_err("write temp file", e))?;
    tmp.sync_all().map_err(|e| tmp_err("sync temp file", e))?;
    drop(tmp);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::file_error("rename to final", path.display().to_string(), e.to_string()));
    }

    tracing::info!(path = %path.display(), estimates = project.estimate_count(), "project saved");
    Ok(())
}

/// Load a project, refusing incompatible schema versions.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;
    project.settings.layout.validate()?;

    tracing::debug!(path = %path.display(), estimates = project.estimate_count(), "project loaded");
    Ok(project)
}

/// Load a project and report who, if anyone, is currently editing it.
///
/// A `Some` lock means the caller should open the project read-only.
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.').map(str::parse::<u32>);
    let major = parts.next()?.ok()?;
    let minor = parts.next().and_then(Result::ok).unwrap_or(0);
    Some((major, minor))
}

/// Majors must match; within 0.x a newer minor is refused.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse_version(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse_version(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}
