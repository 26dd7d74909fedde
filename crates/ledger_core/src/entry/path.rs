//! Date-partitioned, collision-free entry path allocation.
//!
//! # Responsibility
//! - Derive `root/YYYY/MM/DD` and ensure the folder chain exists.
//! - Derive `YYYY-MM-DD HH_MM_SS <title>[ (n)].md` file names.
//!
//! # Invariants
//! - `allocate` never returns a path that existed when it probed.
//! - Suffix `n` starts at 1 and is only used after a collision.

use crate::repo::entry_repo::EntryRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Upper bound on collision suffixes before giving up.
pub const MAX_COLLISION_SUFFIX: u32 = 10_000;

const ENTRY_EXTENSION: &str = "md";

static ILLEGAL_FILENAME_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("valid filename regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// One candidate entry location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatedPath {
    dir: PathBuf,
    stem: String,
    suffix: u32,
}

impl AllocatedPath {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Collision suffix; `0` for the unsuffixed name.
    pub fn suffix(&self) -> u32 {
        self.suffix
    }

    pub fn file_name(&self) -> String {
        candidate_file_name(&self.stem, self.suffix)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(self.file_name())
    }

    /// Next candidate in the suffix sequence.
    pub fn next_candidate(&self) -> Self {
        Self {
            dir: self.dir.clone(),
            stem: self.stem.clone(),
            suffix: self.suffix + 1,
        }
    }
}

/// Allocates a fresh entry path for `title` at `timestamp`.
///
/// Creates the date folder chain. The returned path is unoccupied at the
/// time of return; callers should still create it exclusively.
pub fn allocate<R: EntryRepository + ?Sized>(
    repo: &R,
    root: &Path,
    timestamp: NaiveDateTime,
    title: &str,
) -> RepoResult<AllocatedPath> {
    let dir = entry_dir(root, timestamp);
    repo.ensure_dir(&dir)?;

    let first = AllocatedPath {
        dir,
        stem: entry_stem(timestamp, title),
        suffix: 0,
    };
    first_free(repo, first)
}

/// Probes from `candidate` onward until an unoccupied path is found.
pub fn first_free<R: EntryRepository + ?Sized>(
    repo: &R,
    candidate: AllocatedPath,
) -> RepoResult<AllocatedPath> {
    let mut candidate = candidate;
    while repo.exists(&candidate.path()) {
        if candidate.suffix >= MAX_COLLISION_SUFFIX {
            return Err(RepoError::InvalidData(format!(
                "no free entry name after {MAX_COLLISION_SUFFIX} attempts in `{}`",
                candidate.dir.display()
            )));
        }
        candidate = candidate.next_candidate();
    }
    Ok(candidate)
}

/// `root/YYYY/MM/DD` for `timestamp`.
pub fn entry_dir(root: &Path, timestamp: NaiveDateTime) -> PathBuf {
    root.join(timestamp.format("%Y").to_string())
        .join(timestamp.format("%m").to_string())
        .join(timestamp.format("%d").to_string())
}

/// `YYYY-MM-DD HH_MM_SS <sanitized title>`; just the timestamp when the
/// title sanitizes to nothing.
pub fn entry_stem(timestamp: NaiveDateTime, title: &str) -> String {
    let prefix = timestamp.format("%Y-%m-%d %H_%M_%S").to_string();
    let sanitized = sanitize_title(title);
    if sanitized.is_empty() {
        prefix
    } else {
        format!("{prefix} {sanitized}")
    }
}

/// File name for `stem`, suffixed ` (n)` when `suffix > 0`.
pub fn candidate_file_name(stem: &str, suffix: u32) -> String {
    if suffix == 0 {
        format!("{stem}.{ENTRY_EXTENSION}")
    } else {
        format!("{stem} ({suffix}).{ENTRY_EXTENSION}")
    }
}

/// Removes characters illegal in file names and collapses whitespace.
pub fn sanitize_title(title: &str) -> String {
    let stripped = ILLEGAL_FILENAME_CHARS_RE.replace_all(title, "");
    WHITESPACE_RE
        .replace_all(stripped.trim(), " ")
        .into_owned()
}
