//! Commit object
//!
//! Commits are immutable snapshots of the tracked files at a point in time.
//! They contain:
//! - The commit message
//! - A timestamp (a fixed sentinel for the root commit)
//! - Parent commit ID(s): none for the root, two for a merge
//! - The file map: repository-relative path to blob ID
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! timestamp <unix-seconds> <+hhmm>
//! parent <parent-sha>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! Files are written in path order, so the id of a commit is a pure function of its
//! message, file map, timestamp and parent sequence.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Environment variable pinning the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "SPRIG_COMMIT_DATE";

/// Message of the commit every repository starts with
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Mapping from repository-relative path to blob id
pub type FileMap = BTreeMap<PathBuf, ObjectId>;

/// Immutable snapshot record
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    id: ObjectId,
    message: String,
    timestamp: DateTime<FixedOffset>,
    parents: Vec<ObjectId>,
    files: FileMap,
}

impl Commit {
    /// Create a new commit stamped with the configured clock
    ///
    /// Fails with [`RepositoryError::EmptyMessage`] when the message is blank.
    pub fn create(message: &str, parents: Vec<ObjectId>, files: FileMap) -> anyhow::Result<Self> {
        Self::with_timestamp(message, commit_timestamp(), parents, files)
    }

    pub fn with_timestamp(
        message: &str,
        timestamp: DateTime<FixedOffset>,
        parents: Vec<ObjectId>,
        files: FileMap,
    ) -> anyhow::Result<Self> {
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        Self::assemble(message.to_string(), timestamp, parents, files)
    }

    /// The parentless commit created by `init`
    pub fn root() -> anyhow::Result<Self> {
        Self::assemble(
            ROOT_COMMIT_MESSAGE.to_string(),
            DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset(),
            Vec::new(),
            FileMap::new(),
        )
    }

    fn assemble(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Vec<ObjectId>,
        files: FileMap,
    ) -> anyhow::Result<Self> {
        if parents.len() > 2 {
            anyhow::bail!("a commit has at most two parents, got {}", parents.len());
        }

        let mut commit = Commit {
            id: ObjectId::default(),
            message,
            timestamp,
            parents,
            files,
        };
        commit.id = commit.object_id()?;

        Ok(commit)
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// The designated (first) parent, followed by linear history walks
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&ObjectId> {
        self.files.get(path)
    }

    pub fn tracks(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Timestamp like "Mon Jan 1 12:34:56 2024 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %-d %H:%M:%S %Y %z").to_string()
    }
}

/// Current time, unless pinned through [`COMMIT_DATE_ENV`]
///
/// Accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`. An unparsable value falls back to the
/// wall clock.
pub fn commit_timestamp() -> DateTime<FixedOffset> {
    let pinned = std::env::var(COMMIT_DATE_ENV).ok().and_then(|date_str| {
        let parsed = DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .ok();
        if parsed.is_none() {
            tracing::warn!(value = %date_str, "ignoring unparsable commit date override");
        }
        parsed
    });

    pinned.unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

fn format_offset(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%z").to_string()
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, offset) = value
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: timestamp is not a number")?;

    if offset.len() != 5 {
        anyhow::bail!("Invalid commit object: malformed timezone {offset}");
    }
    let sign = match &offset[..1] {
        "+" => 1,
        "-" => -1,
        _ => anyhow::bail!("Invalid commit object: malformed timezone {offset}"),
    };
    let hours = offset[1..3].parse::<i32>()?;
    let minutes = offset[3..5].parse::<i32>()?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .context("Invalid commit object: timezone out of range")?;

    let utc = DateTime::from_timestamp(seconds, 0)
        .context("Invalid commit object: timestamp out of range")?;

    Ok(utc.with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize_payload(&self) -> anyhow::Result<Bytes> {
        let mut lines = vec![format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            format_offset(&self.timestamp)
        )];

        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        for (path, blob_id) in &self.files {
            let path = path
                .to_str()
                .with_context(|| format!("path is not valid UTF-8: {}", path.display()))?;
            if path.contains('\n') {
                anyhow::bail!("path contains a newline: {path:?}");
            }
            lines.push(format!("file {blob_id} {path}"));
        }

        lines.push(String::new());
        lines.push(self.message.clone());

        Ok(Bytes::from(lines.join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = header.lines();

        let timestamp = lines
            .next()
            .and_then(|line| line.strip_prefix("timestamp "))
            .context("Invalid commit object: missing timestamp line")?;
        let timestamp = parse_timestamp(timestamp)?;

        let mut parents = Vec::new();
        let mut files = FileMap::new();
        for line in lines {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (blob_id, path) = entry
                    .split_once(' ')
                    .context("Invalid commit object: malformed file line")?;
                files.insert(
                    PathBuf::from(path),
                    ObjectId::try_parse(blob_id.to_string())?,
                );
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        Self::assemble(message.to_string(), timestamp, parents, files)
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
