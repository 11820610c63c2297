//! Object store
//!
//! Content-addressable storage for blobs and commits. Every object lives in
//! `.sprig/objects/<2 hex>/<38 hex>`, zlib-compressed, named by the SHA-1 of its
//! serialized form. Objects are written once and never updated or removed, so storing
//! identical content twice is a no-op after the first write.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object and return its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_content = object.serialize()?;
        let object_id = ObjectId::hash(&object_content);
        let object_path = self.path.join(object_id.to_path());

        // write the object to disk unless it already exists
        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object_content)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw serialized content (header included) of a stored object
    ///
    /// Fails with [`RepositoryError::NotFound`] when no object has that id.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        if !object_path.is_file() {
            return Err(RepositoryError::NotFound(object_id.to_string()).into());
        }

        self.read_object(object_path)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Blob::deserialize(object_reader),
            _ => Err(RepositoryError::NotFound(object_id.to_string()).into()),
        }
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        let commit = match object_type {
            ObjectType::Commit => Commit::deserialize(object_reader)?,
            _ => return Err(RepositoryError::NotFound(object_id.to_string()).into()),
        };

        if commit.id() != object_id {
            anyhow::bail!(
                "Corrupt commit object {}: content hashes to {}",
                object_id,
                commit.id()
            );
        }

        Ok(commit)
    }

    /// Whether the stored object with that id is a commit
    pub fn is_commit(&self, object_id: &ObjectId) -> anyhow::Result<bool> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type == ObjectType::Commit)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, size) = ObjectType::read_header(&mut object_reader)?;
        let remaining = object_reader.get_ref().len() - object_reader.position() as usize;
        if remaining != size {
            anyhow::bail!(
                "Corrupt object {}: header declares {} bytes but {} follow",
                object_id,
                size,
                remaining
            );
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with the given prefix.
    ///
    /// Used to resolve abbreviated commit ids. An empty result means no match; more than
    /// one means the prefix is ambiguous.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];

            Ok(self
                .list_object_dir(dir_name)?
                .into_iter()
                .filter(|oid| oid.as_ref()[2..].starts_with(file_prefix))
                .collect())
        } else {
            Ok(self
                .list_objects()?
                .into_iter()
                .filter(|oid| oid.as_ref().starts_with(&prefix))
                .collect())
        }
    }

    /// Every stored object id, in ascending order
    pub fn list_objects(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut object_ids = Vec::new();

        if !self.path.is_dir() {
            return Ok(object_ids);
        }

        let mut dir_names = std::fs::read_dir(&self.path)
            .with_context(|| format!("Unable to list objects in {}", self.path.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.len() == 2)
            .collect::<Vec<_>>();
        dir_names.sort();

        for dir_name in dir_names {
            object_ids.extend(self.list_object_dir(&dir_name)?);
        }

        Ok(object_ids)
    }

    /// Every stored commit, in ascending id order
    pub fn list_commits(&self) -> anyhow::Result<Vec<Commit>> {
        let mut commits = Vec::new();

        for object_id in self.list_objects()? {
            if self.is_commit(&object_id)? {
                commits.push(self.load_commit(&object_id)?);
            }
        }

        Ok(commits)
    }

    fn list_object_dir(&self, dir_name: &str) -> anyhow::Result<Vec<ObjectId>> {
        let dir_path = self.path.join(dir_name);

        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut object_ids = std::fs::read_dir(&dir_path)
            .with_context(|| format!("Unable to list objects in {}", dir_path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| format!("{}{}", dir_name, entry.file_name().to_string_lossy()))
            // skips temp files left behind by interrupted writes
            .filter(|full_oid| full_oid.len() == OBJECT_ID_LENGTH)
            .filter_map(|full_oid| ObjectId::try_parse(full_oid).ok())
            .collect::<Vec<_>>();
        object_ids.sort();

        Ok(object_ids)
    }
}
