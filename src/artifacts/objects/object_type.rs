//! Object kinds and the `<type> <size>\0` header in front of every stored payload

use anyhow::Context;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the header from `reader`, returning the kind and the declared payload size
    pub fn read_header(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let kind = read_field(reader, b' ')?;
        let size = read_field(reader, b'\0')?;

        let object_type = ObjectType::try_from(kind.as_str())?;
        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid object size: {size}"))?;

        Ok((object_type, size))
    }
}

fn read_field(reader: &mut impl BufRead, delimiter: u8) -> anyhow::Result<String> {
    let mut field = Vec::new();
    reader.read_until(delimiter, &mut field)?;

    if field.pop() != Some(delimiter) {
        anyhow::bail!("Truncated object header");
    }

    String::from_utf8(field).context("Object header is not valid UTF-8")
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type: {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
