use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// UploadedDataset – a drillhole file copied into the uploads folder
// ---------------------------------------------------------------------------

/// A `.dm` file persisted locally, known to the engine by `base_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDataset {
    pub base_name: String,
    pub path: PathBuf,
}

impl UploadedDataset {
    /// Name of the composited output dataset.
    pub fn composites_name(&self) -> String {
        format!("{}_composites", self.base_name)
    }
}

/// Drop the trailing three characters (the `.dm` extension) from a file name.
pub fn base_name(file_name: &str) -> &str {
    match file_name.char_indices().rev().nth(2) {
        Some((idx, _)) => &file_name[..idx],
        None => "",
    }
}

/// Persist `bytes` as `<uploads_dir>/<base_name>.dm`, replacing any earlier copy.
pub fn save_upload(uploads_dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<UploadedDataset> {
    let base = base_name(file_name);
    if base.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{file_name}' is not a valid .dm file name"),
        ));
    }

    std::fs::create_dir_all(uploads_dir)?;
    let path = uploads_dir.join(format!("{base}.dm"));
    std::fs::write(&path, bytes)?;

    log::info!("Stored upload {} ({} bytes)", path.display(), bytes.len());
    Ok(UploadedDataset {
        base_name: base.to_string(),
        path,
    })
}

/// Copy a picked file from disk into the uploads folder.
pub fn ingest_file(uploads_dir: &Path, source: &Path) -> io::Result<UploadedDataset> {
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no usable file name", source.display()),
            )
        })?;
    let bytes = std::fs::read(source)?;
    save_upload(uploads_dir, file_name, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_extension() {
        assert_eq!(base_name("hole1.dm"), "hole1");
        assert_eq!(base_name("a.dm"), "a");
        assert_eq!(base_name(".dm"), "");
        assert_eq!(base_name("dm"), "");
    }

    #[test]
    fn save_creates_directory_and_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = dir.path().join("uploaded_files");

        let upload = save_upload(&uploads, "hole1.dm", b"DM-BYTES").unwrap();
        assert_eq!(upload.base_name, "hole1");
        assert_eq!(upload.path, uploads.join("hole1.dm"));
        assert_eq!(std::fs::read(&upload.path).unwrap(), b"DM-BYTES");
        assert_eq!(upload.composites_name(), "hole1_composites");
    }

    #[test]
    fn second_upload_overwrites_first() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_upload(dir.path(), "hole1.dm", b"first version").unwrap();
        let second = save_upload(dir.path(), "hole1.dm", b"v2").unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read(&second.path).unwrap(), b"v2");
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        assert!(save_upload(&blocker, "hole1.dm", b"x").is_err());
    }

    #[test]
    fn ingest_copies_picked_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("drill.dm");
        std::fs::write(&source, b"payload").unwrap();

        let upload = ingest_file(&dir.path().join("uploads"), &source).unwrap();
        assert_eq!(upload.base_name, "drill");
        assert_eq!(std::fs::read(upload.path).unwrap(), b"payload");
    }
}
