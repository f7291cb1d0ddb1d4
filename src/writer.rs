use std::fs::{self};
use std::path::Path;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Failed to write {path}: {reason}")]
    WriteError { path: String, reason: String },
}

pub fn write(path: &Path, contents: &str) -> Result<(), Error> {
    let write_error = |error: std::io::Error| Error::WriteError {
        path: path.display().to_string(),
        reason: error.to_string(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
    }
    fs::write(path, contents).map_err(write_error)?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote configuration file");
    return Ok(());
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn creates_missing_directories() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("src").join("graphql").join("schema.json");

        write(&file_path, "{}\n").unwrap();

        assert_eq!("{}\n", std::fs::read_to_string(&file_path).unwrap());
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("aws-exports.js");

        write(&file_path, "old").unwrap();
        write(&file_path, "new").unwrap();

        assert_eq!("new", std::fs::read_to_string(&file_path).unwrap());
    }

    #[test]
    fn reports_the_failing_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        match write(&blocker.join("awsconfiguration.json"), "{}").unwrap_err() {
            Error::WriteError { path, .. } => assert!(path.ends_with("awsconfiguration.json")),
        }
    }
}
