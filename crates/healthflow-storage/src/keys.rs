//! Local path to remote key mapping.

use crate::error::{Result, StorageError};
use std::path::{Component, Path};

/// `<namespace>/<path relative to local_root>`, always `/`-separated.
pub fn remote_key(namespace: &str, local_root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(local_root).map_err(|_| {
        StorageError::local_io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not under '{}'", local_root.display()),
            ),
        )
    })?;

    let mut segments: Vec<&str> = Vec::new();
    let namespace = namespace.trim_matches('/');
    if !namespace.is_empty() {
        segments.push(namespace);
    }

    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str().ok_or_else(|| {
                StorageError::local_io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "path is not UTF-8"),
                )
            })?),
            Component::CurDir => {}
            _ => {
                return Err(StorageError::local_io(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "path escapes the local root",
                    ),
                ))
            }
        }
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_remote_key() {
        let root = PathBuf::from("data/generated");
        let path = root
            .join("year=2024")
            .join("month=01")
            .join("day=15")
            .join("appointments.csv");

        assert_eq!(
            remote_key("appointments", &root, &path).unwrap(),
            "appointments/year=2024/month=01/day=15/appointments.csv"
        );
        assert_eq!(
            remote_key("/appointments/", &root, &path).unwrap(),
            "appointments/year=2024/month=01/day=15/appointments.csv"
        );
    }

    #[test]
    fn test_path_outside_root() {
        let err = remote_key("appointments", Path::new("data/a"), Path::new("data/b/x.csv"))
            .unwrap_err();
        assert!(err.to_string().contains("not under"));
    }
}
