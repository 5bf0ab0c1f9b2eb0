use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{
    CASCADE_DIR_NAME, EYE_CASCADE_FILE, FACE_CASCADE_FILE, OPENCV_DIR_ENV,
};

#[derive(Error, Debug)]
pub enum CascadeResolveError {
    #[error("failed to create cascade directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine the executable directory: {0}")]
    NoExecutableDir(#[source] std::io::Error),
}

/// Cascade files found at startup. `None` means the file does not exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadePaths {
    pub face: Option<PathBuf>,
    pub eye: Option<PathBuf>,
}

/// `haarcascades/` next to the running executable.
pub fn default_cascade_dir() -> Result<PathBuf, CascadeResolveError> {
    let exe = std::env::current_exe().map_err(CascadeResolveError::NoExecutableDir)?;
    let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(dir.join(CASCADE_DIR_NAME))
}

/// Creates `dir` if it is missing.
///
/// Returns `true` when the directory was created, so the caller can tell the
/// user to copy the cascade files into it.
pub fn ensure_cascade_dir(dir: &Path) -> Result<bool, CascadeResolveError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|e| CascadeResolveError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    log::info!("Created cascade directory {}", dir.display());
    Ok(true)
}

/// Resolve the default face and eye cascades.
///
/// Resolution order:
/// 1. `cascade_dir` (the local `haarcascades/` directory)
/// 2. `<opencv_dir>/etc/haarcascades/`, used for both files when the face
///    cascade is missing from `cascade_dir`
pub fn resolve(cascade_dir: &Path, opencv_dir: Option<&Path>) -> CascadePaths {
    let mut face = cascade_dir.join(FACE_CASCADE_FILE);
    let mut eye = cascade_dir.join(EYE_CASCADE_FILE);

    if !face.is_file() {
        if let Some(root) = opencv_dir {
            let installed = root.join("etc").join(CASCADE_DIR_NAME);
            face = installed.join(FACE_CASCADE_FILE);
            eye = installed.join(EYE_CASCADE_FILE);
        }
    }

    CascadePaths {
        face: face.is_file().then_some(face),
        eye: eye.is_file().then_some(eye),
    }
}

/// [`resolve`] with the fallback taken from the `OPENCV_DIR` variable.
pub fn resolve_from_env(cascade_dir: &Path) -> CascadePaths {
    let opencv_dir = std::env::var_os(OPENCV_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    resolve(cascade_dir, opencv_dir.as_deref())
}
