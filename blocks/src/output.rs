use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Clears out the directory, so only this run's report winds up there
pub fn prep_directory(path: &Path, overwrite: bool) -> Result<()> {
    if path.exists() {
        if !overwrite {
            bail!(
                "{} already exists. Set overwriteExistingFiles to replace it.",
                path.display()
            );
        }
        fs_err::remove_dir_all(path).map_err(|err| write_error(path, err))?;
    }
    fs_err::create_dir_all(path).map_err(|err| write_error(path, err))?;
    Ok(())
}

/// Writes an already rendered blocks.csv in the directory and returns its path
pub fn write_report(dir: &Path, csv: &[u8]) -> Result<PathBuf> {
    let path = dir.join("blocks.csv");
    fs_err::write(&path, csv).map_err(|err| write_error(&path, err))?;
    Ok(path)
}

fn write_error(path: &Path, err: std::io::Error) -> anyhow::Error {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => anyhow!(
            "Unable to write to {}. Try running this command from a writable directory.",
            path.display()
        ),
        _ => anyhow::Error::new(err).context(format!("Couldn't write to {}", path.display())),
    }
}

/// Drops characters that don't belong in a filename
pub fn sanitize_filename(name: &str) -> String {
    let result: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '?' | '<' | '>' | ':' | '*' | '|' | '"'))
        .collect();
    if result == "." || result == ".." {
        return String::new();
    }
    result
}

/// Expands a leading ~ to the home directory
pub fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}{}", home.to_string_lossy(), &path[1..]);
        }
    }
    path.to_string()
}
