use std::path::{Component, Path, PathBuf};

use crate::PublishError;

pub trait PathExtension {
    /// Resolve `.` and `..` without touching the filesystem
    fn normalize(&self) -> PathBuf;
    /// Make absolute against the current directory and normalize
    fn absolute_normalized(&self) -> Result<PathBuf, PublishError>;
    /// Last component as a string, empty when there is none
    fn file_name_string(&self) -> String;
    /// Path as a string using `/` as separator
    fn to_slash_string(&self) -> String;
    fn has_html_extension(&self) -> bool;
    /// Relative path from the directory `base` to `self`, using `/` as separator.
    /// Returns an empty string when both are equal.
    fn relative_from(&self, base: &Path) -> String;
}

impl PathExtension for Path {
    fn normalize(&self) -> PathBuf {
        let mut parts: Vec<Component> = vec![];
        for component in self.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => match parts.last() {
                    Some(Component::Normal(_)) => {
                        parts.pop();
                    }
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => parts.push(component),
                },
                _ => parts.push(component),
            }
        }
        parts.iter().collect()
    }

    fn absolute_normalized(&self) -> Result<PathBuf, PublishError> {
        let absolute = std::path::absolute(self).map_err(|e| {
            PublishError::io(e.to_string()).with_context(self.to_string_lossy())
        })?;
        Ok(absolute.normalize())
    }

    fn file_name_string(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    fn to_slash_string(&self) -> String {
        self.to_string_lossy().replace('\\', "/")
    }

    fn has_html_extension(&self) -> bool {
        self.file_name()
            .map(|name| name.to_string_lossy().ends_with(".html"))
            .unwrap_or(false)
    }

    fn relative_from(&self, base: &Path) -> String {
        match pathdiff::diff_paths(self, base) {
            Some(path) => path.to_slash_string(),
            None => self.to_slash_string(),
        }
    }
}
