use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Deserialize;

use crate::path_extension::PathExtension;

/// Name of the file controlling the order of the pages of a folder
pub const ORDER_FILE_NAME: &str = "pages.yaml";

/// Order of the entries of a folder as read from its order file:
/// ```yaml
/// order:
///   - introduction.html
///   - chapter-1
///   - appendix
/// ```
/// Entries are file or folder names, the `.html` extension may be omitted. Entries not
/// listed come after the listed ones in natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageOrder {
    #[serde(default)]
    pub order: Vec<String>,
}

impl PageOrder {
    /// Load the order file inside `folder`. A missing file gives `None`, an unreadable or
    /// malformed file is logged and also gives `None` so the default order is used.
    pub fn load(folder: &Path) -> Option<PageOrder> {
        let path = folder.join(ORDER_FILE_NAME);
        if !path.is_file() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read the {path:?} file: {e}");
                return None;
            }
        };
        match serde_yaml::from_str::<PageOrder>(&content) {
            Ok(order) => {
                debug!("Using order {:?} from {path:?}", order.order);
                Some(order)
            }
            Err(e) => {
                warn!("Syntax error in the {path:?} file: {e}");
                None
            }
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        let stem = name.strip_suffix(".html").unwrap_or(name);
        self.order.iter().position(|entry| {
            let entry = entry.trim_end_matches('/');
            entry == name || entry == stem
        })
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => natural_cmp(a, b),
        }
    }
}

/// Sort the entries of a folder by file name using `order` when given
pub fn sort_entries(entries: &mut [PathBuf], order: Option<&PageOrder>) {
    let name = |path: &PathBuf| path.file_name_string();
    entries.sort_by(|a, b| match order {
        Some(order) => order.compare(&name(a), &name(b)),
        None => natural_cmp(&name(a), &name(b)),
    });
}

/// Compare strings treating runs of digits as numbers, so `page2` comes before `page10`
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chunks = chunks(a);
    let mut b_chunks = chunks(b);
    loop {
        match (a_chunks.next(), b_chunks.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (is_number(x), is_number(y)) {
                    (true, true) => {
                        let x = x.trim_start_matches('0');
                        let y = y.trim_start_matches('0');
                        x.len().cmp(&y.len()).then_with(|| x.cmp(y))
                    }
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn is_number(chunk: &str) -> bool {
    chunk.starts_with(|c: char| c.is_ascii_digit())
}

/// Split into alternating runs of digits and non digits
fn chunks(s: &str) -> impl Iterator<Item = &str> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(rest.len());
        let (chunk, remaining) = rest.split_at(end);
        rest = remaining;
        Some(chunk)
    })
}
