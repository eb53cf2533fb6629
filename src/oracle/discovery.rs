//! Directory discovery over the conventional data layout
//!
//! ```text
//! {data}/{pool_type}/{pool}/curve-{pool_type}.json
//! {legs}/{pool_type}/{pool}/*coins*.json
//! ```

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One leg input file of the leg-sensitivity benchmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegFile {
    pub label: String,
    pub path: PathBuf,
}

/// Names of the sub-directories of `dir`, sorted. Missing directory yields nothing.
pub fn list_subdirectories(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            if dir.exists() {
                warn!(dir = %dir.display(), error = %e, "Failed to read directory");
            }
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Pools of one pool type under the implementations data root
pub fn discover_pools(data_dir: &Path, pool_type: &str) -> Vec<String> {
    let pool_type_path = data_dir.join(pool_type);
    if !pool_type_path.exists() {
        info!(
            dir = %pool_type_path.display(),
            "Directory does not exist, skipping..."
        );
        return Vec::new();
    }

    let pools = list_subdirectories(&pool_type_path);
    info!(
        pool_type,
        count = pools.len(),
        pools = %pools.join(", "),
        "Discovered pools"
    );
    pools
}

/// Leg files of one pool, sorted by label in natural (numeric-aware) order
pub fn discover_leg_files(pool_dir: &Path, marker: &str) -> Vec<LegFile> {
    let entries = match fs::read_dir(pool_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut legs: Vec<LegFile> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let label = leg_label(&name, marker)?;
            Some(LegFile {
                label,
                path: entry.path(),
            })
        })
        .collect();

    legs.sort_by(|a, b| natural_cmp(&a.label, &b.label));
    legs
}

/// `pool-coins01.json` -> `coins01` for marker `coins`
pub fn leg_label(file_name: &str, marker: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".json")?;
    if marker.is_empty() || !stem.contains(marker) {
        return None;
    }
    let tail = stem.rsplit(marker).next().unwrap_or_default();
    Some(format!("{}{}", marker, tail))
}

/// Compare strings treating runs of ASCII digits as numbers ("coins2" < "coins10")
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let lt = ln.trim_start_matches('0');
                let rt = rn.trim_start_matches('0');
                let ord = lt.len().cmp(&rt.len()).then_with(|| lt.cmp(rt));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
}
