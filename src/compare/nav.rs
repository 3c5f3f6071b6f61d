//! NCX navigation verification

use super::types::{CompareError, NavCheck, NavReport, Result};
use crate::epub::{parse_ncx, resolve_href, EpubArchive, DEFAULT_NCX_PATH};
use std::io::{Read, Seek};
use tracing::{debug, warn};

fn locate_ncx<R: Read + Seek>(archive: &mut EpubArchive<R>) -> Option<String> {
    match archive.package() {
        Ok(package) => {
            if let Some(path) = package.ncx_path().filter(|p| archive.contains(p)) {
                return Some(path);
            }
        }
        Err(e) => warn!(error = %e, "could not read package, trying default NCX location"),
    }
    archive
        .contains(DEFAULT_NCX_PATH)
        .then(|| DEFAULT_NCX_PATH.to_string())
}

/// Check that every navPoint target exists in the archive
pub fn verify_navigation<R: Read + Seek>(archive: &mut EpubArchive<R>) -> Result<NavReport> {
    let ncx_path = locate_ncx(archive).ok_or(CompareError::NoNavigation)?;
    let xml = archive.read_text(&ncx_path)?;
    let points = parse_ncx(&ncx_path, &xml)?;
    debug!(ncx = %ncx_path, points = points.len(), "parsed navigation");

    let checks = points
        .into_iter()
        .map(|point| {
            let target = resolve_href(&ncx_path, &point.src);
            let found = !point.src.is_empty() && archive.contains(&target);
            NavCheck { point, target, found }
        })
        .collect();

    Ok(NavReport { ncx_path, checks })
}
