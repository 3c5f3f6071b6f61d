//! OCF container and OPF package parsing

use super::types::{resolve_href, EpubError, ManifestItem, Result, CONTAINER_PATH, NCX_MEDIA_TYPE};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Value of the attribute with the given local name
pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Extract the OPF path from `META-INF/container.xml`
pub fn parse_container(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attr_value(&e, b"full-path") {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(EpubError::xml(CONTAINER_PATH, e)),
            _ => {}
        }
    }
    Err(EpubError::NoRootfile)
}

/// Parsed OPF package: manifest plus reading order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    /// Archive path of the OPF file
    pub path: String,
    pub manifest: Vec<ManifestItem>,
    /// Manifest ids in reading order
    pub spine: Vec<String>,
    /// Manifest id named by the spine `toc` attribute
    pub toc_id: Option<String>,
}

impl Package {
    /// Parse an OPF document located at `opf_path` inside the archive
    pub fn parse(opf_path: &str, xml: &str) -> Result<Self> {
        let mut package = Package {
            path: opf_path.to_string(),
            ..Default::default()
        };
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"item" => {
                        let (Some(id), Some(href)) = (attr_value(&e, b"id"), attr_value(&e, b"href"))
                        else {
                            continue;
                        };
                        package.manifest.push(ManifestItem {
                            id,
                            path: resolve_href(opf_path, &href),
                            media_type: attr_value(&e, b"media-type").unwrap_or_default(),
                        });
                    }
                    b"spine" => package.toc_id = attr_value(&e, b"toc"),
                    b"itemref" => {
                        if let Some(idref) = attr_value(&e, b"idref") {
                            package.spine.push(idref);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(EpubError::xml(opf_path, e)),
                _ => {}
            }
        }
        Ok(package)
    }

    pub fn item(&self, id: &str) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| item.id == id)
    }

    /// Markup documents in spine order
    pub fn spine_documents(&self) -> Vec<String> {
        self.spine
            .iter()
            .filter_map(|id| self.item(id))
            .filter(|item| item.is_markup())
            .map(|item| item.path.clone())
            .collect()
    }

    /// Archive path of the NCX, when the package declares one
    pub fn ncx_path(&self) -> Option<String> {
        self.toc_id
            .as_deref()
            .and_then(|id| self.item(id))
            .or_else(|| self.manifest.iter().find(|i| i.media_type == NCX_MEDIA_TYPE))
            .map(|item| item.path.clone())
    }
}
