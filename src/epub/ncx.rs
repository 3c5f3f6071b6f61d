//! NCX navigation parsing

use super::package::attr_value;
use super::types::{EpubError, NavPoint, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Parse every `navPoint` of an NCX document, in document order
pub fn parse_ncx(entry: &str, xml: &str) -> Result<Vec<NavPoint>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut points: Vec<NavPoint> = Vec::new();
    // indices into `points` of the currently open navPoints
    let mut open: Vec<usize> = Vec::new();
    let mut in_label = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"navPoint" => {
                    points.push(NavPoint {
                        id: attr_value(&e, b"id").unwrap_or_default(),
                        play_order: attr_value(&e, b"playOrder").and_then(|v| v.trim().parse().ok()),
                        label: String::new(),
                        src: String::new(),
                        depth: open.len(),
                    });
                    open.push(points.len() - 1);
                }
                b"navLabel" => in_label = true,
                b"text" => in_text = in_label,
                b"content" => set_src(&mut points, &open, attr_value(&e, b"src")),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"content" => {
                set_src(&mut points, &open, attr_value(&e, b"src"));
            }
            Ok(Event::Text(t)) if in_text => {
                if let (Some(&idx), Ok(text)) = (open.last(), t.unescape()) {
                    points[idx].label.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"navPoint" => {
                    open.pop();
                }
                b"navLabel" => in_label = false,
                b"text" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(EpubError::xml(entry, e)),
            _ => {}
        }
    }
    Ok(points)
}

fn set_src(points: &mut [NavPoint], open: &[usize], src: Option<String>) {
    if let (Some(&idx), Some(src)) = (open.last(), src) {
        if points[idx].src.is_empty() {
            points[idx].src = src;
        }
    }
}
