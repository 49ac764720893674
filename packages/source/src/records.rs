//! Parsing a parking schedule XML document into bylaw records.
//!
//! Each document is a flat list of record elements. The source
//! identifier arrives as an `id` attribute on the record element (or an
//! `id`/`source_id` child element); bylaw fields are child elements
//! matched by tag name. Unknown elements are ignored and missing fields
//! stay unset — the dumps omit elements freely.

use std::path::Path;

use parking_map_bylaw_models::BylawRecord;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::SourceError;

/// Parses a schedule document into records.
///
/// Records without a source identifier are dropped (and logged) — the
/// identifier is the import dedup key, so a row without one could never
/// be deduplicated.
///
/// # Errors
///
/// Returns [`SourceError`] if the document is not well-formed XML.
pub fn parse_records(xml: &str) -> Result<Vec<BylawRecord>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut depth = 0usize;
    let mut record: Option<BylawRecord> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    2 => {
                        let mut current = BylawRecord::default();
                        for attr in e.attributes() {
                            let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
                            if attr.key.local_name().as_ref().eq_ignore_ascii_case(b"id") {
                                current.source_id = attr
                                    .unescape_value()
                                    .map_err(quick_xml::Error::from)?
                                    .into_owned();
                            }
                        }
                        record = Some(current);
                    }
                    3 => {
                        field = Some(
                            String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                        );
                    }
                    _ => {}
                }
            }
            Event::Empty(_) => {}
            Event::Text(t) => {
                if depth == 3
                    && let (Some(current), Some(name)) = (record.as_mut(), field.as_deref())
                {
                    let text = t.unescape().map_err(quick_xml::Error::from)?.into_owned();
                    set_field(current, name, text);
                }
            }
            Event::End(_) => {
                if depth == 3 {
                    field = None;
                } else if depth == 2
                    && let Some(current) = record.take()
                {
                    if current.source_id.is_empty() {
                        log::warn!("Skipping record without a source identifier");
                    } else {
                        records.push(current);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Reads and parses a schedule document from disk.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed.
pub fn load_records(path: &Path) -> Result<Vec<BylawRecord>, SourceError> {
    let xml = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_records(&xml)
}

fn set_field(record: &mut BylawRecord, name: &str, text: String) {
    match name {
        "id" | "source_id" => {
            if record.source_id.is_empty() {
                record.source_id = text;
            }
        }
        "bylaw_no" => record.bylaw_no = Some(text),
        "schedule" => record.schedule = Some(text),
        "schedule_name" => record.schedule_name = Some(text),
        "highway" => record.highway = text,
        "side" => record.side = Some(text),
        "between" => record.between = Some(text),
        "prohibited_times_and_or_days" => record.prohibited_times_and_or_days = Some(text),
        "times_and_or_days" => record.times_and_or_days = Some(text),
        "max_period_permitted" => record.max_period_permitted = Some(text),
        _ => {}
    }
}
