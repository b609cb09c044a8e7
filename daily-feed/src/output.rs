use crate::classify::iso8601;
use crate::types::{DigestError, NormalizedEntry, Result};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: String,
    pub pub_date: Option<String>,
    pub description: Option<String>,
}

impl From<&NormalizedEntry> for OutputItem {
    fn from(entry: &NormalizedEntry) -> Self {
        Self {
            title: entry.title.clone(),
            link: entry.link.clone(),
            guid: entry.identity.clone(),
            pub_date: entry.timestamp.as_ref().map(iso8601),
            description: entry.summary.clone(),
        }
    }
}

/// Minimal RSS 2.0 channel holding only the novel entries of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: String,
    pub items: Vec<OutputItem>,
}

/// Channel title for a feed key, e.g. `daily_bd`.
pub fn channel_title(key: &str) -> String {
    format!("daily_{key}")
}

/// Items keep the order of `entries`.
pub fn build_document_at(
    title: &str,
    link: &str,
    entries: &[NormalizedEntry],
    built_at: DateTime<FixedOffset>,
) -> OutputDocument {
    OutputDocument {
        title: title.to_string(),
        link: link.to_string(),
        description: format!("Daily feed: {title}"),
        last_build_date: built_at.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        items: entries.iter().map(OutputItem::from).collect(),
    }
}

fn xml_err(e: impl std::fmt::Display) -> DigestError {
    DigestError::Render(e.to_string())
}

fn write_text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn write_optional<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) if !text.is_empty() => write_text_element(writer, name, text),
        _ => Ok(()),
    }
}

/// Serialize the document as UTF-8 XML with a declaration.
pub fn render(doc: &OutputDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("rss").with_attributes([("version", "2.0")]),
        ))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("channel")))
        .map_err(xml_err)?;

    write_text_element(&mut writer, "title", &doc.title)?;
    write_text_element(&mut writer, "link", &doc.link)?;
    write_text_element(&mut writer, "description", &doc.description)?;
    write_text_element(&mut writer, "lastBuildDate", &doc.last_build_date)?;

    for item in &doc.items {
        writer
            .write_event(Event::Start(BytesStart::new("item")))
            .map_err(xml_err)?;
        write_optional(&mut writer, "title", item.title.as_deref())?;
        write_optional(&mut writer, "link", item.link.as_deref())?;
        write_optional(&mut writer, "guid", Some(item.guid.as_str()))?;
        write_optional(&mut writer, "pubDate", item.pub_date.as_deref())?;
        write_optional(&mut writer, "description", item.description.as_deref())?;
        writer
            .write_event(Event::End(BytesEnd::new("item")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("channel")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("rss")))
        .map_err(xml_err)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}
