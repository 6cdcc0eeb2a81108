//! Streaming edits of the OPF package document.
//!
//! Only the `<metadata>` block is touched; every other event is written back
//! as it was read, so manifest, spine and formatting survive an edit.

use std::collections::HashSet;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Error, Result};

pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const DEFAULT_DC_PREFIX: &str = "dc";

/// Dublin Core elements the tools read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DcElement {
    Title,
    Creator,
}

impl DcElement {
    pub fn local_name(&self) -> &'static str {
        match self {
            DcElement::Title => "title",
            DcElement::Creator => "creator",
        }
    }

    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(DcElement::Title),
            b"creator" => Some(DcElement::Creator),
            _ => None,
        }
    }
}

/// Returns the `full-path` of the first rootfile listed in `META-INF/container.xml`.
pub fn rootfile_path(container: &str) -> Result<String> {
    let mut reader = Reader::from_str(strip_bom(container));
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(attr) = e.try_get_attribute("full-path")? {
                    return Ok(String::from_utf8(attr.value.into_owned())?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Err(Error::MissingElement("rootfile".to_string()))
}

enum Action {
    Keep,
    Replace(DcElement),
    Drop,
}

struct Rewriter<'a> {
    edits: &'a [(DcElement, String)],
    prefix: String,
    replaced_ids: HashSet<Vec<u8>>,
}

impl<'a> Rewriter<'a> {
    /// First pass: finds the DC prefix and the ids of elements about to be replaced.
    fn scan(opf: &str, edits: &'a [(DcElement, String)]) -> Result<Self> {
        let mut prefix: Option<String> = None;
        let mut replaced_ids = HashSet::new();
        let mut in_metadata = false;
        let mut reader = Reader::from_str(opf);
        loop {
            let event = reader.read_event()?;
            let (e, is_start) = match &event {
                Event::Start(e) => (e, true),
                Event::Empty(e) => (e, false),
                Event::End(e) if e.local_name().as_ref() == b"metadata" => {
                    in_metadata = false;
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };
            if prefix.is_none() {
                prefix = dc_prefix_declared(e)?;
            }
            if is_start && e.local_name().as_ref() == b"metadata" {
                in_metadata = true;
                continue;
            }
            let current = prefix.as_deref().unwrap_or(DEFAULT_DC_PREFIX);
            if in_metadata && edited_element(e, current, edits).is_some() {
                if let Some(id) = e.try_get_attribute("id")? {
                    replaced_ids.insert(id.value.into_owned());
                }
            }
        }
        Ok(Rewriter {
            edits,
            prefix: prefix.unwrap_or_else(|| DEFAULT_DC_PREFIX.to_string()),
            replaced_ids,
        })
    }

    fn classify(&self, e: &BytesStart<'_>, in_metadata: bool) -> Result<Action> {
        if !in_metadata {
            return Ok(Action::Keep);
        }
        if let Some(element) = edited_element(e, &self.prefix, self.edits) {
            return Ok(Action::Replace(element));
        }
        if e.local_name().as_ref() == b"meta" {
            if let Some(refines) = e.try_get_attribute("refines")? {
                let value: &[u8] = &refines.value;
                let target = value.strip_prefix(b"#").unwrap_or(value);
                if self.replaced_ids.contains(target) {
                    return Ok(Action::Drop);
                }
            }
        }
        Ok(Action::Keep)
    }

    fn value_of(&self, element: DcElement) -> Option<&str> {
        self.edits
            .iter()
            .rev()
            .find(|(e, _)| *e == element)
            .map(|(_, v)| v.as_str())
    }

    fn write_element(
        &self,
        writer: &mut Writer<Vec<u8>>,
        written: &mut HashSet<DcElement>,
        element: DcElement,
    ) -> Result<()> {
        if !written.insert(element) {
            return Ok(());
        }
        let Some(value) = self.value_of(element) else {
            return Ok(());
        };
        let name = format!("{}:{}", self.prefix, element.local_name());
        writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }

    fn write_missing(
        &self,
        writer: &mut Writer<Vec<u8>>,
        written: &mut HashSet<DcElement>,
    ) -> Result<()> {
        for (element, _) in self.edits {
            self.write_element(writer, written, *element)?;
        }
        Ok(())
    }

    fn rewrite(&self, opf: &str) -> Result<String> {
        let mut reader = Reader::from_str(opf);
        let mut writer = Writer::new(Vec::new());
        let mut written = HashSet::new();
        let mut in_metadata = false;
        let mut seen_metadata = false;
        let mut skip_depth = 0usize;

        loop {
            let event = reader.read_event()?;
            if skip_depth > 0 {
                match event {
                    Event::Start(_) => skip_depth += 1,
                    Event::End(_) => skip_depth -= 1,
                    Event::Eof => break,
                    _ => {}
                }
                continue;
            }
            match event {
                Event::Eof => break,
                Event::Start(e) => match self.classify(&e, in_metadata)? {
                    Action::Keep => {
                        if !in_metadata && e.local_name().as_ref() == b"metadata" {
                            in_metadata = true;
                            seen_metadata = true;
                        }
                        writer.write_event(Event::Start(e))?;
                    }
                    Action::Replace(element) => {
                        self.write_element(&mut writer, &mut written, element)?;
                        skip_depth = 1;
                    }
                    Action::Drop => skip_depth = 1,
                },
                Event::Empty(e) => match self.classify(&e, in_metadata)? {
                    Action::Keep => {
                        if !in_metadata && e.local_name().as_ref() == b"metadata" {
                            // <metadata/>: expand so the new elements have a home
                            seen_metadata = true;
                            let end = e.to_end().into_owned();
                            writer.write_event(Event::Start(e))?;
                            self.write_missing(&mut writer, &mut written)?;
                            writer.write_event(Event::End(end))?;
                        } else {
                            writer.write_event(Event::Empty(e))?;
                        }
                    }
                    Action::Replace(element) => {
                        self.write_element(&mut writer, &mut written, element)?;
                    }
                    Action::Drop => {}
                },
                Event::End(e) => {
                    if in_metadata && e.local_name().as_ref() == b"metadata" {
                        self.write_missing(&mut writer, &mut written)?;
                        in_metadata = false;
                    }
                    writer.write_event(Event::End(e))?;
                }
                other => writer.write_event(other)?,
            }
        }

        if !seen_metadata {
            return Err(Error::MissingElement("metadata".to_string()));
        }
        Ok(String::from_utf8(writer.into_inner())?)
    }
}

/// Replaces every occurrence of each edited DC element with a single one
/// holding the new value.
///
/// `<meta refines="#id">` entries that pointed at a replaced element are
/// removed with it. Elements absent from the document are appended at the end
/// of `<metadata>`.
pub fn set_unique_metadata(opf: &str, edits: &[(DcElement, String)]) -> Result<String> {
    let opf = strip_bom(opf);
    Rewriter::scan(opf, edits)?.rewrite(opf)
}

fn strip_bom(xml: &str) -> &str {
    xml.strip_prefix('\u{feff}').unwrap_or(xml)
}

fn dc_prefix_declared(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if let Some(prefix) = attr.key.as_ref().strip_prefix(b"xmlns:") {
            if &*attr.value == DC_NAMESPACE.as_bytes() {
                return Ok(Some(String::from_utf8(prefix.to_vec())?));
            }
        }
    }
    Ok(None)
}

fn edited_element(
    e: &BytesStart<'_>,
    prefix: &str,
    edits: &[(DcElement, String)],
) -> Option<DcElement> {
    let name = e.name();
    match name.prefix() {
        Some(p) if p.as_ref() == prefix.as_bytes() => {}
        _ => return None,
    }
    let element = DcElement::from_local_name(name.local_name().as_ref())?;
    edits
        .iter()
        .any(|(edited, _)| *edited == element)
        .then_some(element)
}
