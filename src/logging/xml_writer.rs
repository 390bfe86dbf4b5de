// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Streaming writer for the nested XML log document.
//!
//! Document shape:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <logfile>
//!   <line machine="vm1">text</line>
//!   <nest><head machine="vm1">text</head> ...children... </nest>
//! </logfile>
//! ```
//!
//! Elements are written as soon as they are known; nothing but the count of
//! open `nest` elements is kept in memory. Text and attribute values are
//! sanitised and escaped, attribute keys are written verbatim.

use super::destination::Destination;
use super::entry::Attributes;
use super::error::LogError;
use super::sanitize::sanitise;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

const ROOT: &str = "logfile";
const LINE: &str = "line";
const NEST: &str = "nest";
const HEAD: &str = "head";

pub struct XmlTreeWriter {
    /// `None` once the document has been closed
    writer: Option<Writer<Destination>>,
    /// Number of currently open `nest` elements
    depth: usize,
}

impl XmlTreeWriter {
    /// Start a document on `destination`, leaving the root element open
    pub fn new(destination: Destination) -> Result<Self, LogError> {
        let mut writer = Writer::new(destination);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
        writer.get_mut().flush()?;
        Ok(Self {
            writer: Some(writer),
            depth: 0,
        })
    }

    /// Emit a self-contained `line` element
    pub fn write_line(&mut self, message: &str, attributes: &Attributes) -> Result<(), LogError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        write_text_element(writer, LINE, message, attributes)?;
        writer.get_mut().flush()?;
        Ok(())
    }

    /// Open a `nest` element and write its `head`
    pub fn open_nest(&mut self, head: &str, attributes: &Attributes) -> Result<(), LogError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer.write_event(Event::Start(BytesStart::new(NEST)))?;
        self.depth += 1;
        write_text_element(writer, HEAD, head, attributes)?;
        writer.get_mut().flush()?;
        Ok(())
    }

    /// Close the innermost open `nest`; no-op when none is open
    pub fn close_nest(&mut self) -> Result<(), LogError> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        if self.depth == 0 {
            return Ok(());
        }
        writer.write_event(Event::End(BytesEnd::new(NEST)))?;
        self.depth -= 1;
        writer.get_mut().flush()?;
        Ok(())
    }

    /// Unwind any open nests, close the root and release the destination
    ///
    /// Only the first call does anything.
    pub fn close(&mut self) -> Result<(), LogError> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        while self.depth > 0 {
            writer.write_event(Event::End(BytesEnd::new(NEST)))?;
            self.depth -= 1;
        }
        writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        let mut destination = writer.into_inner();
        destination.write_all(b"\n")?;
        destination.flush()?;
        Ok(())
    }

    /// Number of currently open `nest` elements
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl Drop for XmlTreeWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn write_text_element(
    writer: &mut Writer<Destination>,
    name: &str,
    text: &str,
    attributes: &Attributes,
) -> Result<(), LogError> {
    let values: Vec<(&str, String)> = attributes.iter().map(|(k, v)| (k, sanitise(v))).collect();
    let start =
        BytesStart::new(name).with_attributes(values.iter().map(|(k, v)| (*k, v.as_str())));
    writer.write_event(Event::Start(start))?;
    let text = sanitise(text);
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
