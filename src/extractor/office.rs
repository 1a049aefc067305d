//! DOCX and PPTX text extraction.
//!
//! Both formats are zip packages of XML parts. Text lives in `t` elements
//! (`w:t` for Word, `a:t` for slides) grouped into `p` paragraphs; only
//! local names are matched, so namespace prefixes do not matter.

use crate::extractor::ExtractionError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const DOCX_BODY_PART: &str = "word/document.xml";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

/// Word subtrees whose paragraphs are not body text: text box contents and
/// the legacy copy Word writes next to every drawing.
const DOCX_SKIPPED: [&[u8]; 2] = [b"txbxContent", b"Fallback"];

/// Paragraph texts of a Word document, in document order, joined by newlines.
pub fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    let mut archive = open_package(path)?;
    let xml = read_part(&mut archive, DOCX_BODY_PART)?;
    Ok(docx_paragraphs(&xml)?.join("\n"))
}

/// One `## Slide N` heading per slide followed by the text of its shapes.
///
/// Slides follow the presentation's slide list; packages without one fall
/// back to the number in `slideN.xml`.
pub fn extract_pptx(path: &Path) -> Result<String, ExtractionError> {
    let mut archive = open_package(path)?;
    let slides = slide_parts(&mut archive)?;

    let mut lines = Vec::new();
    for (index, part) in slides.iter().enumerate() {
        lines.push(format!("\n## Slide {}", index + 1));
        let xml = read_part(&mut archive, part)?;
        lines.extend(slide_shape_texts(&xml)?);
    }

    Ok(lines.join("\n"))
}

fn slide_parts(archive: &mut ZipArchive<File>) -> Result<Vec<String>, ExtractionError> {
    if let Some(ordered) = presentation_order(archive)? {
        if !ordered.is_empty() {
            return Ok(ordered);
        }
    }

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    Ok(slides.into_iter().map(|(_, name)| name).collect())
}

/// Slide part names in `<p:sldIdLst>` order, resolved through the
/// presentation relationships.
fn presentation_order(
    archive: &mut ZipArchive<File>,
) -> Result<Option<Vec<String>>, ExtractionError> {
    let presentation = read_optional_part(archive, PRESENTATION_PART)?;
    let rels = read_optional_part(archive, PRESENTATION_RELS_PART)?;
    let (Some(presentation), Some(rels)) = (presentation, rels) else {
        return Ok(None);
    };

    let targets = relationship_targets(&rels)?;
    let order = slide_ids(&presentation)?
        .iter()
        .filter_map(|id| targets.get(id))
        .map(|target| resolve_target("ppt", target))
        .collect();

    Ok(Some(order))
}

pub(crate) fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    let value = attr.unescape_value().map_err(xml_error)?.to_string();
                    match attr.key.local_name().as_ref() {
                        b"Id" => id = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// Relationship ids (`r:id`) of the `<p:sldId>` entries, in list order.
pub(crate) fn slide_ids(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    // The unprefixed `id` is the numeric slide id.
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        ids.push(attr.unescape_value().map_err(xml_error)?.to_string());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Resolves a relationship target against the directory of its source part.
fn resolve_target(base: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn open_package(path: &Path) -> Result<ZipArchive<File>, ExtractionError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(file)?)
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<String, ExtractionError> {
    let mut part = archive.by_name(name).map_err(|e| match e {
        ZipError::FileNotFound => ExtractionError::MissingPart(name.to_string()),
        other => ExtractionError::Zip(other),
    })?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

fn read_optional_part(
    archive: &mut ZipArchive<File>,
    name: &str,
) -> Result<Option<String>, ExtractionError> {
    match read_part(archive, name) {
        Ok(xml) => Ok(Some(xml)),
        Err(ExtractionError::MissingPart(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix(SLIDE_PREFIX)?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn xml_error<E: std::fmt::Display>(error: E) -> ExtractionError {
    ExtractionError::Xml(error.to_string())
}

pub(crate) fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text = false;
    // Nesting depth inside a skipped subtree; zero outside.
    let mut skipped = 0usize;

    loop {
        let event = reader.read_event().map_err(xml_error)?;

        if skipped > 0 {
            match event {
                Event::Start(_) => skipped += 1,
                Event::End(_) => skipped -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                name if DOCX_SKIPPED.contains(&name) => skipped = 1,
                b"p" => open.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => push_char(&mut open, '\t'),
                b"br" | b"cr" => push_char(&mut open, '\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(paragraph) = open.last_mut() {
                    paragraph.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

pub(crate) fn slide_shape_texts(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    let mut shape: Option<Vec<String>> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => shape = Some(Vec::new()),
                b"p" if shape.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(current) = paragraph.as_mut() {
                        current.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(current) = paragraph.as_mut() {
                    current.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let (Some(paragraphs), Some(current)) = (shape.as_mut(), paragraph.take()) {
                        paragraphs.push(current);
                    }
                }
                b"sp" => {
                    if let Some(paragraphs) = shape.take() {
                        let text = paragraphs.join("\n");
                        if !text.trim().is_empty() {
                            shapes.push(text);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(shapes)
}

fn push_char(open: &mut [String], ch: char) {
    if let Some(paragraph) = open.last_mut() {
        paragraph.push(ch);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub fn write_package(path: &Path, parts: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, content) in parts {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    pub fn docx_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        )
    }

    pub fn slide_xml(shapes: Vec<Vec<&str>>) -> String {
        let body: String = shapes
            .iter()
            .map(|paragraphs| {
                let text: String = paragraphs
                    .iter()
                    .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
                    .collect();
                format!("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>", text)
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <p:sld xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\" \
             xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\">\
             <p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>",
            body
        )
    }
}
