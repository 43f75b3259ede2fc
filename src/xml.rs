//! Rendering of serde-annotated documents as S3-style XML.

use quick_xml::{DeError, se::Serializer};
use serde::Serialize;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const S3_NAMESPACE: &str = "http://s3.amazonaws.com/doc/2006-03-01/";

/// Serialize `document` behind an XML declaration.
///
/// `indent` selects pretty printing with that many spaces per level; `None`
/// writes the whole document on one line.
pub fn to_document<T: Serialize>(document: &T, indent: Option<usize>) -> Result<String, DeError> {
    let mut xml = String::from(XML_DECLARATION);
    if indent.is_some() {
        xml.push('\n');
    }

    let mut serializer = Serializer::new(&mut xml);
    if let Some(width) = indent {
        serializer.indent(' ', width);
    }
    document.serialize(serializer)?;

    Ok(xml)
}
