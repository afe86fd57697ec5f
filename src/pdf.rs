//! Font dictionaries for a compiled font, built with `lopdf`.
//!
//! The result is a Type0 font whose single descendant is a CIDFontType0
//! carrying the compiled width table. Objects are registered with the
//! caller's document; numbering and writing stay with `lopdf`.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::fonts::{CompiledFont, MetricsRecord, DESCRIPTOR_KEYS};
use crate::values::Value;
use crate::widths::WidthTable;

fn name(s: &str) -> Object {
    Object::Name(s.as_bytes().to_vec())
}

fn value_object(value: &Value) -> Object {
    match value {
        Value::Int(i) => Object::Integer(*i),
        Value::Float(f) => Object::Real(*f as f32),
        Value::Str(s) => Object::string_literal(s.as_str()),
    }
}

/// Flat `/W` array: `start end width` for every range.
pub fn width_array(widths: &WidthTable) -> Vec<Object> {
    widths
        .ranges()
        .iter()
        .flat_map(|r| {
            [
                Object::Integer(i64::from(r.start)),
                Object::Integer(i64::from(r.end)),
                Object::Integer(i64::from(r.width)),
            ]
        })
        .collect()
}

pub fn cid_system_info(record: &MetricsRecord) -> Dictionary {
    let mut dict = Dictionary::new();
    for (key, value) in &record.cid_system_info {
        dict.set(key.as_bytes().to_vec(), value_object(value));
    }
    dict
}

pub fn font_descriptor(record: &MetricsRecord) -> Dictionary {
    let (llx, lly, urx, ury) = record.bounding_box;
    let mut dict = Dictionary::new();
    dict.set("Type", name("FontDescriptor"));
    dict.set("FontName", name(&record.font_name));
    dict.set(
        "FontBBox",
        Object::Array(
            [llx, lly, urx, ury]
                .into_iter()
                .map(|c| Object::Integer(i64::from(c)))
                .collect(),
        ),
    );
    for key in DESCRIPTOR_KEYS {
        if let Some(value) = record.descriptor_fields.get(*key) {
            if !matches!(value, Value::Str(_)) {
                dict.set(*key, value_object(value));
            }
        }
    }
    dict
}

/// Registers the descriptor and descendant font with `doc` and returns the
/// id of the Type0 font.
pub fn add_font(doc: &mut Document, font: &CompiledFont) -> ObjectId {
    let record = &font.record;
    let descriptor_id = doc.add_object(font_descriptor(record));

    let mut cid_font = Dictionary::new();
    cid_font.set("Type", name("Font"));
    cid_font.set("Subtype", name("CIDFontType0"));
    cid_font.set("BaseFont", name(&record.font_name));
    cid_font.set("CIDSystemInfo", cid_system_info(record));
    cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
    cid_font.set("DW", Object::Integer(i64::from(record.default_width)));
    cid_font.set("W", Object::Array(width_array(&font.widths)));
    let cid_font_id = doc.add_object(cid_font);

    let mut type0 = Dictionary::new();
    type0.set("Type", name("Font"));
    type0.set("Subtype", name("Type0"));
    type0.set("BaseFont", name(&record.base_font_name()));
    if !record.encoding_name.is_empty() {
        type0.set("Encoding", name(&record.encoding_name));
    }
    type0.set(
        "DescendantFonts",
        Object::Array(vec![Object::Reference(cid_font_id)]),
    );
    doc.add_object(type0)
}
