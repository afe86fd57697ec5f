use cidmetrics::pdf::{add_font, font_descriptor, width_array};
use lopdf::{Document, Object};
use pretty_assertions::assert_eq;

mod common;
use common::{compile, EXPECTED_RANGES, METRICS};

fn string(object: &Object) -> &[u8] {
    match object {
        Object::String(bytes, _) => bytes,
        other => panic!("expected a string, got {other:?}"),
    }
}

fn ints(objects: &[Object]) -> Vec<i64> {
    objects.iter().map(|o| o.as_i64().unwrap()).collect()
}

#[test]
fn test_width_array_is_flat_triples() {
    let font = compile(METRICS).unwrap();
    let expected: Vec<i64> = EXPECTED_RANGES
        .iter()
        .flat_map(|&(s, e, w)| [i64::from(s), i64::from(e), i64::from(w)])
        .collect();
    assert_eq!(ints(&width_array(&font.widths)), expected);
}

#[test]
fn test_descriptor_copies_integer_keys() {
    let font = compile(METRICS).unwrap();
    let descriptor = font_descriptor(&font.record);

    assert_eq!(descriptor.get(b"Type").unwrap().as_name().unwrap(), b"FontDescriptor");
    assert_eq!(descriptor.get(b"Flags").unwrap().as_i64().unwrap(), 32);
    assert_eq!(descriptor.get(b"StemV").unwrap().as_i64().unwrap(), 70);
    assert!(descriptor.get(b"Leading").is_err());
    assert_eq!(
        ints(descriptor.get(b"FontBBox").unwrap().as_array().unwrap()),
        vec![-177, -269, 1123, 866]
    );
}

#[test]
fn test_add_font_registers_descendant() {
    let font = compile(METRICS).unwrap();
    let mut doc = Document::with_version("1.5");
    let font_id = add_font(&mut doc, &font);

    let type0 = doc.get_object(font_id).unwrap().as_dict().unwrap();
    assert_eq!(type0.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
    assert_eq!(
        type0.get(b"BaseFont").unwrap().as_name().unwrap(),
        b"ArialUnicodeMS-UniJIS-UTF16-H"
    );
    assert_eq!(type0.get(b"Encoding").unwrap().as_name().unwrap(), b"UniJIS-UTF16-H");

    let descendants = type0.get(b"DescendantFonts").unwrap().as_array().unwrap();
    assert_eq!(descendants.len(), 1);
    let cid_font_id = descendants[0].as_reference().unwrap();
    let cid_font = doc.get_object(cid_font_id).unwrap().as_dict().unwrap();

    assert_eq!(cid_font.get(b"Subtype").unwrap().as_name().unwrap(), b"CIDFontType0");
    assert_eq!(cid_font.get(b"DW").unwrap().as_i64().unwrap(), 1000);
    assert_eq!(
        cid_font.get(b"W").unwrap().as_array().unwrap().len(),
        EXPECTED_RANGES.len() * 3
    );

    let info = cid_font.get(b"CIDSystemInfo").unwrap().as_dict().unwrap();
    assert_eq!(string(info.get(b"Registry").unwrap()), b"Adobe");
    assert_eq!(string(info.get(b"Ordering").unwrap()), b"Japan1");
    assert_eq!(info.get(b"Supplement").unwrap().as_i64().unwrap(), 5);

    let descriptor_id = cid_font.get(b"FontDescriptor").unwrap().as_reference().unwrap();
    let descriptor = doc.get_object(descriptor_id).unwrap().as_dict().unwrap();
    assert_eq!(descriptor.get(b"FontName").unwrap().as_name().unwrap(), b"ArialUnicodeMS");
}
