//! XMP packet parsing.
//!
//! Only properties in the camera, vendor and light-sensor namespaces are
//! kept; everything else in the packet is ignored.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::{MetadataGroup, MetadataValue, ParseWarning};

/// APP1 identifier of an XMP segment in JPEG files.
const XMP_MARKER: &[u8] = b"http://ns.adobe.com/xap/1.0/";

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// Namespace URI fragments and the group they route into.
const NAMESPACE_ROUTES: [(&str, MetadataGroup); 3] = [
    ("pix4d.com/camera", MetadataGroup::XmpCamera),
    ("micasense.com/MicaSense", MetadataGroup::XmpVendor),
    ("micasense.com/DLS", MetadataGroup::XmpLightSensor),
];

/// Properties read from one XMP packet, bucketed by namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmpBuckets {
    pub camera: BTreeMap<String, MetadataValue>,
    pub vendor: BTreeMap<String, MetadataValue>,
    pub light_sensor: BTreeMap<String, MetadataValue>,
}

impl XmpBuckets {
    fn bucket_mut(&mut self, group: MetadataGroup) -> Option<&mut BTreeMap<String, MetadataValue>> {
        match group {
            MetadataGroup::XmpCamera => Some(&mut self.camera),
            MetadataGroup::XmpVendor => Some(&mut self.vendor),
            MetadataGroup::XmpLightSensor => Some(&mut self.light_sensor),
            _ => None,
        }
    }

    fn insert(&mut self, group: MetadataGroup, key: String, value: MetadataValue) {
        if let Some(bucket) = self.bucket_mut(group) {
            bucket.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.camera.len() + self.vendor.len() + self.light_sensor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map a namespace URI to its group by substring.
pub fn route_namespace(uri: &str) -> Option<MetadataGroup> {
    NAMESPACE_ROUTES
        .iter()
        .find(|(fragment, _)| uri.contains(fragment))
        .map(|(_, group)| *group)
}

/// Coerce an XMP string: int, then float, then a list of floats when
/// comma separated, else the string itself.
pub fn coerce_xmp_value(raw: &str) -> MetadataValue {
    let text = raw.trim();
    if !text.contains('.') && !text.contains('e') && !text.contains('E') {
        if let Ok(i) = text.parse::<i64>() {
            return MetadataValue::Int(i);
        }
    }
    if let Ok(f) = text.parse::<f64>() {
        return MetadataValue::Float(f);
    }
    if text.contains(',') && !text.starts_with('{') {
        let parsed: Result<Vec<f64>, _> = text.split(',').map(|p| p.trim().parse::<f64>()).collect();
        if let Ok(values) = parsed {
            return MetadataValue::List(values.into_iter().map(MetadataValue::Float).collect());
        }
    }
    MetadataValue::Text(text.to_string())
}

/// Property currently being read from inside an `rdf:Description`.
struct OpenProperty {
    group: MetadataGroup,
    name: String,
    depth: usize,
    text: String,
    items: Vec<String>,
    in_item: bool,
}

fn namespace_of(ns: &ResolveResult) -> String {
    match ns {
        ResolveResult::Bound(Namespace(uri)) => String::from_utf8_lossy(uri).into_owned(),
        _ => String::new(),
    }
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

/// Parse an XMP packet.
///
/// Malformed XML and nesting deeper than `max_depth` stop parsing with a
/// warning; whatever was already read is kept.
pub fn parse_xmp_packet(
    packet: &[u8],
    max_depth: usize,
    warnings: &mut Vec<ParseWarning>,
) -> XmpBuckets {
    let mut buckets = XmpBuckets::default();
    let mut reader = NsReader::from_reader(packet);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut description_depth: Option<usize> = None;
    let mut property: Option<OpenProperty> = None;

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, event)) => (namespace_of(&ns), event),
            Err(e) => {
                warnings.push(ParseWarning::new(
                    "xmp",
                    format!("malformed XML at byte {}: {}", reader.buffer_position(), e),
                ));
                break;
            }
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                depth += 1;
                if depth > max_depth {
                    warnings.push(ParseWarning::new(
                        "xmp",
                        format!("nesting deeper than {} levels, parsing stopped", max_depth),
                    ));
                    break;
                }
                let name = local_name(e);

                if ns == RDF_NS && name == "Description" {
                    for attr in e.attributes().flatten() {
                        let key = attr.key;
                        if key.as_namespace_binding().is_some() {
                            continue;
                        }
                        let (attr_ns, attr_local) = reader.resolve_attribute(key);
                        let group = match route_namespace(&namespace_of(&attr_ns)) {
                            Some(group) => group,
                            None => continue,
                        };
                        let attr_name = String::from_utf8_lossy(attr_local.as_ref()).into_owned();
                        match attr.unescape_value() {
                            Ok(value) => buckets.insert(group, attr_name, coerce_xmp_value(&value)),
                            Err(e) => warnings.push(ParseWarning::new(
                                "xmp",
                                format!("attribute {}: {}", attr_name, e),
                            )),
                        }
                    }
                    if !is_empty && description_depth.is_none() {
                        description_depth = Some(depth);
                    }
                } else if let Some(open) = property.as_mut() {
                    if ns == RDF_NS && name == "li" && !is_empty {
                        open.in_item = true;
                        open.items.push(String::new());
                    }
                } else if description_depth.map(|d| depth == d + 1).unwrap_or(false) {
                    if let Some(group) = route_namespace(&ns) {
                        if !is_empty {
                            property = Some(OpenProperty {
                                group,
                                name,
                                depth,
                                text: String::new(),
                                items: Vec::new(),
                                in_item: false,
                            });
                        }
                    }
                }

                if is_empty {
                    depth -= 1;
                }
            }
            Event::Text(ref t) => {
                if let Some(open) = property.as_mut() {
                    match t.unescape() {
                        Ok(text) => {
                            if open.in_item {
                                if let Some(last) = open.items.last_mut() {
                                    last.push_str(&text);
                                }
                            } else {
                                open.text.push_str(&text);
                            }
                        }
                        Err(e) => warnings.push(ParseWarning::new(
                            "xmp",
                            format!("property {}: {}", open.name, e),
                        )),
                    }
                }
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let closes_property = property.as_ref().map(|p| p.depth == depth).unwrap_or(false);
                if closes_property {
                    if let Some(open) = property.take() {
                        let value = finish_property(&open);
                        buckets.insert(open.group, open.name, value);
                    }
                } else if let Some(open) = property.as_mut() {
                    if ns == RDF_NS && name == "li" {
                        open.in_item = false;
                    }
                }
                if description_depth == Some(depth) {
                    description_depth = None;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    buckets
}

fn finish_property(open: &OpenProperty) -> MetadataValue {
    match open.items.len() {
        0 => coerce_xmp_value(&open.text),
        1 => coerce_xmp_value(&open.items[0]),
        _ => MetadataValue::List(open.items.iter().map(|i| coerce_xmp_value(i)).collect()),
    }
}

/// Find the XMP APP1 segment in a JPEG byte stream and return the packet.
pub fn find_jpeg_xmp_segment(data: &[u8]) -> Option<Vec<u8>> {
    if data.len() < 4 || data[0..2] != [0xFF, 0xD8] {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // end of image, start of scan
            0xD9 | 0xDA => return None,
            0xD8 | 0x01 | 0xFF => {
                pos += if marker == 0xFF { 1 } else { 2 };
                continue;
            }
            0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let segment_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if segment_len < 2 {
            return None;
        }
        let start = pos + 4;
        let end = pos + 2 + segment_len;
        if end > data.len() {
            return None;
        }

        if marker == 0xE1 {
            let segment = &data[start..end];
            if segment.len() > XMP_MARKER.len() + 1
                && segment.starts_with(XMP_MARKER)
                && segment[XMP_MARKER.len()] == 0
            {
                return Some(segment[XMP_MARKER.len() + 1..].to_vec());
            }
        }
        pos = end;
    }
    None
}
