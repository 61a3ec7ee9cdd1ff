use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use exif::{Context, Exif, In, Tag, Value};
use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::gps::{self, GeoCoordinate};
use super::tags::{self, Directory, XMP_PACKET_TAG};
use super::xmp;
use super::{
    sanitize_value, Extraction, FileAccessError, MetadataGroup, MetadataGroups,
    MetadataValue, ParseWarning,
};

/// Resource limits applied while reading untrusted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionLimits {
    /// Files above this size are refused
    pub max_file_bytes: u64,
    /// XMP packets above this size are skipped
    pub max_xmp_bytes: usize,
    /// Tags beyond this count are skipped
    pub max_tags: usize,
    /// XMP element nesting limit
    pub max_xml_depth: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 256 * 1024 * 1024,
            max_xmp_bytes: 1024 * 1024,
            max_tags: 4096,
            max_xml_depth: 64,
        }
    }
}

/// Read a whole file, refusing anything above `limit` bytes.
pub(crate) fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>, FileAccessError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| FileAccessError::Open {
        path: display.clone(),
        source,
    })?;

    if let Ok(meta) = file.metadata() {
        if meta.len() > limit {
            return Err(FileAccessError::TooLarge {
                path: display,
                size: meta.len(),
                limit,
            });
        }
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|source| FileAccessError::Read {
            path: display.clone(),
            source,
        })?;

    if bytes.len() as u64 > limit {
        return Err(FileAccessError::TooLarge {
            path: display,
            size: bytes.len() as u64,
            limit,
        });
    }
    Ok(bytes)
}

/// Extracts grouped metadata from image files.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    limits: ExtractionLimits,
}

impl MetadataExtractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Extract metadata from a file on disk.
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<Extraction, FileAccessError> {
        let path = path.as_ref();
        let bytes = read_bounded(path, self.limits.max_file_bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "extracting image metadata");
        let mut extraction = self.extract_bytes(&bytes)?;
        extraction
            .groups
            .insert(MetadataGroup::BasicInfo, "file_size", MetadataValue::Int(bytes.len() as i64));
        Ok(extraction)
    }

    /// Extract metadata from an in-memory image.
    ///
    /// Fails only when neither an image header nor a tag directory can be read.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction, FileAccessError> {
        if bytes.len() as u64 > self.limits.max_file_bytes {
            return Err(FileAccessError::TooLarge {
                path: "<memory>".to_string(),
                size: bytes.len() as u64,
                limit: self.limits.max_file_bytes,
            });
        }

        let mut extraction = Extraction::default();
        let header = read_header(bytes, &mut extraction.warnings);
        let exif = read_exif(bytes, &mut extraction.warnings);

        if header.format.is_none() && exif.is_none() {
            return Err(FileAccessError::Unrecognized(
                "no image header or tag directory found".to_string(),
            ));
        }

        let mut xmp_packet = None;
        if let Some(exif) = &exif {
            xmp_packet = self.route_fields(exif, &mut extraction);
        }
        if xmp_packet.is_none() {
            xmp_packet = xmp::find_jpeg_xmp_segment(bytes);
        }
        if let Some(packet) = xmp_packet {
            self.route_xmp(&packet, &mut extraction);
        }

        fill_basic_info(header, exif.as_ref(), &mut extraction);
        add_gps_decimal(&mut extraction);

        for warning in &extraction.warnings {
            debug!(location = %warning.location, "{}", warning.message);
        }
        Ok(extraction)
    }

    /// Route every primary-image field into its group. Returns the XMP packet
    /// when tag 700 is present.
    fn route_fields(&self, exif: &Exif, extraction: &mut Extraction) -> Option<Vec<u8>> {
        let mut packet = None;
        let mut limit_hit = false;
        let stats = &mut extraction.stats;

        for field in exif.fields() {
            if field.ifd_num != In::PRIMARY {
                stats.skipped_tags += 1;
                continue;
            }
            stats.observed_tags += 1;

            if stats.routed_tags >= self.limits.max_tags {
                stats.skipped_tags += 1;
                if !limit_hit {
                    limit_hit = true;
                    extraction.warnings.push(ParseWarning::new(
                        "exif",
                        format!("more than {} tags, remaining tags skipped", self.limits.max_tags),
                    ));
                }
                continue;
            }

            let id = field.tag.number();
            let directory = directory_of(field.tag);

            if directory == Directory::Tiff && id == XMP_PACKET_TAG {
                match &field.value {
                    Value::Byte(data) | Value::Undefined(data, _) => packet = Some(data.clone()),
                    Value::Ascii(parts) => packet = Some(parts.concat()),
                    _ => extraction
                        .warnings
                        .push(ParseWarning::new("xmp", "XMLPacket tag has an unexpected type")),
                }
                stats.routed_tags += 1;
                continue;
            }

            let name = resolve_name(field.tag, directory);
            let group = tags::classify_tag(id, name.as_deref(), directory);
            let key = match (group, name) {
                (MetadataGroup::Proprietary, _) | (_, None) => id.to_string(),
                (_, Some(name)) => name,
            };
            trace!(tag = id, group = group.as_str(), key = %key, "routed tag");
            extraction.groups.insert(group, key, sanitize_value(&field.value));
            stats.routed_tags += 1;
        }
        packet
    }

    fn route_xmp(&self, packet: &[u8], extraction: &mut Extraction) {
        if packet.len() > self.limits.max_xmp_bytes {
            extraction.warnings.push(ParseWarning::new(
                "xmp",
                format!(
                    "packet of {} bytes exceeds the {} byte limit, skipped",
                    packet.len(),
                    self.limits.max_xmp_bytes
                ),
            ));
            return;
        }

        let buckets = xmp::parse_xmp_packet(packet, self.limits.max_xml_depth, &mut extraction.warnings);
        extraction.stats.xmp_properties = buckets.len();
        extraction.groups.xmp_camera.extend(buckets.camera);
        extraction.groups.xmp_vendor.extend(buckets.vendor);
        extraction.groups.xmp_light_sensor.extend(buckets.light_sensor);
    }
}

#[allow(unreachable_patterns)]
fn directory_of(tag: Tag) -> Directory {
    match tag.context() {
        Context::Tiff => Directory::Tiff,
        Context::Exif => Directory::Exif,
        Context::Gps => Directory::Gps,
        _ => Directory::Other,
    }
}

/// Library name when the tag is known, else the supplementary TIFF table.
fn resolve_name(tag: Tag, directory: Directory) -> Option<String> {
    if tag.description().is_some() {
        return Some(tag.to_string());
    }
    match directory {
        Directory::Tiff => tags::supplementary_name(tag.number()).map(str::to_string),
        _ => None,
    }
}

struct Header {
    format: Option<ImageFormat>,
    dimensions: Option<(u32, u32)>,
    color: Option<ColorType>,
}

/// Read format, dimensions and colour type without decoding pixels.
fn read_header(bytes: &[u8], warnings: &mut Vec<ParseWarning>) -> Header {
    let mut header = Header {
        format: None,
        dimensions: None,
        color: None,
    };

    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            warnings.push(ParseWarning::new("basic_info", format!("format detection failed: {}", e)));
            return header;
        }
    };
    header.format = reader.format();
    if header.format.is_none() {
        return header;
    }

    match reader.into_decoder() {
        Ok(decoder) => {
            header.dimensions = Some(decoder.dimensions());
            header.color = Some(decoder.color_type());
        }
        Err(e) => warnings.push(ParseWarning::new(
            "basic_info",
            format!("image header not decodable, using tag dimensions: {}", e),
        )),
    }
    header
}

fn read_exif(bytes: &[u8], warnings: &mut Vec<ParseWarning>) -> Option<Exif> {
    let mut reader = exif::Reader::new();
    reader.continue_on_error(true);

    let result = reader
        .read_from_container(&mut Cursor::new(bytes))
        .or_else(|e| {
            e.distill_partial_result(|errors| {
                for error in errors {
                    warnings.push(ParseWarning::new("exif", error.to_string()));
                }
            })
        });

    match result {
        Ok(exif) => Some(exif),
        Err(exif::Error::NotFound(_)) => None,
        Err(e) => {
            warnings.push(ParseWarning::new("exif", format!("tag directory unreadable: {}", e)));
            None
        }
    }
}

fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Pixel layout name in the conventional single-token form.
fn mode_name(color: ColorType) -> String {
    #[allow(unreachable_patterns)]
    let mode = match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;32F",
        ColorType::Rgba32F => "RGBA;32F",
        other => return format!("{:?}", other).to_uppercase(),
    };
    mode.to_string()
}

fn tag_dimension(exif: Option<&Exif>, primary: Tag, fallback: Tag) -> Option<u32> {
    let exif = exif?;
    exif.get_field(primary, In::PRIMARY)
        .or_else(|| exif.get_field(fallback, In::PRIMARY))
        .and_then(|field| field.value.get_uint(0))
}

fn fill_basic_info(header: Header, exif: Option<&Exif>, extraction: &mut Extraction) {
    let basic = &mut extraction.groups.basic_info;
    let format = header.format.map(format_name).unwrap_or_else(|| "UNKNOWN".to_string());
    basic.insert("format".to_string(), MetadataValue::Text(format));
    let mode = header.color.map(mode_name).unwrap_or_else(|| "unknown".to_string());
    basic.insert("mode".to_string(), MetadataValue::Text(mode));

    let dimensions = header.dimensions.or_else(|| {
        let width = tag_dimension(exif, Tag::PixelXDimension, Tag::ImageWidth)?;
        let height = tag_dimension(exif, Tag::PixelYDimension, Tag::ImageLength)?;
        Some((width, height))
    });

    match dimensions {
        Some((width, height)) => {
            basic.insert("width".to_string(), width.into());
            basic.insert("height".to_string(), height.into());
            basic.insert(
                "size".to_string(),
                MetadataValue::List(vec![width.into(), height.into()]),
            );
        }
        None => extraction
            .warnings
            .push(ParseWarning::new("basic_info", "image dimensions unavailable")),
    }
}

/// Store decimal coordinates next to the raw GPS tags.
fn add_gps_decimal(extraction: &mut Extraction) {
    let groups: &MetadataGroups = &extraction.groups;
    let (lat_value, lon_value) = match (
        groups.get(MetadataGroup::GpsLocation, "GPSLatitude"),
        groups.get(MetadataGroup::GpsLocation, "GPSLongitude"),
    ) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return,
    };
    let lat_ref = groups
        .text(MetadataGroup::GpsLocation, "GPSLatitudeRef")
        .unwrap_or_else(|| "N".to_string());
    let lon_ref = groups
        .text(MetadataGroup::GpsLocation, "GPSLongitudeRef")
        .unwrap_or_else(|| "E".to_string());

    let parsed = gps::parse_coordinate(lat_value, Some(&lat_ref))
        .zip(gps::parse_coordinate(lon_value, Some(&lon_ref)));
    let (lat, lon) = match parsed {
        Some(pair) => pair,
        None => {
            extraction
                .warnings
                .push(ParseWarning::new("gps_location", "GPS coordinates not parseable"));
            return;
        }
    };

    match GeoCoordinate::new(gps::round_coordinate(lat), gps::round_coordinate(lon)) {
        Ok(coordinate) => {
            let gps = &mut extraction.groups.gps_location;
            gps.insert("_latitude_decimal".to_string(), coordinate.latitude().into());
            gps.insert("_longitude_decimal".to_string(), coordinate.longitude().into());
            gps.insert("_coordinates_readable".to_string(), coordinate.readable().into());
        }
        Err(e) => extraction
            .warnings
            .push(ParseWarning::new("gps_location", e.to_string())),
    }
}
