//! Tag name tables and the routing rule that places each tag in a group.
//!
//! Routing is total and priority-ordered:
//! 1. unresolved IDs and the proprietary allow-list → `proprietary`
//! 2. tags from the GPS directory → `gps_location`
//! 3. DNG names → `dng_calibration`
//! 4. TIFF baseline names → `tiff_structure`
//! 5. EXIF camera/exposure names → `exif_camera`
//! 6. any other tag from the EXIF directory → `exif_camera`
//! 7. everything else → `unknown`

use std::collections::HashSet;

use lazy_static::lazy_static;

use super::MetadataGroup;

/// Vendor-specific numeric tags (MicaSense packed structure, numeric data, identifiers).
pub const PROPRIETARY_TAG_IDS: [u16; 3] = [48020, 48021, 48022];

/// TIFF tag carrying the XMP packet.
pub const XMP_PACKET_TAG: u16 = 700;

lazy_static! {
    pub static ref TIFF_TAG_NAMES: HashSet<&'static str> = [
        "ImageWidth", "ImageLength", "BitsPerSample", "Compression",
        "PhotometricInterpretation", "FillOrder", "SamplesPerPixel",
        "RowsPerStrip", "StripOffsets", "StripByteCounts", "PlanarConfiguration",
        "Orientation", "NewSubfileType", "XResolution", "YResolution",
        "ResolutionUnit", "Software", "DateTime", "Artist", "Copyright",
        "Make", "Model", "ExifOffset", "ExifIFDPointer", "GPSInfoIFDPointer",
    ]
    .into_iter()
    .collect();

    pub static ref DNG_TAG_NAMES: HashSet<&'static str> = [
        "DNGVersion", "DNGBackwardVersion", "UniqueCameraModel",
        "BlackLevelRepeatDim", "BlackLevel", "WhiteLevel",
        "ColorMatrix1", "ColorMatrix2", "AsShotNeutral",
        "BaselineExposure", "BaselineNoise", "BaselineSharpness",
        "OpcodeList1", "OpcodeList2", "OpcodeList3",
        "DefaultCropOrigin", "DefaultCropSize", "CalibrationIlluminant1",
        "CalibrationIlluminant2", "CameraCalibration1", "CameraCalibration2",
    ]
    .into_iter()
    .collect();

    pub static ref EXIF_TAG_NAMES: HashSet<&'static str> = [
        "ExposureTime", "FNumber", "ExposureProgram", "ISOSpeedRatings",
        "PhotographicSensitivity", "DateTimeOriginal", "DateTimeDigitized",
        "ShutterSpeedValue", "ApertureValue", "BrightnessValue", "ExposureBiasValue",
        "MaxApertureValue", "MeteringMode", "LightSource", "Flash",
        "FocalLength", "FocalLengthIn35mmFilm", "SensingMethod",
        "FileSource", "SceneType", "WhiteBalance", "DigitalZoomRatio",
        "SceneCaptureType", "GainControl", "Contrast", "Saturation", "Sharpness",
        "SubjectDistanceRange", "ImageUniqueID", "ExifVersion", "ComponentsConfiguration",
    ]
    .into_iter()
    .collect();
}

/// Tag directory a field was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directory {
    /// IFD0 (baseline TIFF tags)
    Tiff,
    /// EXIF sub-directory
    Exif,
    /// GPS sub-directory
    Gps,
    /// Interoperability or any other directory
    Other,
}

/// Names for TIFF-context IDs the EXIF library does not know (mostly DNG).
pub fn supplementary_name(id: u16) -> Option<&'static str> {
    let name = match id {
        254 => "NewSubfileType",
        266 => "FillOrder",
        700 => "XMLPacket",
        50706 => "DNGVersion",
        50707 => "DNGBackwardVersion",
        50708 => "UniqueCameraModel",
        50713 => "BlackLevelRepeatDim",
        50714 => "BlackLevel",
        50717 => "WhiteLevel",
        50719 => "DefaultCropOrigin",
        50720 => "DefaultCropSize",
        50721 => "ColorMatrix1",
        50722 => "ColorMatrix2",
        50723 => "CameraCalibration1",
        50724 => "CameraCalibration2",
        50728 => "AsShotNeutral",
        50730 => "BaselineExposure",
        50731 => "BaselineNoise",
        50732 => "BaselineSharpness",
        50778 => "CalibrationIlluminant1",
        50779 => "CalibrationIlluminant2",
        51008 => "OpcodeList1",
        51009 => "OpcodeList2",
        51022 => "OpcodeList3",
        _ => return None,
    };
    Some(name)
}

/// Route a tag to its group.
///
/// `name` is `None` when the ID could not be resolved through any lookup table.
pub fn classify_tag(id: u16, name: Option<&str>, directory: Directory) -> MetadataGroup {
    let name = match name {
        Some(name) if !PROPRIETARY_TAG_IDS.contains(&id) => name,
        _ => return MetadataGroup::Proprietary,
    };

    if directory == Directory::Gps {
        MetadataGroup::GpsLocation
    } else if DNG_TAG_NAMES.contains(name) {
        MetadataGroup::DngCalibration
    } else if TIFF_TAG_NAMES.contains(name) {
        MetadataGroup::TiffStructure
    } else if EXIF_TAG_NAMES.contains(name) || directory == Directory::Exif {
        MetadataGroup::ExifCamera
    } else {
        MetadataGroup::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_sets_are_disjoint() {
        assert!(TIFF_TAG_NAMES.is_disjoint(&DNG_TAG_NAMES));
        assert!(TIFF_TAG_NAMES.is_disjoint(&EXIF_TAG_NAMES));
        assert!(DNG_TAG_NAMES.is_disjoint(&EXIF_TAG_NAMES));
    }

    #[test]
    fn test_proprietary_wins_over_name() {
        assert_eq!(
            classify_tag(48021, Some("Make"), Directory::Tiff),
            MetadataGroup::Proprietary
        );
        assert_eq!(classify_tag(12345, None, Directory::Tiff), MetadataGroup::Proprietary);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            classify_tag(50706, Some("DNGVersion"), Directory::Tiff),
            MetadataGroup::DngCalibration
        );
        assert_eq!(classify_tag(271, Some("Make"), Directory::Tiff), MetadataGroup::TiffStructure);
        assert_eq!(
            classify_tag(36867, Some("DateTimeOriginal"), Directory::Exif),
            MetadataGroup::ExifCamera
        );
        assert_eq!(
            classify_tag(2, Some("GPSLatitude"), Directory::Gps),
            MetadataGroup::GpsLocation
        );
    }

    #[test]
    fn test_exif_directory_fallback_and_unknown() {
        assert_eq!(
            classify_tag(42036, Some("LensModel"), Directory::Exif),
            MetadataGroup::ExifCamera
        );
        assert_eq!(
            classify_tag(270, Some("ImageDescription"), Directory::Tiff),
            MetadataGroup::Unknown
        );
    }

    #[test]
    fn test_supplementary_names_resolve_to_dng() {
        for id in [50706u16, 50714, 50721, 51022] {
            let name = supplementary_name(id).unwrap();
            assert_eq!(classify_tag(id, Some(name), Directory::Tiff), MetadataGroup::DngCalibration);
        }
        assert_eq!(supplementary_name(1), None);
    }
}
