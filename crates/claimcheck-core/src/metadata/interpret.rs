//! Human-readable meanings for metadata keys, and MicaSense camera
//! specifications.
//!
//! Interpretations are keyed by group because the same key can mean
//! different things in different groups (`Yaw` on the camera vs. on the
//! light sensor). Proprietary tags are keyed by their numeric ID.

use std::collections::HashMap;
use std::fmt::Write as _;

use lazy_static::lazy_static;
use serde::Serialize;

use super::{MetadataGroup, MetadataGroups, MetadataValue};

type Table = HashMap<&'static str, &'static str>;

fn table(entries: &[(&'static str, &'static str)]) -> Table {
    entries.iter().copied().collect()
}

lazy_static! {
    static ref BASIC_INFO: Table = table(&[
        ("format", "Image file format (TIFF, JPEG, PNG, etc.)"),
        ("mode", "Pixel format and bit depth. Common values: 'RGB' (24-bit color), 'L' (8-bit grayscale), 'I;16' (16-bit integer grayscale), 'F' (32-bit float)"),
        ("size", "Image dimensions as (width, height) in pixels"),
        ("width", "Image width in pixels"),
        ("height", "Image height in pixels"),
        ("file_size", "File size in bytes"),
    ]);

    static ref TIFF_STRUCTURE: Table = table(&[
        ("ImageWidth", "Image width in pixels"),
        ("ImageLength", "Image height in pixels"),
        ("BitsPerSample", "Bits per pixel channel. 8=standard, 12/14/16=high dynamic range for scientific imaging"),
        ("Compression", "Compression type. 1=none, 5=LZW, 6=JPEG, 7=JPEG2000, 8=deflate"),
        ("PhotometricInterpretation", "Color space interpretation. 0=WhiteIsZero, 1=BlackIsZero, 2=RGB, 3=Palette, 6=YCbCr"),
        ("FillOrder", "Bit order within bytes. 1=MSB first (standard), 2=LSB first"),
        ("SamplesPerPixel", "Number of channels per pixel. 1=grayscale, 3=RGB, 4=RGBA"),
        ("RowsPerStrip", "Number of rows per strip for strip-based storage"),
        ("StripOffsets", "Byte offsets to each strip in the file"),
        ("StripByteCounts", "Size in bytes of each strip"),
        ("PlanarConfiguration", "Data organization. 1=chunky (RGBRGB), 2=planar (RRR...GGG...BBB)"),
        ("Orientation", "Image orientation. 1=normal, 3=rotated 180°, 6=rotated 90° CW, 8=rotated 90° CCW"),
        ("NewSubfileType", "Subfile type. 0=full resolution, 1=reduced resolution, 2=single page of multi-page"),
        ("XResolution", "Horizontal resolution in ResolutionUnit"),
        ("YResolution", "Vertical resolution in ResolutionUnit"),
        ("ResolutionUnit", "Resolution unit. 1=none, 2=inches (DPI), 3=centimeters"),
        ("Software", "Software/firmware used to create the image"),
        ("DateTime", "Date and time of image creation (local time)"),
        ("Artist", "Creator of the image"),
        ("Copyright", "Copyright information"),
        ("Make", "Camera manufacturer"),
        ("Model", "Camera model"),
        ("ExifOffset", "Offset to EXIF IFD"),
    ]);

    static ref DNG_CALIBRATION: Table = table(&[
        ("DNGVersion", "DNG specification version (major.minor.patch.revision)"),
        ("DNGBackwardVersion", "Minimum DNG reader version required"),
        ("UniqueCameraModel", "Unique camera identifier for color profile matching"),
        ("BlackLevelRepeatDim", "Pattern size for black level values (rows, cols)"),
        ("BlackLevel", "Black level values per pattern cell. Subtract from raw values for calibration"),
        ("WhiteLevel", "Maximum valid pixel value (saturation point)"),
        ("ColorMatrix1", "XYZ to camera color space transformation matrix (illuminant 1)"),
        ("ColorMatrix2", "XYZ to camera color space transformation matrix (illuminant 2)"),
        ("AsShotNeutral", "White balance coefficients as shot"),
        ("BaselineExposure", "Exposure compensation in EV"),
        ("BaselineNoise", "Relative noise level"),
        ("BaselineSharpness", "Relative sharpness"),
        ("OpcodeList1", "Opcodes to apply before demosaicing"),
        ("OpcodeList2", "Opcodes to apply after demosaicing"),
        ("OpcodeList3", "Opcodes to apply after mapping to output color space"),
    ]);

    static ref EXIF_CAMERA: Table = table(&[
        ("ExposureTime", "Exposure duration in seconds. Used in radiance calculation"),
        ("FNumber", "F-stop (aperture). Lower = wider aperture, more light"),
        ("ExposureProgram", "Exposure mode. 0=undefined, 1=manual, 2=auto, 3=aperture priority, 4=shutter priority"),
        ("ISOSpeedRatings", "ISO sensitivity. Gain = ISOSpeedRatings / 100 for MicaSense"),
        ("PhotographicSensitivity", "ISO sensitivity. Gain = PhotographicSensitivity / 100 for MicaSense"),
        ("ISOSpeed", "Alternative ISO tag. Gain = ISOSpeed / 100 for MicaSense"),
        ("DateTimeOriginal", "Date/time when original image was taken"),
        ("DateTimeDigitized", "Date/time when image was digitized"),
        ("ShutterSpeedValue", "Shutter speed in APEX units. Exposure = 2^(-ShutterSpeedValue)"),
        ("ApertureValue", "Aperture in APEX units. F-number = 2^(ApertureValue/2)"),
        ("BrightnessValue", "Brightness in APEX units"),
        ("ExposureBiasValue", "Exposure compensation in EV"),
        ("MaxApertureValue", "Maximum lens aperture in APEX units"),
        ("MeteringMode", "Metering mode. 1=average, 2=center-weighted, 3=spot, 4=multi-spot, 5=pattern"),
        ("LightSource", "Light source. 0=auto, 1=daylight, 2=fluorescent, 3=tungsten, 9=fine weather"),
        ("Flash", "Flash status and mode (bit field)"),
        ("FocalLength", "Focal length in mm"),
        ("FocalLengthIn35mmFilm", "Equivalent focal length for 35mm film"),
        ("SensingMethod", "Sensor type. 1=undefined, 2=one-chip color, 3=two-chip, 4=three-chip, 5=color sequential"),
        ("FileSource", "Image source. 1=film scanner, 2=reflection print scanner, 3=digital camera"),
        ("SceneType", "Scene type. 1=directly photographed"),
        ("WhiteBalance", "White balance mode. 0=auto, 1=manual"),
        ("DigitalZoomRatio", "Digital zoom ratio"),
        ("SceneCaptureType", "Scene capture type. 0=standard, 1=landscape, 2=portrait, 3=night"),
        ("GainControl", "Gain control. 0=none, 1=low gain up, 2=high gain up, 3=low gain down, 4=high gain down"),
        ("Contrast", "Contrast. 0=normal, 1=soft, 2=hard"),
        ("Saturation", "Saturation. 0=normal, 1=low, 2=high"),
        ("Sharpness", "Sharpness. 0=normal, 1=soft, 2=hard"),
        ("SubjectDistanceRange", "Subject distance range. 0=unknown, 1=macro, 2=close, 3=distant"),
        ("ImageUniqueID", "Unique image identifier"),
        ("ExifVersion", "EXIF version"),
        ("ComponentsConfiguration", "Pixel components configuration"),
    ]);

    static ref GPS_LOCATION: Table = table(&[
        ("GPSVersionID", "GPS tag version (typically 2.2.0.0)"),
        ("GPSLatitudeRef", "Latitude reference: 'N' (north) or 'S' (south)"),
        ("GPSLatitude", "Latitude as (degrees, minutes, seconds)"),
        ("GPSLongitudeRef", "Longitude reference: 'E' (east) or 'W' (west)"),
        ("GPSLongitude", "Longitude as (degrees, minutes, seconds)"),
        ("GPSAltitudeRef", "Altitude reference: 0=above sea level, 1=below sea level"),
        ("GPSAltitude", "Altitude in meters"),
        ("GPSTimeStamp", "UTC time as (hours, minutes, seconds)"),
        ("GPSSatellites", "Satellites used for measurement"),
        ("GPSStatus", "Receiver status: 'A'=active, 'V'=void"),
        ("GPSMeasureMode", "Measurement mode: '2'=2D, '3'=3D"),
        ("GPSDOP", "Dilution of Precision. Lower=better. <1=RTK quality, 1-2=excellent, 2-5=good"),
        ("GPSSpeedRef", "Speed unit: 'K'=km/h, 'M'=mph, 'N'=knots"),
        ("GPSSpeed", "Ground speed"),
        ("GPSTrackRef", "Track direction reference: 'T'=true north, 'M'=magnetic north"),
        ("GPSTrack", "Direction of movement in degrees"),
        ("GPSImgDirectionRef", "Image direction reference: 'T'=true north, 'M'=magnetic north"),
        ("GPSImgDirection", "Direction the camera was facing in degrees"),
        ("GPSMapDatum", "Geodetic datum (e.g., 'WGS-84')"),
        ("GPSDateStamp", "UTC date as 'YYYY:MM:DD'"),
        ("GPSHPositioningError", "Horizontal positioning error in meters"),
        ("_latitude_decimal", "Latitude in signed decimal degrees"),
        ("_longitude_decimal", "Longitude in signed decimal degrees"),
        ("_coordinates_readable", "Coordinates formatted for display"),
    ]);

    static ref XMP_CAMERA: Table = table(&[
        ("RigName", "Multi-camera rig identifier (e.g., 'Altum-PT', 'RedEdge-MX')"),
        ("BandName", "Spectral band name: 'Blue', 'Green', 'Red', 'Red edge', 'NIR', 'Panchro', 'LWIR'"),
        ("CentralWavelength", "Center wavelength of spectral band in nanometers"),
        ("WavelengthFWHM", "Full Width at Half Maximum - spectral bandwidth in nm"),
        ("ModelType", "Camera projection model: 'perspective' (pinhole), 'fisheye', etc."),
        ("PrincipalPoint", "Optical center offset from image center in mm (x, y)"),
        ("PerspectiveFocalLength", "Focal length in specified units"),
        ("PerspectiveFocalLengthUnits", "Units for focal length (typically 'mm')"),
        ("PerspectiveDistortion", "Lens distortion coefficients [k1, k2, k3, p1, p2] (Brown-Conrady model). Negative k1 = barrel distortion"),
        ("VignettingCenter", "Vignette center point (cx, cy) in pixels for radial model"),
        ("VignettingPolynomial", "Radial vignette polynomial coefficients [k0-k5]. V(r) = 1 + k0*r + k1*r² + ... + k5*r⁶"),
        ("VignettingPolynomial2DName", "Indices for 2D vignetting polynomial terms (newer Altum-PT/RedEdge-P)"),
        ("VignettingPolynomial2D", "Coefficients for 2D vignetting correction across image field"),
        ("BandSensitivity", "Relative sensitivity of this band for inter-band normalization"),
        ("RigCameraIndex", "Index of this camera in multi-camera rig (0-based)"),
        ("RigRelativesReferenceRigCameraIndex", "Reference camera index for relative positioning"),
        ("RigRelatives", "Relative rotation angles to reference camera"),
        ("RigTranslations", "Physical offset from reference camera in mm [x, y, z]"),
        ("RigTranslationsUnits", "Units for rig translations (typically 'mm')"),
        ("Yaw", "Camera heading/azimuth in degrees (0-360, 0=North, 90=East)"),
        ("Pitch", "Camera tilt from horizontal in degrees (negative=pointing down)"),
        ("Roll", "Camera rotation around optical axis in degrees"),
        ("GPSXYAccuracy", "Horizontal positioning accuracy in meters (RTK: <0.02m)"),
        ("GPSZAccuracy", "Vertical positioning accuracy in meters (RTK: <0.03m)"),
        ("Irradiance", "Incident spectral irradiance at sensor in W/m²/μm"),
        ("IrradianceYaw", "Sensor orientation (yaw) when irradiance was measured in degrees"),
        ("IrradiancePitch", "Sensor orientation (pitch) when irradiance was measured in degrees"),
        ("IrradianceRoll", "Sensor orientation (roll) when irradiance was measured in degrees"),
        ("AutoCalibrationImage", "Boolean: True if this is a calibration panel image"),
        ("PanelAlbedo", "Reflectance panel albedo value calculated by camera (0-1)"),
        ("CalibrationPanelDetected", "Boolean: True if calibration panel was detected in image"),
    ]);

    static ref XMP_VENDOR: Table = table(&[
        ("RadiometricCalibration", "Calibration coefficients [a1, a2, a3] for radiance: L = V(x,y) × (a1 + a2×DN + a3×DN²) / (ExposureTime × Gain)"),
        ("ImagerTemperatureC", "Sensor temperature in Celsius for dark current correction"),
        ("SensorTemperature", "Alternative tag for sensor temperature (some firmware versions)"),
        ("FlightId", "Unique identifier for the flight/mission session"),
        ("CaptureId", "Unique identifier for simultaneous multi-band capture (same across all bands)"),
        ("TriggerMethod", "Capture trigger source: 0=unknown, 1=timer, 2=manual, 3=external, 4=wifi, 5=software, 6=flight controller"),
        ("PressureAlt", "Barometric altitude in meters (0 if not available or invalid)"),
        ("DarkRowValue", "Optically masked pixel values for black level calibration (array of 4 values)"),
        ("BootTimestamp", "Ticks since camera boot for inter-camera synchronization"),
        ("ThermalCalibration", "Thermal sensor calibration coefficients"),
        ("LwirSceneEmissivity", "Scene emissivity setting for thermal calculation (0-1, typically 0.95)"),
        ("LwirReflectedTemperature", "Reflected temperature setting for thermal calculation in Celsius"),
        ("LwirWindowTransmission", "Window transmission factor for thermal calculation"),
        ("LwirWindowTemperature", "Window temperature for thermal calculation in Celsius"),
        ("PanchromaticCalibration", "Panchromatic sensor specific calibration data"),
    ]);

    static ref XMP_LIGHT_SENSOR: Table = table(&[
        ("Serial", "DLS (Downwelling Light Sensor) serial number"),
        ("SwVersion", "DLS firmware version"),
        ("CenterWavelength", "DLS spectral band center wavelength in nm"),
        ("Bandwidth", "DLS spectral bandwidth (FWHM) in nm"),
        ("TimeStamp", "DLS measurement timestamp for camera sync (ticks)"),
        ("SpectralIrradiance", "Raw irradiance on tilted sensor surface in W/m²/nm (use HorizontalIrradiance for DLS2)"),
        ("HorizontalIrradiance", "Irradiance on horizontal surface in W/m²/nm (DLS2 only, preferred)"),
        ("DirectIrradiance", "Direct solar irradiance component in W/m²/nm (DLS2 only)"),
        ("ScatteredIrradiance", "Diffuse/scattered sky irradiance in W/m²/nm (DLS2 only)"),
        ("SolarElevation", "Sun elevation angle above horizon in radians"),
        ("SolarAzimuth", "Sun azimuth angle in radians (0=North, π/2=East)"),
        ("EstimatedDirectLightVector", "Unit vector pointing toward sun in local NED frame [x, y, z]"),
        ("Yaw", "DLS orientation yaw in radians"),
        ("Pitch", "DLS orientation pitch in radians"),
        ("Roll", "DLS orientation roll in radians"),
        ("RawMeasurement", "Raw DLS sensor values before processing"),
        ("Gain", "DLS sensor gain setting"),
        ("ExposureTime", "DLS sensor exposure time"),
    ]);

    static ref PROPRIETARY: Table = table(&[
        ("48020", "MicaSense packed metadata structure"),
        ("48021", "MicaSense numeric data: [0, irradiance, timestamp, wavelength, bandwidth, ...]"),
        ("48022", "MicaSense identifiers string: 'CaptureId|FlightId|DLS_Serial'"),
    ]);
}

/// Interpretation table of a group. `unknown` has none.
pub fn group_interpretations(group: MetadataGroup) -> Option<&'static Table> {
    let table: &'static Table = match group {
        MetadataGroup::BasicInfo => &BASIC_INFO,
        MetadataGroup::TiffStructure => &TIFF_STRUCTURE,
        MetadataGroup::DngCalibration => &DNG_CALIBRATION,
        MetadataGroup::ExifCamera => &EXIF_CAMERA,
        MetadataGroup::GpsLocation => &GPS_LOCATION,
        MetadataGroup::XmpCamera => &XMP_CAMERA,
        MetadataGroup::XmpVendor => &XMP_VENDOR,
        MetadataGroup::XmpLightSensor => &XMP_LIGHT_SENSOR,
        MetadataGroup::Proprietary => &PROPRIETARY,
        MetadataGroup::Unknown => return None,
    };
    Some(table)
}

/// Meaning of `key` within `group`, if known.
pub fn interpretation(group: MetadataGroup, key: &str) -> Option<&'static str> {
    group_interpretations(group)?.get(key).copied()
}

/// Kind of spectral band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Multispectral,
    Panchromatic,
    Thermal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandSpec {
    pub index: u8,
    pub name: &'static str,
    /// Center wavelength in nm; `None` for panchromatic and thermal bands
    pub wavelength_nm: Option<u32>,
    /// FWHM in nm
    pub bandwidth_nm: Option<u32>,
    /// Spectral range for thermal bands (e.g. "8-14 μm")
    pub range: Option<&'static str>,
    pub kind: BandKind,
}

const fn ms(index: u8, name: &'static str, wavelength: u32, bandwidth: u32) -> BandSpec {
    BandSpec {
        index,
        name,
        wavelength_nm: Some(wavelength),
        bandwidth_nm: Some(bandwidth),
        range: None,
        kind: BandKind::Multispectral,
    }
}

const fn panchro(index: u8) -> BandSpec {
    BandSpec {
        index,
        name: "Panchro",
        wavelength_nm: None,
        bandwidth_nm: None,
        range: None,
        kind: BandKind::Panchromatic,
    }
}

const fn lwir(index: u8, range: &'static str) -> BandSpec {
    BandSpec {
        index,
        name: "LWIR",
        wavelength_nm: None,
        bandwidth_nm: None,
        range: Some(range),
        kind: BandKind::Thermal,
    }
}

/// Static specification of a MicaSense camera model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraSpecs {
    pub model: &'static str,
    pub description: &'static str,
    pub bands: &'static [BandSpec],
    /// (width, height) of one multispectral band
    pub resolution_ms: (u32, u32),
    pub resolution_pan: Option<(u32, u32)>,
    pub resolution_thermal: Option<(u32, u32)>,
    pub dls_version: &'static str,
    pub has_panchromatic: bool,
    pub has_thermal: bool,
    pub is_dual: bool,
}

const FIVE_BAND: [BandSpec; 5] = [
    ms(0, "Blue", 475, 32),
    ms(1, "Green", 560, 27),
    ms(2, "Red", 668, 14),
    ms(3, "Red edge", 717, 12),
    ms(4, "NIR", 842, 57),
];

const ALTUM_PT_BANDS: [BandSpec; 7] = [
    FIVE_BAND[0],
    FIVE_BAND[1],
    FIVE_BAND[2],
    FIVE_BAND[3],
    FIVE_BAND[4],
    panchro(5),
    lwir(6, "7.5-13.5 μm"),
];

const ALTUM_BANDS: [BandSpec; 6] = [
    FIVE_BAND[0],
    FIVE_BAND[1],
    FIVE_BAND[2],
    FIVE_BAND[3],
    FIVE_BAND[4],
    lwir(5, "8-14 μm"),
];

const REDEDGE_P_BANDS: [BandSpec; 6] = [
    FIVE_BAND[0],
    FIVE_BAND[1],
    FIVE_BAND[2],
    FIVE_BAND[3],
    FIVE_BAND[4],
    panchro(5),
];

const REDEDGE_MX_DUAL_BANDS: [BandSpec; 10] = [
    FIVE_BAND[0],
    FIVE_BAND[1],
    FIVE_BAND[2],
    FIVE_BAND[3],
    FIVE_BAND[4],
    ms(5, "Blue-444", 444, 28),
    ms(6, "Green-531", 531, 14),
    ms(7, "Red-650", 650, 16),
    ms(8, "Red edge-705", 705, 10),
    ms(9, "Red edge-740", 740, 18),
];

const REDEDGE_M_BANDS: [BandSpec; 5] = [
    ms(0, "Blue", 475, 20),
    ms(1, "Green", 560, 20),
    ms(2, "Red", 668, 10),
    ms(3, "Red edge", 717, 10),
    ms(4, "NIR", 840, 40),
];

/// Known MicaSense models.
pub static CAMERA_SPECS: [CameraSpecs; 6] = [
    CameraSpecs {
        model: "ALTUM-PT",
        description: "Multispectral + Thermal + Panchromatic sensor",
        bands: &ALTUM_PT_BANDS,
        resolution_ms: (2064, 1544),
        resolution_pan: Some((4112, 3008)),
        resolution_thermal: Some((320, 256)),
        dls_version: "DLS2",
        has_panchromatic: true,
        has_thermal: true,
        is_dual: false,
    },
    CameraSpecs {
        model: "ALTUM",
        description: "Multispectral + Thermal sensor",
        bands: &ALTUM_BANDS,
        resolution_ms: (2064, 1544),
        resolution_pan: None,
        resolution_thermal: Some((160, 120)),
        dls_version: "DLS2",
        has_panchromatic: false,
        has_thermal: true,
        is_dual: false,
    },
    CameraSpecs {
        model: "REDEDGE-P",
        description: "Multispectral + Panchromatic sensor",
        bands: &REDEDGE_P_BANDS,
        resolution_ms: (2064, 1544),
        resolution_pan: Some((4112, 3008)),
        resolution_thermal: None,
        dls_version: "DLS2",
        has_panchromatic: true,
        has_thermal: false,
        is_dual: false,
    },
    CameraSpecs {
        model: "REDEDGE-MX",
        description: "5-band multispectral sensor",
        bands: &FIVE_BAND,
        resolution_ms: (1280, 960),
        resolution_pan: None,
        resolution_thermal: None,
        dls_version: "DLS2",
        has_panchromatic: false,
        has_thermal: false,
        is_dual: false,
    },
    CameraSpecs {
        model: "REDEDGE-MX-DUAL",
        description: "10-band dual multispectral sensor",
        bands: &REDEDGE_MX_DUAL_BANDS,
        resolution_ms: (1280, 960),
        resolution_pan: None,
        resolution_thermal: None,
        dls_version: "DLS2",
        has_panchromatic: false,
        has_thermal: false,
        is_dual: true,
    },
    CameraSpecs {
        model: "REDEDGE-M",
        description: "5-band multispectral sensor (legacy)",
        bands: &REDEDGE_M_BANDS,
        resolution_ms: (1280, 960),
        resolution_pan: None,
        resolution_thermal: None,
        dls_version: "DLS1",
        has_panchromatic: false,
        has_thermal: false,
        is_dual: false,
    },
];

/// Specs for a camera model string as written by the camera
/// ("Altum-PT", "RedEdge MX", "rededge_p").
pub fn camera_specs(model: &str) -> Option<&'static CameraSpecs> {
    let normalized = model.trim().to_uppercase().replace([' ', '_'], "-");
    let key = if normalized.contains("ALTUM") && normalized.contains("PT") {
        "ALTUM-PT"
    } else if normalized.contains("ALTUM") {
        "ALTUM"
    } else if !normalized.contains("REDEDGE") {
        return None;
    } else if normalized.contains('P') && !normalized.contains("MX") {
        "REDEDGE-P"
    } else if normalized.contains("DUAL") {
        "REDEDGE-MX-DUAL"
    } else if normalized.contains("MX") {
        "REDEDGE-MX"
    } else if normalized.contains('M') {
        "REDEDGE-M"
    } else {
        return None;
    };
    CAMERA_SPECS.iter().find(|spec| spec.model == key)
}

fn display_value(value: &MetadataValue) -> String {
    match value {
        MetadataValue::List(items) if items.len() > 5 => {
            format!("[{}, {}, ... ({} items)]", items[0], items[1], items.len())
        }
        MetadataValue::Text(text) if text.chars().count() > 80 => {
            let head: String = text.chars().take(77).collect();
            format!("{}...", head)
        }
        other => other.to_string(),
    }
}

/// Text listing of every non-empty group with interpretations, followed
/// by the camera specs when the model is a known MicaSense camera.
pub fn render_interpreted(groups: &MetadataGroups) -> String {
    let mut out = String::new();
    for group in MetadataGroup::ALL {
        let entries = groups.group(group);
        if entries.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, " {}", group.as_str().to_uppercase().replace('_', " "));
        let _ = writeln!(out, "{}", "=".repeat(60));
        for (key, value) in entries {
            let _ = writeln!(out, "  {}: {}", key, display_value(value));
            if let Some(meaning) = interpretation(group, key) {
                let _ = writeln!(out, "    → {}", meaning);
            }
        }
    }

    let specs = groups
        .text(MetadataGroup::TiffStructure, "Model")
        .and_then(|model| camera_specs(&model));
    if let Some(specs) = specs {
        let _ = writeln!(out, "{}", "=".repeat(60));
        let _ = writeln!(out, " CAMERA {}: {}", specs.model, specs.description);
        let _ = writeln!(out, "{}", "=".repeat(60));
        for band in specs.bands {
            match (band.wavelength_nm, band.bandwidth_nm, band.range) {
                (Some(center), Some(width), _) => {
                    let _ = writeln!(out, "  [{}] {}: {} nm (FWHM {} nm)", band.index, band.name, center, width);
                }
                (_, _, Some(range)) => {
                    let _ = writeln!(out, "  [{}] {}: {}", band.index, band.name, range);
                }
                _ => {
                    let _ = writeln!(out, "  [{}] {}", band.index, band.name);
                }
            }
        }
    }
    out
}
