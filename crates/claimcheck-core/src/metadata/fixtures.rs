//! In-memory little-endian TIFF files for tests.

const ASCII: u16 = 2;
const BYTE: u16 = 1;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

const EXIF_POINTER: u16 = 34665;
const GPS_POINTER: u16 = 34853;

pub(crate) const DRONE_XMP: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
 <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Description rdf:about=""
    xmlns:Camera="http://pix4d.com/camera/1.0/"
    xmlns:DLS="http://micasense.com/DLS/1.0/"
    xmlns:MicaSense="http://micasense.com/MicaSense/1.0/">
   <Camera:BandName>Blue</Camera:BandName>
   <Camera:CentralWavelength>475</Camera:CentralWavelength>
   <DLS:SolarElevation>0.72</DLS:SolarElevation>
   <MicaSense:CaptureId>abc123</MicaSense:CaptureId>
  </rdf:Description>
 </rdf:RDF>
</x:xmpmeta>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dir {
    Ifd0,
    Exif,
    Gps,
}

#[derive(Debug, Clone)]
struct Entry {
    tag: u16,
    typ: u16,
    count: u32,
    data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TiffFixture {
    ifd0: Vec<Entry>,
    exif: Vec<Entry>,
    gps: Vec<Entry>,
}

impl TiffFixture {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A multispectral drone capture with camera, date, GPS and XMP data.
    pub(crate) fn drone_photo() -> Self {
        Self::new()
            .long(Dir::Ifd0, 256, 4000)
            .long(Dir::Ifd0, 257, 3000)
            .ascii(Dir::Ifd0, 271, "MicaSense")
            .ascii(Dir::Ifd0, 272, "Altum")
            .ascii(Dir::Ifd0, 305, "v1.3.0")
            .ascii(Dir::Ifd0, 306, "2023:05:01 10:00:00")
            .bytes(Dir::Ifd0, 700, DRONE_XMP.as_bytes())
            .ascii(Dir::Ifd0, 48021, "ALT-1234")
            .bytes(Dir::Ifd0, 50706, &[1, 4, 0, 0])
            .ascii(Dir::Exif, 36867, "2023:05:01 10:00:00")
            .ascii(Dir::Exif, 42036, "Altum lens")
            .bytes(Dir::Gps, 0, &[2, 2, 0, 0])
            .ascii(Dir::Gps, 1, "N")
            .rationals(Dir::Gps, 2, &[(49, 1), (7, 1), (2412, 100)])
            .ascii(Dir::Gps, 3, "E")
            .rationals(Dir::Gps, 4, &[(32, 1), (0, 1), (0, 1)])
    }

    fn set(mut self, dir: Dir, entry: Entry) -> Self {
        let entries = match dir {
            Dir::Ifd0 => &mut self.ifd0,
            Dir::Exif => &mut self.exif,
            Dir::Gps => &mut self.gps,
        };
        entries.retain(|e| e.tag != entry.tag);
        entries.push(entry);
        self
    }

    /// Drop a tag from a directory.
    pub(crate) fn without(mut self, dir: Dir, tag: u16) -> Self {
        let entries = match dir {
            Dir::Ifd0 => &mut self.ifd0,
            Dir::Exif => &mut self.exif,
            Dir::Gps => &mut self.gps,
        };
        entries.retain(|e| e.tag != tag);
        self
    }

    pub(crate) fn ascii(self, dir: Dir, tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        let count = data.len() as u32;
        self.set(dir, Entry { tag, typ: ASCII, count, data })
    }

    pub(crate) fn bytes(self, dir: Dir, tag: u16, bytes: &[u8]) -> Self {
        let count = bytes.len() as u32;
        self.set(dir, Entry { tag, typ: BYTE, count, data: bytes.to_vec() })
    }

    #[allow(dead_code)]
    pub(crate) fn short(self, dir: Dir, tag: u16, value: u16) -> Self {
        let data = value.to_le_bytes().to_vec();
        self.set(dir, Entry { tag, typ: SHORT, count: 1, data })
    }

    pub(crate) fn long(self, dir: Dir, tag: u16, value: u32) -> Self {
        let data = value.to_le_bytes().to_vec();
        self.set(dir, Entry { tag, typ: LONG, count: 1, data })
    }

    pub(crate) fn rationals(self, dir: Dir, tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for (num, denom) in values {
            data.extend_from_slice(&num.to_le_bytes());
            data.extend_from_slice(&denom.to_le_bytes());
        }
        let count = values.len() as u32;
        self.set(dir, Entry { tag, typ: RATIONAL, count, data })
    }

    /// Serialize as `II*\0` TIFF: IFD0, then the EXIF and GPS directories.
    pub(crate) fn build(&self) -> Vec<u8> {
        let mut ifd0 = self.ifd0.clone();
        if !self.exif.is_empty() {
            ifd0.push(pointer(EXIF_POINTER, 0));
        }
        if !self.gps.is_empty() {
            ifd0.push(pointer(GPS_POINTER, 0));
        }

        let ifd0_offset = 8u32;
        let exif_offset = ifd0_offset + ifd_len(&ifd0);
        let gps_offset = exif_offset + if self.exif.is_empty() { 0 } else { ifd_len(&self.exif) };

        for entry in ifd0.iter_mut() {
            if entry.tag == EXIF_POINTER {
                entry.data = exif_offset.to_le_bytes().to_vec();
            } else if entry.tag == GPS_POINTER {
                entry.data = gps_offset.to_le_bytes().to_vec();
            }
        }

        let mut out = b"II*\0".to_vec();
        out.extend_from_slice(&ifd0_offset.to_le_bytes());
        out.extend(encode_ifd(&ifd0, ifd0_offset));
        if !self.exif.is_empty() {
            out.extend(encode_ifd(&self.exif, exif_offset));
        }
        if !self.gps.is_empty() {
            out.extend(encode_ifd(&self.gps, gps_offset));
        }
        out
    }
}

fn pointer(tag: u16, offset: u32) -> Entry {
    Entry {
        tag,
        typ: LONG,
        count: 1,
        data: offset.to_le_bytes().to_vec(),
    }
}

fn padded(len: usize) -> u32 {
    (len + len % 2) as u32
}

fn ifd_len(entries: &[Entry]) -> u32 {
    let head = 2 + 12 * entries.len() as u32 + 4;
    let data: u32 = entries
        .iter()
        .filter(|e| e.data.len() > 4)
        .map(|e| padded(e.data.len()))
        .sum();
    head + data
}

fn encode_ifd(entries: &[Entry], offset: u32) -> Vec<u8> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|e| e.tag);

    let data_start = offset + 2 + 12 * sorted.len() as u32 + 4;
    let mut head = Vec::new();
    let mut data = Vec::new();

    head.extend_from_slice(&(sorted.len() as u16).to_le_bytes());
    for entry in &sorted {
        head.extend_from_slice(&entry.tag.to_le_bytes());
        head.extend_from_slice(&entry.typ.to_le_bytes());
        head.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            head.extend_from_slice(&inline);
        } else {
            let at = data_start + data.len() as u32;
            head.extend_from_slice(&at.to_le_bytes());
            data.extend_from_slice(&entry.data);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    // no next IFD
    head.extend_from_slice(&0u32.to_le_bytes());
    head.extend(data);
    head
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_lengths_agree() {
        let fixture = TiffFixture::drone_photo();
        let bytes = fixture.build();
        assert_eq!(&bytes[0..4], b"II*\0");

        let mut ifd0 = fixture.ifd0.clone();
        ifd0.push(pointer(EXIF_POINTER, 0));
        ifd0.push(pointer(GPS_POINTER, 0));
        let expected = 8 + ifd_len(&ifd0) + ifd_len(&fixture.exif) + ifd_len(&fixture.gps);
        assert_eq!(bytes.len() as u32, expected);
    }
}
