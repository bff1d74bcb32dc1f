//! Tile layer payload decoding.
//!
//! A payload is optionally base64 encoded, optionally zlib/gzip compressed,
//! and once unpacked is a flat run of little-endian `u32` GIDs in row-major
//! order. The codec does not know the layer size; it emits one cell per
//! four bytes.

use crate::error::MapError;
use crate::tile::TileCell;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::read::{GzDecoder, ZlibDecoder};
use std::borrow::Cow;
use std::io::Read;
use std::str::FromStr;

/// Text encoding of a tile payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// The payload bytes are used as they are.
    #[default]
    Raw,
    /// Standard base64 with padding.
    Base64,
}

impl FromStr for Encoding {
    type Err = MapError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "" => Ok(Encoding::Raw),
            "base64" => Ok(Encoding::Base64),
            other => Err(MapError::UnsupportedEncoding(other.to_owned())),
        }
    }
}

/// Compression applied to a tile payload after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Zlib,
    Gzip,
}

impl Compression {
    /// The tag used for this compression in map files.
    pub fn tag(self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Zlib => "zlib",
            Compression::Gzip => "gzip",
        }
    }
}

impl FromStr for Compression {
    type Err = MapError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "" => Ok(Compression::None),
            "zlib" => Ok(Compression::Zlib),
            "gzip" => Ok(Compression::Gzip),
            other => Err(MapError::UnsupportedCompression(other.to_owned())),
        }
    }
}

/// Decodes a tile layer payload into cells.
///
/// Surrounding whitespace is trimmed first since map editors indent the
/// payload text. An empty payload yields no cells.
pub fn decode_tile_data(
    payload: &[u8],
    encoding: Encoding,
    compression: Compression,
) -> Result<Vec<TileCell>, MapError> {
    let trimmed = payload.trim_ascii();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let decoded: Cow<'_, [u8]> = match encoding {
        Encoding::Raw => Cow::Borrowed(trimmed),
        Encoding::Base64 => Cow::Owned(STANDARD.decode(trimmed)?),
    };
    let bytes = decompress(&decoded, compression)?;
    cells_from_bytes(&bytes)
}

fn decompress(data: &[u8], compression: Compression) -> Result<Cow<'_, [u8]>, MapError> {
    let mut out = Vec::new();
    let inflated = match compression {
        Compression::None => return Ok(Cow::Borrowed(data)),
        Compression::Zlib => ZlibDecoder::new(data).read_to_end(&mut out),
        Compression::Gzip => GzDecoder::new(data).read_to_end(&mut out),
    };
    inflated.map_err(|source| MapError::Decompress {
        compression: compression.tag(),
        source,
    })?;
    Ok(Cow::Owned(out))
}

/// Splits an unpacked payload into cells, four little-endian bytes each.
pub fn cells_from_bytes(bytes: &[u8]) -> Result<Vec<TileCell>, MapError> {
    if bytes.len() % 4 != 0 {
        return Err(MapError::CorruptTileStream { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| TileCell::from_raw(u32::from_le_bytes([c[0], c[1], c[2], c[3]])))
        .collect())
}

/// Packs cells back into the unpacked payload form, flags in the high bits.
pub fn cells_to_bytes(cells: &[TileCell]) -> Vec<u8> {
    cells
        .iter()
        .flat_map(|cell| cell.to_raw().to_le_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{FLIP_H, FLIP_V};
    use flate2::write::{GzEncoder, ZlibEncoder};
    use std::io::Write;

    fn raw_payload(gids: &[u32]) -> Vec<u8> {
        gids.iter().flat_map(|g| g.to_le_bytes()).collect()
    }

    fn zlib(bytes: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(bytes).expect("zlib write");
        enc.finish().expect("zlib finish")
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(bytes).expect("gzip write");
        enc.finish().expect("gzip finish")
    }

    #[test]
    fn decodes_indented_base64_zlib() {
        let bytes = raw_payload(&[1, 0, FLIP_H | 3, 2]);
        let text = format!("\n   {}\n  ", STANDARD.encode(zlib(&bytes)));

        let cells = decode_tile_data(text.as_bytes(), Encoding::Base64, Compression::Zlib)
            .expect("decode");

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].gid, 1);
        assert!(cells[1].is_empty());
        assert_eq!(cells[2].gid, 3);
        assert!(cells[2].orientation.horizontal);
        assert_eq!(cells[3].gid, 2);
    }

    #[test]
    fn zlib_and_gzip_agree() {
        let bytes = raw_payload(&[5, FLIP_V | 6, 0, 7, 8, 9]);
        let from_zlib = decode_tile_data(&zlib(&bytes), Encoding::Raw, Compression::Zlib)
            .expect("zlib decode");
        let from_gzip = decode_tile_data(&gzip(&bytes), Encoding::Raw, Compression::Gzip)
            .expect("gzip decode");
        assert_eq!(from_zlib, from_gzip);
        assert_eq!(from_zlib.len(), 6);
    }

    #[test]
    fn empty_payload_is_not_an_error() {
        let cells = decode_tile_data(b"  \n ", Encoding::Base64, Compression::Gzip)
            .expect("empty payload");
        assert!(cells.is_empty());
    }

    #[test]
    fn rejects_unaligned_stream() {
        let text = STANDARD.encode([1u8, 0, 0, 0, 2, 0]);
        let err = decode_tile_data(text.as_bytes(), Encoding::Base64, Compression::None)
            .expect_err("6 bytes");
        assert!(matches!(err, MapError::CorruptTileStream { len: 6 }));
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(matches!(
            "lzma".parse::<Compression>(),
            Err(MapError::UnsupportedCompression(tag)) if tag == "lzma"
        ));
        assert!(matches!(
            "csv".parse::<Encoding>(),
            Err(MapError::UnsupportedEncoding(tag)) if tag == "csv"
        ));
    }

    #[test]
    fn rejects_bad_base64() {
        let err = decode_tile_data(b"not*base64", Encoding::Base64, Compression::None)
            .expect_err("bad base64");
        assert!(matches!(err, MapError::Base64(_)));
    }

    #[test]
    fn rejects_garbage_compressed_data() {
        let err = decode_tile_data(b"definitely not zlib", Encoding::Raw, Compression::Zlib)
            .expect_err("bad zlib");
        assert!(matches!(err, MapError::Decompress { compression: "zlib", .. }));
    }
}
