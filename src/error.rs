use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while loading, validating or rendering a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// A map or tileset file could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A map or tileset file is not valid Tiled JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying parser failure.
        source: serde_json::Error,
    },

    /// The map is structurally unusable.
    #[error("invalid map: {0}")]
    InvalidMap(String),

    /// Tile data uses an encoding other than raw bytes or base64.
    #[error("unsupported tile data encoding '{0}'")]
    UnsupportedEncoding(String),

    /// Tile data uses a compression other than zlib or gzip.
    #[error("unsupported tile data compression '{0}', only zlib and gzip are supported")]
    UnsupportedCompression(String),

    /// The base64 tile payload is malformed.
    #[error("invalid base64 tile data: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The compressed tile payload could not be inflated.
    #[error("failed to decompress {compression} tile data: {source}")]
    Decompress {
        /// Compression tag of the payload.
        compression: &'static str,
        /// Underlying decoder failure.
        source: io::Error,
    },

    /// The decoded tile payload is not a whole number of 32-bit identifiers.
    #[error("corrupt tile stream: {len} bytes is not a multiple of 4")]
    CorruptTileStream {
        /// Decoded payload length in bytes.
        len: usize,
    },

    /// No tileset owns the given identifier.
    #[error("invalid GID {gid}: no tileset owns it")]
    GidOutOfRange {
        /// The offending identifier, flags removed.
        gid: u32,
    },

    /// A tile layer's cell count does not match its declared size.
    #[error("layer '{layer}' has {actual} cells, expected {expected}")]
    InvalidLayerSize {
        /// Layer name.
        layer: String,
        /// `width * height` of the layer.
        expected: usize,
        /// Number of decoded cells.
        actual: usize,
    },

    /// A tileset image could not be opened or decoded.
    #[error("failed to load tileset image {}: {source}", path.display())]
    Resource {
        /// Image path as handed to the resource locator.
        path: PathBuf,
        /// Underlying decoder failure.
        source: image::ImageError,
    },

    /// A canvas was asked to draw from an image it never received.
    #[error("no pixel data registered for {}", path.display())]
    ResourceMissing {
        /// Image key the canvas was asked for.
        path: PathBuf,
    },
}
