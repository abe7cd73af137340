use std::fmt;
use zip::CompressionMethod;

/// Compression applied to a single package member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Bytes are written as-is
    Store,
    /// Bytes are deflated
    Deflate,
}

impl Compression {
    /// Pick the method for a member name.
    ///
    /// `mimetype` must be the uncompressed type marker and PNG previews are
    /// read directly by viewers, so both are stored. Everything else is deflated.
    pub fn for_member(name: &str) -> Self {
        if name == "mimetype" || name.ends_with(".png") {
            Compression::Store
        } else {
            Compression::Deflate
        }
    }

    pub fn method(&self) -> CompressionMethod {
        match self {
            Compression::Store => CompressionMethod::Stored,
            Compression::Deflate => CompressionMethod::Deflated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Store => "stored",
            Compression::Deflate => "deflated",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
