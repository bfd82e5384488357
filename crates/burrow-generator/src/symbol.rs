use crate::alphabet::Alphabet;
use crate::error::{GeneratorError, Result};

/// Consecutive rejected bytes after which a uniform draw gives up.
///
/// With at most 256 symbols fewer than half of all bytes are rejected, so a
/// healthy source never gets near this.
const MAX_REJECTIONS: usize = 128;

/// A source of cryptographically strong random bytes.
pub trait ByteSource: Send + Sync + 'static {
    fn next_byte(&self) -> Result<u8>;
}

/// Bytes from the operating system's secure random generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsByteSource;

impl ByteSource for OsByteSource {
    fn next_byte(&self) -> Result<u8> {
        let mut buf = [0u8; 1];
        getrandom::fill(&mut buf).map_err(|e| GeneratorError::Entropy(e.to_string()))?;
        Ok(buf[0])
    }
}

/// Produces one symbol of an alphabet per call.
pub trait SymbolSource: Send + Sync + 'static {
    fn next_symbol(&self, alphabet: &Alphabet) -> Result<u8>;
}

/// How a random byte is turned into an alphabet position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SymbolMapping {
    /// `floor(b / 255 * (L - 1))`.
    ///
    /// Reproduces the positions of previously issued codes, including their
    /// bias: bucket widths differ whenever 256 is not a multiple of `L`, and
    /// the last position is only reached by `b == 255`.
    Legacy,
    /// Rejection sampling: bytes at or above the largest multiple of `L` are
    /// redrawn, the rest map to `b mod L`. Every position is equally likely.
    #[default]
    Uniform,
}

impl SymbolMapping {
    /// Maps `byte` to a position in an alphabet of `len` symbols.
    ///
    /// Returns `None` when the byte must be rejected and redrawn.
    pub fn index(self, byte: u8, len: usize) -> Option<usize> {
        debug_assert!((1..=256).contains(&len));
        match self {
            SymbolMapping::Legacy => {
                let x = f64::from(byte) / 255.0;
                Some((x * (len - 1) as f64).floor() as usize)
            }
            SymbolMapping::Uniform => {
                let limit = 256 - (256 % len);
                let byte = usize::from(byte);
                (byte < limit).then_some(byte % len)
            }
        }
    }
}

/// The production [`SymbolSource`]: random bytes mapped onto the alphabet.
#[derive(Debug, Clone, Default)]
pub struct RandomSymbolSource<B: ByteSource = OsByteSource> {
    mapping: SymbolMapping,
    bytes: B,
}

impl RandomSymbolSource<OsByteSource> {
    /// Creates a source backed by the operating system's random generator.
    pub fn new(mapping: SymbolMapping) -> Self {
        Self::with_bytes(mapping, OsByteSource)
    }
}

impl<B: ByteSource> RandomSymbolSource<B> {
    pub fn with_bytes(mapping: SymbolMapping, bytes: B) -> Self {
        Self { mapping, bytes }
    }

    pub fn mapping(&self) -> SymbolMapping {
        self.mapping
    }
}

impl<B: ByteSource> SymbolSource for RandomSymbolSource<B> {
    fn next_symbol(&self, alphabet: &Alphabet) -> Result<u8> {
        for _ in 0..MAX_REJECTIONS {
            let byte = self.bytes.next_byte()?;
            if let Some(symbol) = self
                .mapping
                .index(byte, alphabet.len())
                .and_then(|index| alphabet.symbol(index))
            {
                return Ok(symbol);
            }
        }

        Err(GeneratorError::Entropy(format!(
            "{} consecutive bytes rejected",
            MAX_REJECTIONS
        )))
    }
}
