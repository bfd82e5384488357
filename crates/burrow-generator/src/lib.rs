//! Random short code synthesis.
//!
//! A [`TokenSynthesizer`] composes fixed-length codes from independent draws
//! of a [`SymbolSource`]. Generators never talk to storage; checking a
//! candidate against the store is the allocator's job.

pub mod alphabet;
pub mod error;
pub mod symbol;
pub mod synthesizer;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use error::{GeneratorError, Result};
pub use symbol::{ByteSource, OsByteSource, RandomSymbolSource, SymbolMapping, SymbolSource};
pub use synthesizer::{SynthesizerSettings, TokenSynthesizer};

use burrow_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations are pure generators that don't interact with storage, so
/// the codes they produce may already be taken.
pub trait Generator: Send + Sync + 'static {
    /// Generates one candidate code.
    fn generate(&self) -> Result<ShortCode>;
}
