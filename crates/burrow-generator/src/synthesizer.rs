use crate::alphabet::Alphabet;
use crate::error::{GeneratorError, Result};
use crate::symbol::{OsByteSource, RandomSymbolSource, SymbolMapping, SymbolSource};
use crate::Generator;
use burrow_core::shortcode::MAX_LENGTH;
use burrow_core::ShortCode;
use typed_builder::TypedBuilder;

/// Configures a [`TokenSynthesizer`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct SynthesizerSettings {
    /// Number of symbols per code.
    #[builder(default = 6)]
    pub length: usize,
    #[builder(default)]
    pub alphabet: Alphabet,
    /// Byte-to-symbol mapping used by [`TokenSynthesizer::new`].
    #[builder(default)]
    pub mapping: SymbolMapping,
}

/// Composes fixed-length codes from independent symbol draws.
#[derive(Debug)]
pub struct TokenSynthesizer<S: SymbolSource = RandomSymbolSource<OsByteSource>> {
    length: usize,
    alphabet: Alphabet,
    source: S,
}

impl TokenSynthesizer<RandomSymbolSource<OsByteSource>> {
    /// Creates a synthesizer drawing from the operating system's random
    /// generator with the configured mapping.
    pub fn new(settings: SynthesizerSettings) -> Result<Self> {
        let source = RandomSymbolSource::new(settings.mapping);
        Self::with_source(settings, source)
    }
}

impl<S: SymbolSource> TokenSynthesizer<S> {
    /// Creates a synthesizer around a custom symbol source.
    ///
    /// `settings.mapping` is ignored; the source decides how it picks symbols.
    pub fn with_source(settings: SynthesizerSettings, source: S) -> Result<Self> {
        if settings.length > MAX_LENGTH {
            return Err(GeneratorError::InvalidLength {
                length: settings.length,
                max_length: MAX_LENGTH,
            });
        }

        Ok(Self {
            length: settings.length,
            alphabet: settings.alphabet,
            source,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Draws `length` symbols and returns them as a code.
    ///
    /// A zero length yields the empty code without drawing any randomness.
    /// Any failed draw aborts the whole token.
    pub fn synthesize(&self) -> Result<ShortCode> {
        let mut token = String::with_capacity(self.length);
        for _ in 0..self.length {
            let symbol = self.source.next_symbol(&self.alphabet)?;
            token.push(char::from(symbol));
        }
        Ok(ShortCode::new_unchecked(token))
    }
}

impl<S: SymbolSource> Generator for TokenSynthesizer<S> {
    fn generate(&self) -> Result<ShortCode> {
        self.synthesize()
    }
}
