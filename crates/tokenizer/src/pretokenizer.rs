use crate::config::Algorithm;
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::decoders::DecoderWrapper;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::pre_tokenizers::metaspace::Metaspace;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::pre_tokenizers::PreTokenizerWrapper;

/// Canonical pre-tokenizer for each algorithm.
pub fn build_pre_tokenizer(algorithm: Algorithm) -> PreTokenizerWrapper {
    match algorithm {
        Algorithm::Bpe => ByteLevel::new(false, true, true).into(),
        Algorithm::Wordpiece => Whitespace {}.into(),
        Algorithm::Unigram => Metaspace::default().into(),
    }
}

/// Decoder matching [`build_pre_tokenizer`]. The byte-level and metaspace
/// pre-tokenizers double as their own decoders.
pub fn build_decoder(algorithm: Algorithm) -> DecoderWrapper {
    match algorithm {
        Algorithm::Bpe => ByteLevel::new(false, true, true).into(),
        Algorithm::Wordpiece => WordPieceDecoder::default().into(),
        Algorithm::Unigram => Metaspace::default().into(),
    }
}
