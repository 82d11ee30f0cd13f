//! The translation pipeline: text records to commands to words to a byte sink.

use std::io::{self, Write};

use tracing::info;

use crate::bytecode::{encode_all, records, to_byte_stream, write_words, Command, EncodedWord, Parser};
use crate::config::AssemblerConfig;
use crate::error::{AssemblyError, DiagnosticSink, LogSink};

/// Everything produced by one translation run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Translation {
  pub commands: Vec<Command>,
  /// `words[i]` is the encoding of `commands[i]`.
  pub words: Vec<EncodedWord>,
  /// Records skipped in lenient mode. Always empty in fail-fast mode.
  pub errors: Vec<AssemblyError>,
}

impl Translation {
  pub fn len(&self) -> usize {
    self.commands.len()
  }

  pub fn is_empty(&self) -> bool {
    self.commands.is_empty()
  }

  /// Pairs each command with its word, in source order.
  pub fn iter(&self) -> impl Iterator<Item = (&Command, &EncodedWord)> {
    self.commands.iter().zip(self.words.iter())
  }

  pub fn byte_stream(&self) -> Vec<u8> {
    to_byte_stream(&self.words)
  }

  pub fn write_to<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
    write_words(&self.words, sink)
  }
}

/// Parser and encoder bound to one configuration.
#[derive(Copy, Clone, Debug, Default)]
pub struct Assembler {
  parser: Parser,
}

impl Assembler {
  pub fn new(config: AssemblerConfig) -> Assembler {
    Assembler { parser: Parser::new(config) }
  }

  pub fn config(&self) -> &AssemblerConfig {
    self.parser.config()
  }

  /// Translates `text`, sending lenient-mode diagnostics to the log.
  pub fn translate(&self, text: &str) -> Result<Translation, AssemblyError> {
    self.translate_with(text, &mut LogSink)
  }

  pub fn translate_with<S>(&self, text: &str, sink: &mut S) -> Result<Translation, AssemblyError>
    where S: DiagnosticSink + ?Sized
  {
    let outcome = self.parser.parse(records(text), sink)?;
    let words = encode_all(&outcome.commands);
    info!(commands = outcome.commands.len(), skipped = outcome.errors.len(), "translated program");
    Ok(Translation { commands: outcome.commands, words, errors: outcome.errors })
  }
}

/// Translates `text` with the default configuration and returns the byte stream.
pub fn assemble(text: &str) -> Result<Vec<u8>, AssemblyError> {
  Assembler::default().translate(text).map(|translation| translation.byte_stream())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::Instruction;
  use crate::error::{Diagnostic, ErrorKind};

  #[test]
  fn literal_programs() {
    assert_eq!(assemble("LOAD_CONST,129").unwrap(), vec![0x0D, 0x04, 0x00, 0x00]);
    assert_eq!(assemble("ABS,137").unwrap(), vec![0x4A, 0x04, 0x00, 0x00]);
    assert_eq!(assemble("READ_MEM").unwrap(), vec![0x04, 0x00, 0x00, 0x00]);
    assert_eq!(assemble("WRITE_MEM").unwrap(), vec![0x07, 0x00, 0x00, 0x00]);
  }

  #[test]
  fn wide_and_negative_constants() {
    assert_eq!(assemble("LOAD_CONST,67108864").unwrap(), vec![0x05, 0x00, 0x00, 0x20]);
    assert_eq!(assemble("LOAD_CONST,-1").unwrap(), vec![0xFD, 0xFF, 0xFF, 0xFF]);

    let strict = Assembler::new(AssemblerConfig::new().reject_wide_constants());
    assert!(strict.translate("LOAD_CONST,67108864").is_err());
    assert!(strict.translate("LOAD_CONST,-1").is_err());
  }

  #[test]
  fn comments_contribute_nothing() {
    assert_eq!(assemble("#comment").unwrap(), Vec::<u8>::new());
    assert_eq!(assemble("").unwrap(), Vec::<u8>::new());
    assert_eq!(assemble("#comment\n\nREAD_MEM\n# trailing").unwrap(), vec![0x04, 0, 0, 0]);

    let translation = Assembler::default().translate("# nothing\n\n").unwrap();
    assert!(translation.is_empty());
    assert!(!Assembler::default().translate("READ_MEM").unwrap().is_empty());
  }

  #[test]
  fn fail_fast_produces_nothing() {
    let error = assemble("LOAD_CONST,129\nREAD_MEM\nBOGUS\nWRITE_MEM").unwrap_err();
    assert_eq!(error.line, 3);
    assert_eq!(error.kind, ErrorKind::UnknownMnemonic("BOGUS".to_string()));
  }

  #[test]
  fn lenient_translation_keeps_valid_words() {
    let assembler = Assembler::new(AssemblerConfig::new().lenient());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let translation = assembler
      .translate_with("LOAD_CONST,129\nREAD_MEM\nBOGUS\nWRITE_MEM", &mut diagnostics)
      .unwrap();

    assert_eq!(translation.len(), 3);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 3);
    assert_eq!(
      translation.byte_stream(),
      vec![
        0x0D, 0x04, 0x00, 0x00,
        0x04, 0x00, 0x00, 0x00,
        0x07, 0x00, 0x00, 0x00
      ]
    );
  }

  #[test]
  fn words_line_up_with_commands() {
    let translation = Assembler::default().translate("ABS,137\n\nLOAD_CONST,1").unwrap();
    let pairs: Vec<(Instruction, u32)> =
      translation.iter().map(|(c, w)| (c.instruction, w.value)).collect();
    assert_eq!(pairs, vec![(Instruction::Abs(137), 1098), (Instruction::LoadConst(1), 13)]);
    assert_eq!(translation.commands[1].line, 3);

    let mut sink = Vec::new();
    translation.write_to(&mut sink).unwrap();
    assert_eq!(sink.len(), 8);
    assert_eq!(sink, translation.byte_stream());
  }
}
