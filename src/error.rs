//! Error conditions produced while translating a program.
//!
//! Source errors (`AssemblyError`) carry the line number and the offending text so the
//! caller can render a one-line diagnostic. `InternalInvariantViolation` marks a broken
//! contract between the parser and the encoder and is never recovered from.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::bytecode::Operand;

/// Why an operand field could not be used.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OperandFault {
  /// The field is absent or empty.
  Missing,
  /// The field is not a decimal integer that fits in an `Operand`.
  NotAnInteger(String),
  /// The constant does not fit its field and the configuration rejects wide constants.
  OutOfRange(Operand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  MalformedOperand(OperandFault),
  UnknownMnemonic(String),
}

impl ErrorKind {
  /// Short stable name of the error class.
  pub fn name(&self) -> &'static str {
    match self {
      ErrorKind::MalformedOperand(_) => "MalformedOperand",
      ErrorKind::UnknownMnemonic(_) => "UnknownMnemonic",
    }
  }
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ErrorKind::MalformedOperand(OperandFault::Missing) => {
        write!(f, "missing operand")
      }
      ErrorKind::MalformedOperand(OperandFault::NotAnInteger(text)) => {
        write!(f, "operand '{}' is not an integer", text)
      }
      ErrorKind::MalformedOperand(OperandFault::OutOfRange(value)) => {
        write!(f, "constant {} does not fit in 26 bits", value)
      }
      ErrorKind::UnknownMnemonic(name) => {
        write!(f, "unknown mnemonic '{}'", name)
      }
    }
  }
}

/// A malformed source record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssemblyError {
  /// 1-based source line.
  pub line: usize,
  /// The offending record, as written.
  pub content: String,
  pub kind: ErrorKind,
}

impl AssemblyError {
  pub fn new(line: usize, content: &str, kind: ErrorKind) -> AssemblyError {
    AssemblyError { line, content: content.to_string(), kind }
  }

  pub fn to_diagnostic(&self) -> Diagnostic {
    Diagnostic {
      line: self.line,
      kind: self.kind.name(),
      message: format!("{} in {:?}", self.kind, self.content),
    }
  }
}

impl Display for AssemblyError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "line {}: {} in {:?}", self.line, self.kind, self.content)
  }
}

impl Error for AssemblyError {}

/// An opcode outside the operation table reached the encoder or decoder.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InternalInvariantViolation {
  pub opcode: u8,
}

impl Display for InternalInvariantViolation {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "internal invariant violated: no instruction form for opcode {}", self.opcode)
  }
}

impl Error for InternalInvariantViolation {}

/// A byte stream whose length is not a whole number of words.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TrailingBytes {
  pub len: usize,
}

impl Display for TrailingBytes {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} bytes is not a whole number of 4 byte words", self.len)
  }
}

impl Error for TrailingBytes {}

/// Structured report handed to a `DiagnosticSink`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
  pub line: usize,
  pub kind: &'static str,
  pub message: String,
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "line {}: [{}] {}", self.line, self.kind, self.message)
  }
}

/// Consumer of diagnostics for malformed records skipped in lenient mode.
pub trait DiagnosticSink {
  fn report(&mut self, diagnostic: &Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
  fn report(&mut self, diagnostic: &Diagnostic) {
    self.push(diagnostic.clone());
  }
}

/// Forwards diagnostics to the `tracing` subscriber.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
  fn report(&mut self, diagnostic: &Diagnostic) {
    tracing::warn!(line = diagnostic.line, kind = diagnostic.kind, "{}", diagnostic.message);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn one_line_rendering() {
    let error = AssemblyError::new(3, "BOGUS", ErrorKind::UnknownMnemonic("BOGUS".to_string()));
    assert_eq!(error.to_string(), "line 3: unknown mnemonic 'BOGUS' in \"BOGUS\"");

    let error = AssemblyError::new(
      7,
      "ABS,x",
      ErrorKind::MalformedOperand(OperandFault::NotAnInteger("x".to_string()))
    );
    assert_eq!(error.to_string(), "line 7: operand 'x' is not an integer in \"ABS,x\"");
  }

  #[test]
  fn diagnostic_carries_line_and_kind() {
    let error = AssemblyError::new(2, "LOAD_CONST", ErrorKind::MalformedOperand(OperandFault::Missing));
    let diagnostic = error.to_diagnostic();
    assert_eq!(diagnostic.line, 2);
    assert_eq!(diagnostic.kind, "MalformedOperand");
    assert_eq!(diagnostic.message, "missing operand in \"LOAD_CONST\"");

    let mut collected: Vec<Diagnostic> = Vec::new();
    collected.report(&diagnostic);
    assert_eq!(collected, vec![diagnostic]);
  }
}
