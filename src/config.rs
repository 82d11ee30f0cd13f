//! Translation settings. Every field has a default matching the stricter, documented
//! behavior; the command line only ever relaxes or tightens individual knobs.

use crate::bytecode::{Operand, LOAD_CONST_OPERAND_BITS};

/// What the parser does with a malformed record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ErrorPolicy {
  /// Stop at the first malformed record and return no commands.
  #[default]
  FailFast,
  /// Report the record to the diagnostic sink, skip it, and keep going.
  Lenient,
}

/// What happens to a `LOAD_CONST` operand that does not fit its 26 bit field.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum ConstantPolicy {
  /// Pack the constant as given. Bits 29-31 of the word may be set; anything beyond bit 31
  /// is dropped (two's complement for negative constants).
  #[default]
  Wrap,
  /// Reject anything outside `[0, 2^26)` as a malformed operand.
  Reject,
}

impl ConstantPolicy {
  pub fn accepts(&self, value: Operand) -> bool {
    match self {
      ConstantPolicy::Wrap => true,
      ConstantPolicy::Reject => (0..(1 << LOAD_CONST_OPERAND_BITS)).contains(&value),
    }
  }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct AssemblerConfig {
  pub error_policy: ErrorPolicy,
  pub constants: ConstantPolicy,
  /// Also accept the decimal opcode (`5`, `4`, `7`, `2`) in place of a mnemonic.
  pub numeric_opcodes: bool,
}

impl AssemblerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lenient(mut self) -> Self {
    self.error_policy = ErrorPolicy::Lenient;
    self
  }

  pub fn reject_wide_constants(mut self) -> Self {
    self.constants = ConstantPolicy::Reject;
    self
  }

  pub fn numeric_opcodes(mut self) -> Self {
    self.numeric_opcodes = true;
    self
  }
}
