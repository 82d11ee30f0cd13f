use std::fmt::{Display, Formatter};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};

use crate::error::InternalInvariantViolation;

/// Operands are read as signed 64 bit integers and narrowed only when packed.
pub type Operand = i64;

/// Width of the opcode field (field A) in bits.
pub const OPCODE_BITS: u32 = 3;
/// Width of the `LOAD_CONST` operand field, bits 3 to 28.
pub const LOAD_CONST_OPERAND_BITS: u32 = 26;
/// Width of the `ABS` operand field, bits 3 to 14.
pub const ABS_OPERAND_BITS: u32 = 12;

/**
  Opcodes of the virtual machine.

  The discriminant of each variant is its opcode, so the enum converts to and from `u8`
  directly. The `to_string` attribute is the mnemonic used in source text; parsing it is
  case-insensitive.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Operation {
  #[strum(to_string = "ABS")]
  Abs       = 2, // ABS,<address>
  #[strum(to_string = "READ_MEM")]
  ReadMem   = 4, // READ_MEM
  #[strum(to_string = "LOAD_CONST")]
  LoadConst = 5, // LOAD_CONST,<constant>
  #[strum(to_string = "WRITE_MEM")]
  WriteMem  = 7, // WRITE_MEM
}

impl Operation {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn mnemonic(&self) -> &'static str {
    self.into()
  }

  /// Number of operand fields the operation reads from its source record.
  pub fn arity(&self) -> usize {
    match self {
      Operation::LoadConst | Operation::Abs => 1,
      Operation::ReadMem | Operation::WriteMem => 0,
    }
  }

  /// Width in bits of the operand field (field B), zero if there is none.
  pub fn operand_bits(&self) -> u32 {
    match self {
      Operation::LoadConst => LOAD_CONST_OPERAND_BITS,
      Operation::Abs => ABS_OPERAND_BITS,
      Operation::ReadMem | Operation::WriteMem => 0,
    }
  }
}

/// The unencoded form of a single instruction. The opcode is implied by the variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  /// [OpCode:3][Constant:29]
  LoadConst(Operand),
  /// [OpCode:3][Unused:29]
  ReadMem,
  /// [OpCode:3][Unused:29]
  WriteMem,
  /// [OpCode:3][Address:12][Unused:17]
  Abs(Operand),
}

impl Instruction {
  pub fn operation(&self) -> Operation {
    match self {
      Instruction::LoadConst(_) => Operation::LoadConst,
      Instruction::ReadMem => Operation::ReadMem,
      Instruction::WriteMem => Operation::WriteMem,
      Instruction::Abs(_) => Operation::Abs,
    }
  }

  pub fn opcode(&self) -> u8 {
    self.operation().code()
  }

  pub fn operand(&self) -> Option<Operand> {
    match self {
      Instruction::LoadConst(b) | Instruction::Abs(b) => Some(*b),
      Instruction::ReadMem | Instruction::WriteMem => None,
    }
  }

  /**
    Rebuilds an instruction from its raw parts. This is the only way an opcode outside the
    operation table can reach the encoder, so an unknown opcode, or an operand-carrying
    opcode without an operand, is an invariant violation rather than a parse error.
    An operand given to an operation that takes none is dropped.
  */
  pub fn from_raw(opcode: u8, operand: Option<Operand>)
    -> Result<Instruction, InternalInvariantViolation>
  {
    let operation =
      Operation::try_from(opcode).map_err(|_| InternalInvariantViolation { opcode })?;
    match (operation, operand) {
      (Operation::LoadConst, Some(b)) => Ok(Instruction::LoadConst(b)),
      (Operation::Abs, Some(b)) => Ok(Instruction::Abs(b)),
      (Operation::ReadMem, _) => Ok(Instruction::ReadMem),
      (Operation::WriteMem, _) => Ok(Instruction::WriteMem),
      (_, None) => Err(InternalInvariantViolation { opcode }),
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.operand() {
      Some(b) => write!(f, "{},{}", self.operation().mnemonic(), b),
      None => f.write_str(self.operation().mnemonic()),
    }
  }
}

/// An instruction together with the source line it was read from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Command {
  pub instruction: Instruction,
  /// 1-based, used only for diagnostics.
  pub line: usize,
}

impl Command {
  pub fn new(instruction: Instruction, line: usize) -> Command {
    Command { instruction, line }
  }

  pub fn kind(&self) -> Operation {
    self.instruction.operation()
  }

  pub fn opcode(&self) -> u8 {
    self.instruction.opcode()
  }

  pub fn operand(&self) -> Option<Operand> {
    self.instruction.operand()
  }
}

impl Display for Command {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.instruction)
  }
}
