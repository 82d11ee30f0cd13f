/*!
  This module is responsible for the encoding and decoding of binary instructions.

  Every instruction is one 32 bit word, written to the output as four little-endian bytes.
  The opcode always occupies the low three bits; the operand, when there is one, sits
  directly above it.
*/
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

use super::{Instruction, Command, Operand, Operation, OPCODE_BITS, ABS_OPERAND_BITS};
use crate::error::{InternalInvariantViolation, TrailingBytes};

// If you change this you must also change `encode_instruction` and `try_decode_word`.
pub type Word = u32;
pub const WORD_BYTES: usize = std::mem::size_of::<Word>();

pub const OPCODE_MASK: Word = (1 << OPCODE_BITS) - 1;
pub const ABS_MASK: Word = (1 << ABS_OPERAND_BITS) - 1;

/// A packed instruction.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EncodedWord {
  pub value: Word,
}

impl EncodedWord {
  /// Byte `i` is `(value >> 8i) & 0xFF`.
  pub fn bytes(&self) -> [u8; WORD_BYTES] {
    self.value.to_le_bytes()
  }

  pub fn from_bytes(bytes: [u8; WORD_BYTES]) -> EncodedWord {
    EncodedWord { value: Word::from_le_bytes(bytes) }
  }

  pub fn opcode(&self) -> u8 {
    (self.value & OPCODE_MASK) as u8
  }

  /// The bytes as `0x0D`-style strings, in output order.
  pub fn hex_bytes(&self) -> Vec<String> {
    self.bytes().iter().map(|b| format!("0x{:02X}", b)).collect()
  }
}

impl Display for EncodedWord {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.hex_bytes().join(", "))
  }
}

/// Keeps the low `mask` bits of an operand, two's complement for negative values.
fn field(operand: Operand, mask: Word) -> Word {
  (operand as Word) & mask
}

/**
  Encodes the instruction into a word. An `ABS` address keeps its low 12 bits. A `LOAD_CONST`
  constant is shifted unmasked, so the word is `(b << 3) | 5` modulo 2^32. Never an error.
*/
pub fn encode_instruction(instruction: &Instruction) -> EncodedWord {
  let opcode = instruction.opcode() as Word;
  let value =
    match instruction {
      // [OpCode:3][Constant:29]
      Instruction::LoadConst(b) => ((*b as Word) << OPCODE_BITS) | opcode,
      // [OpCode:3][Unused:29]
      Instruction::ReadMem | Instruction::WriteMem => opcode,
      // [OpCode:3][Address:12][Unused:17]
      Instruction::Abs(b) => (field(*b, ABS_MASK) << OPCODE_BITS) | opcode,
    };
  EncodedWord { value }
}

pub fn encode_command(command: &Command) -> EncodedWord {
  let word = encode_instruction(&command.instruction);
  tracing::debug!(line = command.line, "{} -> {:#010X}", command, word.value);
  word
}

/// Encodes every command, preserving order.
pub fn encode_all(commands: &[Command]) -> Vec<EncodedWord> {
  commands.iter().map(encode_command).collect()
}

/**
  Decodes a word back into an instruction. A `LOAD_CONST` constant is read from all 29 bits
  above the opcode; other bits outside the instruction's fields are ignored. An opcode without
  an instruction form is an invariant violation.
*/
pub fn try_decode_word(word: Word) -> Result<Instruction, InternalInvariantViolation> {
  let opcode = (word & OPCODE_MASK) as u8;
  let payload = word >> OPCODE_BITS;
  let operand =
    match Operation::try_from(opcode) {
      Ok(Operation::LoadConst) => Some(payload as Operand),
      Ok(Operation::Abs) => Some((payload & ABS_MASK) as Operand),
      _ => None,
    };
  Instruction::from_raw(opcode, operand)
}

/// Concatenates the little-endian bytes of each word, with no header or padding.
pub fn to_byte_stream(words: &[EncodedWord]) -> Vec<u8> {
  words.iter().flat_map(EncodedWord::bytes).collect()
}

/// Writes the words to `sink` in order, four bytes each.
pub fn write_words<W: Write + ?Sized>(words: &[EncodedWord], sink: &mut W) -> io::Result<()> {
  for word in words {
    sink.write_all(&word.bytes())?;
  }
  sink.flush()
}

/// Splits a byte stream into words. The length must be a multiple of four.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<Word>, TrailingBytes> {
  if bytes.len() % WORD_BYTES != 0 {
    return Err(TrailingBytes { len: bytes.len() });
  }
  Ok(
    bytes
      .chunks_exact(WORD_BYTES)
      .map(|chunk| Word::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
      .collect()
  )
}
