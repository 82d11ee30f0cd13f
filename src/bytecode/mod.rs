/*!

  The UVM uses a 32 bit little-endian word size, and every instruction is exactly one word.
  The low three bits of a word are the opcode (field A); an operand (field B), if the
  instruction has one, is packed immediately above it:

    LOAD_CONST  A=5  B: bits 3-28, 26 bits
    READ_MEM    A=4
    WRITE_MEM   A=7
    ABS         A=2  B: bits 3-14, 12 bits

  Operands are read from source as 64 bit signed integers. An `ABS` address is masked to its
  12 bits, so bits 15-31 of its word are zero. A `LOAD_CONST` constant is not masked: the word
  is `(B << 3) | 5` modulo 2^32, so a constant of 2^26 or more, or a negative one, sets bits
  29-31. `ConstantPolicy::Reject` keeps constants inside the 26 bit field.

  `Operation` is the opcode table. `Instruction` holds the unencoded components of an
  instruction with one variant per operation, so encoding is an exhaustive match rather than a
  lookup that could fall through. A `Command` is an instruction tagged with the source line it
  came from.

*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{parse_assembly, parse_operand, records, split_fields, ParseOutcome, Parser,
                   Record, Records, COMMENT_MARKER};
pub use binary::{encode_all, encode_command, encode_instruction, to_byte_stream, try_decode_word,
                 words_from_bytes, write_words, EncodedWord, Word, WORD_BYTES, ABS_MASK,
                 OPCODE_MASK};
pub use instruction::{Command, Instruction, Operand, Operation, ABS_OPERAND_BITS,
                      LOAD_CONST_OPERAND_BITS, OPCODE_BITS};
