use proptest::prelude::*;

use uvm_asm::bytecode::{encode_instruction, to_byte_stream, try_decode_word, Instruction};
use uvm_asm::{assemble, Assembler};

fn instruction() -> impl Strategy<Value = Instruction> {
  prop_oneof![
    (0i64..(1 << 26)).prop_map(Instruction::LoadConst),
    Just(Instruction::ReadMem),
    Just(Instruction::WriteMem),
    (0i64..(1 << 12)).prop_map(Instruction::Abs),
  ]
}

fn source_line(instruction: &Instruction) -> String {
  instruction.to_string()
}

proptest! {
  #[test]
  fn load_const_round_trips(b in 0i64..(1 << 26)) {
    let word = encode_instruction(&Instruction::LoadConst(b));
    prop_assert_eq!(word.value & 0x7, 5);
    prop_assert_eq!(try_decode_word(word.value), Ok(Instruction::LoadConst(b)));
  }

  #[test]
  fn abs_keeps_low_12_bits(b in any::<i64>()) {
    let value = encode_instruction(&Instruction::Abs(b)).value;
    prop_assert_eq!(value & 0x7, 2);
    prop_assert_eq!((value >> 3) & 0xFFF, (b & 0xFFF) as u32);
    prop_assert_eq!(value >> 15, 0);
  }

  #[test]
  fn load_const_wraps_modulo_2_32(b in any::<i64>()) {
    let value = encode_instruction(&Instruction::LoadConst(b)).value;
    let expected = ((b as i128) << 3 | 5).rem_euclid(1 << 32) as u32;
    prop_assert_eq!(value, expected);
    prop_assert_eq!(value & 0x7, 5);
  }

  #[test]
  fn bytes_reassemble_little_endian(instruction in instruction()) {
    let word = encode_instruction(&instruction);
    let b = word.bytes();
    let reassembled =
      (b[0] as u32) | ((b[1] as u32) << 8) | ((b[2] as u32) << 16) | ((b[3] as u32) << 24);
    prop_assert_eq!(reassembled, word.value);
  }

  #[test]
  fn output_preserves_order(program in prop::collection::vec(instruction(), 0..64)) {
    let text = program.iter().map(source_line).collect::<Vec<_>>().join("\n");
    let bytes = assemble(&text).unwrap();
    prop_assert_eq!(bytes.len(), 4 * program.len());

    for (i, instruction) in program.iter().enumerate() {
      let expected = encode_instruction(instruction).bytes();
      prop_assert_eq!(&bytes[4 * i..4 * i + 4], &expected[..]);
    }
  }

  #[test]
  fn comments_and_blanks_add_nothing(
    program in prop::collection::vec(instruction(), 1..32),
    comment in "[ a-zA-Z0-9_,]{0,20}"
  ) {
    let plain = program.iter().map(source_line).collect::<Vec<_>>().join("\n");
    let padded = program
      .iter()
      .map(|i| format!("#{}\n\n{}", comment, source_line(i)))
      .collect::<Vec<_>>()
      .join("\n");

    let plain = Assembler::default().translate(&plain).unwrap();
    let padded = Assembler::default().translate(&padded).unwrap();
    prop_assert_eq!(plain.len(), padded.len());
    prop_assert_eq!(plain.byte_stream(), padded.byte_stream());
    let words: Vec<_> = program.iter().map(encode_instruction).collect();
    prop_assert_eq!(to_byte_stream(&words), plain.byte_stream());
  }
}

#[test]
fn wide_constants_set_the_top_bits() {
  assert_eq!(assemble("LOAD_CONST,67108864").unwrap(), [0x05, 0x00, 0x00, 0x20]);
  assert_eq!(assemble("LOAD_CONST,-1").unwrap(), [0xFD, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn fail_fast_reports_third_line() {
  let error = assemble("LOAD_CONST,129\nREAD_MEM\nBOGUS\nWRITE_MEM").unwrap_err();
  assert_eq!(error.line, 3);
  assert_eq!(error.to_string(), "line 3: unknown mnemonic 'BOGUS' in \"BOGUS\"");
}
