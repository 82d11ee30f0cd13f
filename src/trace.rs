/*!
  Human readable renderings of a translation.

  * The test format prints `A=<opcode>, B=<operand>` followed by the `HEX:` bytes of the word,
    one pair of lines per command.
  * The detailed format is a table of every command with its line, field layout and word.
  * The intermediate representation is a JSON array with one record per command, consumed by
    later stages of the toolchain.
*/

use prettytable::{format as TableFormat, Table};
use serde::{Deserialize, Serialize};

use crate::bytecode::{Command, EncodedWord, Instruction, Operand, OPCODE_BITS};
use crate::pipeline::Translation;

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/// `A=5, B=129` or `A=4`.
pub fn fields_line(instruction: &Instruction) -> String {
  match instruction.operand() {
    Some(b) => format!("A={}, B={}", instruction.opcode(), b),
    None => format!("A={}", instruction.opcode()),
  }
}

/// Renders one `A=…` / `HEX: …` pair for every instruction.
pub fn render_test_format<'a, I>(pairs: I) -> String
  where I: IntoIterator<Item = (&'a Instruction, &'a EncodedWord)>
{
  pairs
    .into_iter()
    .map(|(instruction, word)| format!("{}\nHEX: {}\n", fields_line(instruction), word))
    .collect()
}

pub fn render_translation(translation: &Translation) -> String {
  render_test_format(translation.iter().map(|(c, w)| (&c.instruction, w)))
}

/// Bit ranges occupied by the fields of an instruction, e.g. `A=5 (0-2), B=129 (3-28)`.
pub fn layout(instruction: &Instruction) -> String {
  let opcode_range = format!("A={} (0-{})", instruction.opcode(), OPCODE_BITS - 1);
  match instruction.operand() {
    Some(b) => {
      let top = OPCODE_BITS + instruction.operation().operand_bits() - 1;
      format!("{}, B={} ({}-{})", opcode_range, b, OPCODE_BITS, top)
    }
    None => opcode_range,
  }
}

/// Table with one row per command.
pub fn detailed_table(translation: &Translation) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![
    ubr->"#", ubr->"Line", ubl->"Kind", ubr->"Opcode", ubr->"Operand", ubl->"Bits", ubl->"HEX",
    ubr->"Value"
  ]);

  for (i, (command, word)) in translation.iter().enumerate() {
    let operand = match command.operand() {
      Some(b) => b.to_string(),
      None => "-".to_string(),
    };
    table.add_row(row![
      r->i + 1,
      r->command.line,
      command.kind().mnemonic(),
      r->command.opcode(),
      r->operand,
      layout(&command.instruction),
      word,
      r->word.value
    ]);
  }
  table
}

/// One entry of the intermediate representation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct IntermediateRecord {
  pub line: usize,
  pub opcode: u8,
  pub arg: Option<Operand>,
  pub hex: Vec<String>,
  pub encoded: u32,
}

impl IntermediateRecord {
  pub fn new(command: &Command, word: &EncodedWord) -> IntermediateRecord {
    IntermediateRecord {
      line: command.line,
      opcode: command.opcode(),
      arg: command.operand(),
      hex: word.hex_bytes(),
      encoded: word.value,
    }
  }
}

pub fn intermediate(translation: &Translation) -> Vec<IntermediateRecord> {
  translation.iter().map(|(c, w)| IntermediateRecord::new(c, w)).collect()
}

pub fn intermediate_json(translation: &Translation) -> serde_json::Result<String> {
  serde_json::to_string_pretty(&intermediate(translation))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pipeline::Assembler;

  fn translate(text: &str) -> Translation {
    Assembler::default().translate(text).unwrap()
  }

  #[test]
  fn test_format() {
    let translation = translate("LOAD_CONST,129\nREAD_MEM");
    assert_eq!(
      render_translation(&translation),
      "A=5, B=129\nHEX: 0x0D, 0x04, 0x00, 0x00\nA=4\nHEX: 0x04, 0x00, 0x00, 0x00\n"
    );
  }

  #[test]
  fn bit_layouts() {
    assert_eq!(layout(&Instruction::LoadConst(129)), "A=5 (0-2), B=129 (3-28)");
    assert_eq!(layout(&Instruction::Abs(137)), "A=2 (0-2), B=137 (3-14)");
    assert_eq!(layout(&Instruction::WriteMem), "A=7 (0-2)");
  }

  #[test]
  fn table_has_a_row_per_command() {
    let translation = translate("LOAD_CONST,129\nABS,137\nWRITE_MEM");
    let table = detailed_table(&translation);
    assert_eq!(table.len(), 3);
    let rendered = table.to_string();
    assert!(rendered.contains("LOAD_CONST"));
    assert!(rendered.contains("0x4A, 0x04, 0x00, 0x00"));
  }

  #[test]
  fn intermediate_records() {
    let translation = translate("# header\nLOAD_CONST,129\nREAD_MEM");
    let records = intermediate(&translation);
    assert_eq!(
      records[0],
      IntermediateRecord {
        line: 2,
        opcode: 5,
        arg: Some(129),
        hex: vec!["0x0D".into(), "0x04".into(), "0x00".into(), "0x00".into()],
        encoded: 1037,
      }
    );
    assert_eq!(records[1].arg, None);

    let json = intermediate_json(&translation).unwrap();
    let parsed: Vec<IntermediateRecord> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, records);
    assert!(json.contains("\"arg\": null"));
  }
}
