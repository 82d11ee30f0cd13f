/*!
  The human readable textual form of a program is called assembly. Each line is one record of
  comma separated fields: a mnemonic followed by its operand, if it has one.

  ```text
  # comment
  LOAD_CONST,129
  READ_MEM
  ABS,137
  ```

  Records are read lazily with `records`. The `Parser` turns them into `Command`s, leaning on
  the `strum` derives of `Operation` to recognize mnemonics.
*/

use std::str::FromStr;

use nom::{
  branch::alt,
  bytes::complete::{is_not, tag, take_while},
  character::complete::{char as one_char, digit1, one_of, space0},
  combinator::{all_consuming, map, map_res, opt, recognize, value},
  multi::{many0, separated_list0},
  sequence::{delimited, pair, tuple},
  IResult,
};
use tracing::debug;

use crate::bytecode::{Command, Instruction, Operand, Operation};
use crate::config::{AssemblerConfig, ErrorPolicy};
use crate::error::{AssemblyError, DiagnosticSink, ErrorKind, OperandFault};

/// Marks a record as a comment when it starts the first field.
pub const COMMENT_MARKER: char = '#';

/// One source line split into trimmed fields.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record<'a> {
  /// 1-based line number.
  pub line: usize,
  /// The line as written, without its line ending.
  pub text: &'a str,
  pub fields: Vec<String>,
}

impl<'a> Record<'a> {
  /// Empty records and comments produce neither a command nor an error.
  pub fn is_blank_or_comment(&self) -> bool {
    match self.fields.first() {
      None => true,
      Some(first) => first.is_empty() || first.starts_with(COMMENT_MARKER),
    }
  }
}

/// Lazy, single pass iterator over the records of a text.
pub struct Records<'a> {
  lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

/// Splits `text` into records, one per line.
pub fn records(text: &str) -> Records<'_> {
  Records { lines: text.lines().enumerate() }
}

impl<'a> Iterator for Records<'a> {
  type Item = Record<'a>;

  fn next(&mut self) -> Option<Record<'a>> {
    let (idx, text) = self.lines.next()?;
    Some(Record { line: idx + 1, text, fields: split_fields(text) })
  }
}

// region Field parsers

/// `"..."` with `""` standing for a literal quote. Text after the closing quote up to the next
/// comma is kept, as CSV readers do.
fn quoted_field(input: &str) -> IResult<&str, String> {
  map(
    tuple((
      space0,
      delimited(
        one_char('"'),
        many0(alt((is_not("\""), value("\"", tag("\"\""))))),
        one_char('"')
      ),
      take_while(|c: char| c != ',')
    )),
    |(_, pieces, rest): (&str, Vec<&str>, &str)| {
      let mut field = pieces.concat();
      field.push_str(rest.trim());
      field
    }
  )(input)
}

fn bare_field(input: &str) -> IResult<&str, String> {
  map(take_while(|c: char| c != ','), |out: &str| out.trim().to_string())(input)
}

fn fields(input: &str) -> IResult<&str, Vec<String>> {
  separated_list0(one_char(','), alt((quoted_field, bare_field)))(input)
}

/// Splits one line into trimmed fields. A blank line has no fields.
pub fn split_fields(line: &str) -> Vec<String> {
  if line.trim().is_empty() {
    return Vec::new();
  }
  match all_consuming(fields)(line) {
    Ok((_rest, fields)) => fields,
    // Otherwise the whole line is one field.
    Err(_e) => vec![line.trim().to_string()],
  }
}

fn integer(input: &str) -> IResult<&str, Operand> {
  map_res(recognize(pair(opt(one_of("+-")), digit1)), Operand::from_str)(input)
}

/// Parses an operand field: optional sign followed by decimal digits.
pub fn parse_operand(field: Option<&str>) -> Result<Operand, OperandFault> {
  match field {
    None | Some("") => Err(OperandFault::Missing),
    Some(text) => all_consuming(integer)(text)
      .map(|(_, operand)| operand)
      .map_err(|_| OperandFault::NotAnInteger(text.to_string())),
  }
}

// endregion

/// Converts records into commands according to an `AssemblerConfig`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Parser {
  config: AssemblerConfig,
}

/// Result of a lenient parse: every well formed command plus every rejected record.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseOutcome {
  pub commands: Vec<Command>,
  pub errors: Vec<AssemblyError>,
}

impl Parser {
  pub fn new(config: AssemblerConfig) -> Parser {
    Parser { config }
  }

  pub fn config(&self) -> &AssemblerConfig {
    &self.config
  }

  fn lookup_operation(&self, name: &str) -> Option<Operation> {
    if let Ok(operation) = Operation::from_str(name) {
      return Some(operation);
    }
    if self.config.numeric_opcodes {
      return name.parse::<u8>().ok().and_then(|code| Operation::try_from(code).ok());
    }
    None
  }

  /// Parses a single record. Blank and comment records yield `Ok(None)`.
  pub fn parse_record(&self, record: &Record) -> Result<Option<Command>, AssemblyError> {
    if record.is_blank_or_comment() {
      return Ok(None);
    }
    let fail = |kind: ErrorKind| AssemblyError::new(record.line, record.text, kind);

    let name = &record.fields[0];
    let operation = self
      .lookup_operation(name)
      .ok_or_else(|| fail(ErrorKind::UnknownMnemonic(name.clone())))?;

    let operand_field = record.fields.get(1).map(String::as_str);
    let instruction = match operation {
      Operation::LoadConst => {
        let operand = parse_operand(operand_field).map_err(|e| fail(ErrorKind::MalformedOperand(e)))?;
        if !self.config.constants.accepts(operand) {
          return Err(fail(ErrorKind::MalformedOperand(OperandFault::OutOfRange(operand))));
        }
        Instruction::LoadConst(operand)
      }
      Operation::Abs => {
        let operand = parse_operand(operand_field).map_err(|e| fail(ErrorKind::MalformedOperand(e)))?;
        Instruction::Abs(operand)
      }
      Operation::ReadMem => Instruction::ReadMem,
      Operation::WriteMem => Instruction::WriteMem,
    };

    if record.fields.len() > operation.arity() + 1 {
      debug!(line = record.line, "ignoring {} extra field(s)", record.fields.len() - operation.arity() - 1);
    }

    Ok(Some(Command::new(instruction, record.line)))
  }

  /// Stops at the first malformed record; no partial result is returned.
  pub fn parse_strict<'a, I>(&self, records: I) -> Result<Vec<Command>, AssemblyError>
    where I: IntoIterator<Item = Record<'a>>
  {
    let mut commands = Vec::new();
    for record in records {
      if let Some(command) = self.parse_record(&record)? {
        debug!(line = command.line, "parsed {}", command);
        commands.push(command);
      }
    }
    Ok(commands)
  }

  /// Skips malformed records, reporting each one to `sink`.
  pub fn parse_lenient<'a, I, S>(&self, records: I, sink: &mut S) -> ParseOutcome
    where I: IntoIterator<Item = Record<'a>>,
          S: DiagnosticSink + ?Sized
  {
    let mut outcome = ParseOutcome::default();
    for record in records {
      match self.parse_record(&record) {
        Ok(Some(command)) => {
          debug!(line = command.line, "parsed {}", command);
          outcome.commands.push(command);
        }
        Ok(None) => {}
        Err(error) => {
          sink.report(&error.to_diagnostic());
          outcome.errors.push(error);
        }
      }
    }
    outcome
  }

  /// Parses according to the configured `ErrorPolicy`. In fail-fast mode the outcome never
  /// holds errors.
  pub fn parse<'a, I, S>(&self, records: I, sink: &mut S) -> Result<ParseOutcome, AssemblyError>
    where I: IntoIterator<Item = Record<'a>>,
          S: DiagnosticSink + ?Sized
  {
    match self.config.error_policy {
      ErrorPolicy::FailFast => {
        let commands = self.parse_strict(records)?;
        Ok(ParseOutcome { commands, errors: Vec::new() })
      }
      ErrorPolicy::Lenient => Ok(self.parse_lenient(records, sink)),
    }
  }
}

/// Parses `text` with the default, fail-fast configuration.
pub fn parse_assembly(text: &str) -> Result<Vec<Command>, AssemblyError> {
  Parser::default().parse_strict(records(text))
}
