/*!
  An assembler for the UVM, a minimal virtual machine with four instruction forms.

  Translation happens in two stages. The parser reads comma separated records into `Command`s,
  and the encoder packs each command into a 32 bit word that is emitted as four little-endian
  bytes. Both stages are pure; all file handling lives in the `uvm-asm` binary.

  ```
  let bytes = uvm_asm::assemble("LOAD_CONST,129\nREAD_MEM").unwrap();
  assert_eq!(bytes, [0x0D, 0x04, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00]);
  ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sample;
pub mod trace;

pub use config::{AssemblerConfig, ConstantPolicy, ErrorPolicy};
pub use error::{AssemblyError, Diagnostic, DiagnosticSink, ErrorKind, InternalInvariantViolation,
                LogSink, OperandFault, TrailingBytes};
pub use pipeline::{assemble, Assembler, Translation};
