//! A small program exercising every instruction form.

use std::fs;
use std::io;
use std::path::Path;

pub const SAMPLE_PROGRAM: &str = "\
# UVM sample program
# Format: MNEMONIC[,operand]

# A=5, B=129 -> 0x0D, 0x04, 0x00, 0x00
LOAD_CONST,129

# A=4 -> 0x04, 0x00, 0x00, 0x00
READ_MEM

# A=7 -> 0x07, 0x00, 0x00, 0x00
WRITE_MEM

# A=2, B=137 -> 0x4A, 0x04, 0x00, 0x00
ABS,137
";

pub fn write_sample(path: &Path) -> io::Result<()> {
  fs::write(path, SAMPLE_PROGRAM)
}
