//! Layout checks for assumptions the parser can't verify on its own.

/// Unexpected cases that usually indicate incorrectly named or grouped constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The constant and input register tables have different lengths.
    ///
    /// Names are assigned by position, so some constants are either unnamed
    /// or named after the wrong input register.
    NameTableLengthMismatch {
        unit: usize,
        constants: usize,
        input_registers: usize,
    },

    /// An array uniform declares more entries than remain in the constant table.
    TruncatedArray {
        unit: usize,
        position: usize,
        declared_length: u8,
        available: usize,
    },
}
