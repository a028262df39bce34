//! A library for reading and editing compiled 3DS shader binaries.
//!
//! A `.shbin` file is a DVLB container with one or more DVLE shader units.
//! Each unit has a table of uniform constants with default values.
//! Names for the constants come from the unit's symbol table.
//!
//! # Getting Started
//! ```rust no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use shbin_lib::ShaderBinary;
//!
//! let mut binary = ShaderBinary::from_file("SpriteShader.shbin")?;
//! for uniform in binary.uniforms(0).unwrap_or_default() {
//!     println!("{} {:?}", uniform.display_name(), uniform.decoded_values());
//! }
//!
//! // Set the first constant of the first unit to (1.0, 0.5, 0.0, 1.0).
//! binary.update_value_text(0, 0, ["1.0", "0.5", "0.0", "1.0"])?;
//! binary.write_to_file("out.shbin")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! The file bytes are owned by [ShaderBinary] and never restructured.
//! Parsing records the absolute offset of each constant's payload,
//! so edits patch only those bytes and all other bytes are written back unchanged.
//! Offsets read from the file are checked against the buffer length before any access.
//!
//! Float uniforms use a custom 24-bit float format. See [float24] for the conversions.
pub mod binary;
pub mod buffer;
pub mod dvlb;
pub mod dvle;
pub mod error;
pub mod float24;
pub mod snapshot;
pub mod uniform;
pub mod validate;

pub use binary::ShaderBinary;
