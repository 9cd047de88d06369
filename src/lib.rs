#![no_std]

//! A bit-precise decoder for MPEG-2 and DVB private sections.
//!
//! Sectional takes sections already reassembled from a transport stream and
//! decodes them into owned, immutable values. Every field is read through a
//! bounded [`BitCursor`](bits::BitCursor), so a malformed length can only
//! ever produce a [`DecodeError`], never a read outside its record.
//!
//! Most users should begin with [`decode`] and [`decode_with`] in the
//! [`section`] module. Descriptor loops are decoded by a
//! [`DescriptorRegistry`](descriptor::DescriptorRegistry), which may be
//! extended with decoders for private descriptors; descriptors with no
//! decoder are kept as raw bytes.
//!
//! Decoding holds no state between calls. Registries and lookup tables are
//! immutable, so sections may be decoded from any number of threads at once.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: implement standard library traits in dependencies (default).

extern crate alloc;

pub mod bits;
pub mod check;
pub mod descriptor;
pub mod error;
pub mod lookup;
pub mod section;

pub use error::DecodeError;
pub use section::{decode, decode_all, decode_with};
