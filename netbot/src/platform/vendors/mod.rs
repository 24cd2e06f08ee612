//! Built-in platform definitions.

pub mod cisco_ios;
pub mod cisco_nxos;
pub mod generic;
