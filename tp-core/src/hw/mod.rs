//! Hardware interaction: coretemp sensors and the ThinkPad ACPI fan

pub mod discovery;
pub mod fan;
pub mod sensor;
