//! The Horizontal/Vertical Header tables.
//!
//! The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
//! and [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
//! tables have the same structure and so we define them in the same module.

include!("../../generated/generated_hvhea.rs");
