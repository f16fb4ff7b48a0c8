//! The [VVAR](https://learn.microsoft.com/en-us/typography/opentype/spec/vvar) table

include!("../../generated/generated_vvar.rs");

use super::variations::{DeltaSetIndexMap, ItemVariationStore};
