//! The gasp table

include!("../../generated/generated_gasp.rs");
