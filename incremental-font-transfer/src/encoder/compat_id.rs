//! Generation of compatibility ids for newly built IFT mapping tables.
//!
//! A compatibility id ties together an `IFT`/`IFTX` mapping table with the patches that were
//! built against it: the client refuses to apply a patch whose id does not match the table it
//! was selected from. See <https://w3c.github.io/IFT/Overview.html#computing-compatibility-id>.

use rand::Rng;
use read_fonts::tables::ift::CompatibilityId;

/// Produces a new, randomly generated compatibility id.
///
/// Every call returns a fresh id; callers that need the same id to show up in more than one
/// mapping table (as is the case for a single encoding run that populates both `IFT` and `IFTX`)
/// must generate it once and clone it into place.
pub fn new_compat_id() -> CompatibilityId {
    let mut rng = rand::thread_rng();
    CompatibilityId::from_u32s([rng.gen(), rng.gen(), rng.gen(), rng.gen()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_trivially_equal() {
        // Not a proof of randomness, just a smoke test that we aren't returning a constant.
        let a = new_compat_id();
        let b = new_compat_id();
        assert_ne!(a, b);
    }
}
