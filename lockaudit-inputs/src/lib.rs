//! Input resolution: read the manifest and both lockfile candidates, pick one lockfile, and merge
//! the declared dependencies.
//!
//! Missing files are not errors at read time; the resolver decides which absences are fatal.
//! Present files must parse.

mod load;

pub use load::{
    InputError, InputWarning, RawInputs, ResolvedInputs, load_inputs, merge_dependencies,
    read_inputs, resolve_inputs,
};
