//! The intra-document reference table used while parsing (§3/§4.6).

use std::collections::HashMap;

use crate::error::Warning;
use crate::value::Value;

/// A single `[name]`-defined value and the byte offset of its defining
/// token, used both for merge-conflict diagnostics and for rendering
/// redefinition warnings.
#[derive(Debug, Clone)]
pub struct ReferenceEntry {
    /// Byte offset of the `[` that introduced this definition.
    pub defining_offset: usize,
    /// The value bound to the reference name.
    pub value: Value,
}

/// Maps reference names (`[A-Za-z_][A-Za-z0-9_]*`) to their bound value.
/// Created empty at the start of each decode and dropped when decode
/// returns; redefinition is permitted and emits a [`Warning`].
#[derive(Debug, Default)]
pub struct ReferenceTable {
    entries: HashMap<String, ReferenceEntry>,
}

impl ReferenceTable {
    /// Creates an empty reference table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `name`, returning a clone of its bound value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|e| &e.value)
    }

    /// Registers `name -> value`. If `name` was already bound, the new
    /// value wins and two warnings are pushed onto `warnings`: a
    /// [`Warning::ReferenceRedefined`] at the new definition and a
    /// [`Warning::ReferencePreviouslyDefined`] at the one being replaced
    /// (§4.6: "emit two warnings, the redefinition and the prior
    /// definition's location").
    pub fn define(&mut self, name: String, value: Value, defining_offset: usize, warnings: &mut Vec<Warning>) {
        if let Some(prior) = self.entries.get(&name) {
            warnings.push(Warning::ReferenceRedefined {
                name: name.clone(),
                new_offset: defining_offset,
            });
            warnings.push(Warning::ReferencePreviouslyDefined {
                name: name.clone(),
                prior_offset: prior.defining_offset,
            });
        }
        self.entries.insert(name, ReferenceEntry { defining_offset, value });
    }
}
