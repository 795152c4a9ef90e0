//! Set parsing, dex lookup and damage ranges for Showdown-style sets.
//!
//! The main entry point is [`parse_set`]. [`catalog::resolve_sets`] picks the
//! sets of a species out of a [`dex::Dex`], and [`damage::DamageEngine`]
//! turns two realised sets into damage ranges.

pub mod catalog;
pub mod damage;
pub mod dex;
pub mod error;
pub mod moves;
pub mod parser;
pub mod stats;
pub mod types;

pub use parser::{parse_set, ParsedSet};

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::catalog::{resolve_sets, SelectedSet, SelectionPolicy, SetRequest, Side};
    pub use crate::damage::{
        Battler, DamageEngine, DamageRange, Field, SideConditions, StandardCalc, Status, Weather,
    };
    pub use crate::dex::{Dex, SpeciesData};
    pub use crate::error::{CatalogError, DamageError, DexError};
    pub use crate::moves::MoveDex;
    pub use crate::parser::{parse_set, ParsedSet};
    pub use crate::stats::{Stat, StatTable};
    pub use crate::types::Type;
}
