//! Glosa - Bilingual Dictionary Client
//! 
//! Looks words up on a bilingual dictionary site, extracts translations,
//! word forms and example sentences from the result page, and keeps a local
//! cache so repeated lookups never hit the network.

pub mod cli;
pub mod config;
pub mod locale;
pub mod normalize;
pub mod cache;
pub mod transport;
pub mod extract;
pub mod result;
pub mod lookup;
pub mod render;
pub mod repl;
pub mod error;
