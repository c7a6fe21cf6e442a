#[macro_use]
mod par;

pub mod alphabets;
pub mod config;
pub mod engine;
pub mod error;
pub mod genetic_code;
pub mod io;
pub mod matrix;
pub mod restriction;
pub mod seq;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{BioError, BioResult, ErrorKind};
