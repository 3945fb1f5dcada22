pub mod subconverter;

pub use subconverter::{Artifact, ConvertError, Converter};
