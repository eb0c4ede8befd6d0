pub mod assembler;
pub mod engine;
pub mod matcher;
pub mod normalizer;
pub mod sampler;
pub mod sequence;
pub mod similarity;
pub mod types;
