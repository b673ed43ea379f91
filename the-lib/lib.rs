use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod autocomplete;
pub mod document;
pub mod input;
pub mod markup;
pub mod provider;
pub mod selection;
pub mod surface;
pub mod transaction;
pub mod transform;
pub mod trigger;

pub type Tendril = SmartString<LazyCompact>;
