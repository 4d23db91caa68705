// src/form.rs
pub mod draft;
pub mod gating;
pub mod normalize;
pub mod paths;
pub mod signatures;
