mod dev;

pub use dev::{DevFormatter, DEFAULT_SEPARATOR, IMBALANCED_MARKER, TIMESTAMP_FORMAT};

#[cfg(test)]
mod tests;
