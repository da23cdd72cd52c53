pub(crate) mod document;
pub(crate) mod fetch;
pub(crate) mod loader;
pub(crate) mod segment;
pub(crate) mod source;
