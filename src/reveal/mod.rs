pub(crate) mod binder;
pub(crate) mod capability;
pub(crate) mod headless;
pub(crate) mod position;
