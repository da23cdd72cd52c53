pub(crate) mod panel;
pub(crate) mod refresh;
pub(crate) mod view;
