pub(crate) mod down;
pub(crate) mod status;
pub(crate) mod up;
