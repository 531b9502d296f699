pub(crate) mod decode;
pub(crate) mod fit;
pub(crate) mod loader;
