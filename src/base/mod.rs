pub(crate) mod base64;
pub(crate) mod credential;
pub(crate) mod escape;
pub(crate) mod post_policy;
pub(crate) mod signature;
