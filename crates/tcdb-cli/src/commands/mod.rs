pub(crate) mod constituents;
pub(crate) mod export;
pub(crate) mod infer;
pub(crate) mod info;
pub(crate) mod nearest;
pub(crate) mod search;
pub(crate) mod show;
pub(crate) mod stations;
pub(crate) mod tables;
pub(crate) mod validate;
