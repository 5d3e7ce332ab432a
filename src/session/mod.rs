pub(crate) mod produce;
