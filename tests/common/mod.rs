// Not every test binary uses every helper.
#![allow(dead_code)]

pub(crate) mod cluster;

pub(crate) mod logging;

pub(crate) mod mem_cluster;

pub(crate) mod network;
