//! HTTP middleware shared by the public and RPC routers.

pub mod logging;
