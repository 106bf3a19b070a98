//! In-process integration tests: public HTTP router, identity RPC over TCP,
//! and a consuming service behind the authorization middleware.

mod helpers;

mod consumer_test;
mod outage_test;
mod session_test;
