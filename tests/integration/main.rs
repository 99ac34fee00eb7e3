//! Integration tests over the in-memory stores.

mod helpers;

mod block_test;
mod bus_test;
mod ledger_test;
mod registry_test;
mod suspension_test;
mod sweep_test;
