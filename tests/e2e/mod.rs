// End-to-end tests for the translation relay HTTP API.
//
// One shared PostgreSQL container serves the whole suite. Each test leases
// its own database (test_db_<uuid>) from a pool managed through test-context,
// so tests run in parallel. Remote AI providers are replaced by in-process
// fakes; everything else (store, caches, fanout, router) is the real thing.

mod test_admin;
mod test_messages;
mod test_user;
mod test_user_store;
