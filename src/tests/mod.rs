pub mod curve_tests;
pub mod handler_tests;
pub mod ingest_tests;
pub mod status_tests;
