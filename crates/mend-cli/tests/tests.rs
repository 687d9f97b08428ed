// Integration tests for `mend-cli`.
//
// All integration tests live in a single harness; individual areas are modules under
// `tests/suite/`.

mod suite;
