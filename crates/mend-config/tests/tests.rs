// Integration-test harness for `mend-config`; the cases live in `tests/suite/`.
mod suite;
