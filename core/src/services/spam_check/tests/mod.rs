mod checker_tests;
mod mocks;
