mod resource_tests;
mod token_tests;
