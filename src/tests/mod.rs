mod analysis_tests;
mod property_tests;
