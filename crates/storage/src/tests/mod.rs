mod captain_ddl_tests;
mod registry_tests;
