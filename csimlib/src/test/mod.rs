mod cache_tests;
