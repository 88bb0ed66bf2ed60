mod tests_engine;
