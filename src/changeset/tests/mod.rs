mod tests_apply;
mod tests_builder;
mod tests_yaml;
