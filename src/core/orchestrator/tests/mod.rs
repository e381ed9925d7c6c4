mod query_builder;
