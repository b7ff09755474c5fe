mod record_builder;
