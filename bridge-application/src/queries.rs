pub mod gateway_queries;
