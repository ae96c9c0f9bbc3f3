/// Catalog operations behind the REST routes.
pub mod catalog_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Query-parameter filter builder.
pub mod filter;
/// Health check service.
pub mod health_service;
/// Background storage connection supervisor.
pub mod storage_supervisor;
