//! JSON HTTP API over the facet controller.
//!
//! Every request builds its own controller from the shared, read-only
//! catalog, applies the URL parameters and answers from it.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! climate-facets serve
//!
//! # Serve a catalog fetched from the backend
//! climate-facets --api-url http://localhost:8000 serve --port 3000
//!
//! # Bind to all interfaces
//! climate-facets serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness and catalog size
//! - `GET /api/catalog` - All layers and the facet domains
//! - `GET /api/options?<controls>[&page=]` - Normalized selection and selectable values
//! - `GET /api/layer?<controls>[&page=]` - The single matching layer, or `null`
//! - `GET /api/grid/{page}?<controls>` - Every cell of a grid page

pub mod server;
