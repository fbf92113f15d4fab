/// surfsup_service: read-only JSON API over the Hawaii climate dataset.
///
/// # Module structure
///
/// ```text
/// surfsup_service
/// ├── model     - row and response types (Measurement, Station, TemperatureStats, …)
/// ├── error     - StoreError / ServiceError and their HTTP status mapping
/// ├── anchor    - anchor-date strategy and the trailing 365-day window
/// ├── store     - WeatherStore / StoreSource traits
/// │   ├── postgres - per-request PostgreSQL connection
/// │   └── memory   - shared in-process rows
/// ├── service   - QueryService: one method per route
/// ├── endpoint  - tiny_http server, routing, worker pool
/// ├── config    - surfsup.toml loader
/// └── db        - DATABASE_URL handling and startup table checks
/// ```

/// Public modules
pub mod anchor;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod service;
pub mod store;
