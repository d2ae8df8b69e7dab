//! # Hot Coffee API
//!
//! HTTP server for the coffee-shop ordering backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Services                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  OrderService  │  │  MenuService   │  │  InventoryService          ││
//! │  │                │  │                │  │                            ││
//! │  │ • create       │  │ • create       │  │ • create / update          ││
//! │  │ • update       │  │ • update       │  │ • adjust (restock)         ││
//! │  │ • close        │  │ • delete       │  │ • delete                   ││
//! │  │ • delete       │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │ hotcoffee-db │  │ TraceLayer   │  │ HealthService            ││  │
//! │  │  │ SQLite pool  │  │ request_id   │  │ GET /health              ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_ADDR` - listen address (default: 0.0.0.0:8080)
//! - `DATABASE_PATH` - SQLite file (default: ./hotcoffee.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `REQUEST_TIMEOUT_MS` - per-call budget (default: 3000)
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `RUST_LOG` - tracing filter (default: info)

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

// Re-exports
pub use config::{ApiConfig, ConfigError, LogFormat};
pub use error::{ServiceError, ServiceResult};
pub use routes::build_router;
pub use state::AppState;
