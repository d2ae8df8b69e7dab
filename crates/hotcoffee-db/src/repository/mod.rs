//! # Repository Module
//!
//! Database repository implementations for Hot Coffee.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository Per Component                         │
//! │                                                                         │
//! │  HTTP service                                                          │
//! │       │                                                                 │
//! │       │  db.orders().create(&request)                                  │
//! │       ▼                                                                 │
//! │  OrderRepository  (order engine)                                       │
//! │  ├── list / get / create / update / delete / close                     │
//! │  │       │                                                              │
//! │  │       ├──► menu::load_many_in()        same transaction             │
//! │  │       └──► inventory::apply_delta()    same transaction             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Public methods own their transaction. The `pub(crate)` `*_in` helpers
//! take a `&mut SqliteConnection` so the order engine can compose them
//! inside one transaction.
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`](menu::MenuRepository) - Menu catalog
//! - [`InventoryRepository`](inventory::InventoryRepository) - Inventory ledger
//! - [`OrderRepository`](order::OrderRepository) - Order engine

pub mod inventory;
pub mod menu;
pub mod order;
