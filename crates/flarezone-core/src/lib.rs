// # flarezone-core
//
// Client-side object model over a DNS hosting provider's zone and host APIs.
//
// ## Architecture Overview
//
// - **ZoneService** / **HostService**: traits for the remote APIs; one
//   blocking round trip per call, no retries
// - **ServiceFactory**: builds services from configuration and credentials
// - **Account** → **Zone** → {**ZoneSettings**, **Record**}: domain objects that
//   fetch lazily, cache what they fetch and stage local edits until saved
// - **Cached** / **CacheHandle**: memoized slots with explicit invalidation
// - **Paginator**: lazy walk over paginated listings
//
// ## Design Principles
//
// 1. **Explicit attributes**: provider fields are read with `get` and written
//    with `set`; unknown names are rejected before any network call
// 2. **Invalidate, don't patch**: mutations clear the parent's cache, the next
//    read fetches again
// 3. **Non-owning back-references**: children reach parent caches through
//    weak handles
// 4. **Single-threaded**: the object graph is `!Send`; callers serialize access

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod paginator;
pub mod traits;

// Re-export core types for convenience
pub use cache::{CacheHandle, Cached};
pub use config::{Credentials, ServiceConfig};
pub use error::{Error, Result};
pub use model::{
    Account, NewRecord, Record, RecordIndex, SettingDescriptor, Zone, ZoneSettings,
};
pub use paginator::{Page, Paginator};
pub use traits::{
    Fields, HostService, NewUser, NewZone, Profile, ServiceFactory, SettingUpdate, UserQuery,
    ZoneService,
};
