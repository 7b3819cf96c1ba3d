//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the engine core and an
//! external system (time, the generative draft backend, the document
//! store, IDs, randomness). Implementations live in `src/adapters/`.

pub mod clock;
pub mod draft;
pub mod id_gen;
pub mod rng;
pub mod store;

pub use clock::Clock;
pub use draft::{DraftFuture, DraftRequest, DraftSource};
pub use id_gen::IdGenerator;
pub use rng::Randomness;
pub use store::{DocumentStore, Expected, RawDocument, StoreError};
