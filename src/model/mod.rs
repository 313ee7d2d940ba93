//! Catalog entities.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → *Payload (all fields optional on the wire)
//!     → into_new / into_changes (validation, before any storage access)
//!     → NewCategory / NewBike / *Changes
//!     → store
//!     → Category / Bike rows
//!     → Category (serialized as is) / BikeView (category by name)
//! ```

pub mod bike;
pub mod category;
pub mod validation;

pub use bike::{Bike, BikeChanges, BikePayload, BikeView, NewBike};
pub use category::{Category, CategoryChanges, CategoryPayload, NewCategory};
pub use validation::{FieldError, ValidationErrors};
