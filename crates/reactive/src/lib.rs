//! Vitrine Reactive - Observable values for the Vitrine catalog.
//!
//! This crate implements the explicit subscription model the catalog pipeline
//! is built on. A consumer registers a callback, receives the current value
//! synchronously on subscribe, and is unsubscribed when its handle is dropped.
//!
//! # Core Concepts
//!
//! - `Observable`: a shared value cell with replay-on-subscribe
//! - `Subscription`: a scope-bound registration, released on drop
//! - `switch_map`: follows the source selected for the latest key, dropping
//!   superseded sources
//!
//! # Example
//!
//! ```
//! use vitrine_reactive::{switch_map, Observable};
//!
//! let query: Observable<Option<String>> = Observable::with_value(None);
//! let everything = Observable::with_value(vec!["lamp", "desk"]);
//! let lamps = Observable::with_value(vec!["lamp"]);
//!
//! let (all, some) = (everything.clone(), lamps.clone());
//! let results = switch_map(&query, move |q: &Option<String>| match q {
//!     Some(_) => some.clone(),
//!     None => all.clone(),
//! });
//!
//! assert_eq!(results.output().get(), Some(vec!["lamp", "desk"]));
//! query.set(Some("lamp".into()));
//! assert_eq!(results.output().get(), Some(vec!["lamp"]));
//! ```

pub mod observable;
pub mod subscription;
pub mod switch;

pub use observable::{Observable, WeakObservable};
pub use subscription::{Callback, Subscription, SubscriptionId};
pub use switch::{switch_map, SwitchMap};
