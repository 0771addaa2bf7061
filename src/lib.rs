//! Segment-trie HTTP route matcher.
//!
//! Routes are templates of literal segments, `{name}` parameters,
//! trailing `{...name}` catch-alls, and mixed segments such as `@{user}`
//! or `{id},name={name}.txt` that match through an anchored regex. A
//! route may be scoped to a hostname, which itself may carry `{name}`
//! placeholders. Matching precedence at every depth is
//! literal > parameter > catch-all, and fully literal routes are served
//! from a flat fast-path table without walking the trie.
//!
//! ```
//! use trellis_router::{RouteMatch, Router};
//!
//! let mut router = Router::new();
//! router.add_route("GET", "/users/{id}", "show-user", None);
//!
//! match router.find_route("GET", "/users/42", None) {
//!     RouteMatch::Found(matched) => {
//!         assert_eq!(*matched.data, "show-user");
//!         assert_eq!(matched.params.unwrap()["id"], "42");
//!     }
//!     _ => panic!("expected a match"),
//! }
//! ```
//!
//! The router is built once and then read: `find_route` takes `&self`,
//! so a fully registered router can be shared across threads without
//! further synchronization.

mod router;
mod segment;
mod tree;

pub use router::{MatchedRoute, RouteMatch, Router};
