//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod email;
pub mod title;
pub mod body;
pub mod tag;
pub mod member;
pub mod vote;
pub mod search;
pub mod pagination;

pub use validation::ValidationError;
pub use email::Email;
pub use title::Title;
pub use body::Body;
pub use tag::TagName;
pub use member::{Badge, Role};
pub use vote::{VoteDirection, VoteState, VoteTransition};
pub use search::{like_pattern, search_term};
pub use pagination::{Pagination, Paginated, PaginationParams};
