//! Domain value objects.

mod product_filter;

pub use product_filter::{ProductFilter, SortDirection, SortField};
