pub mod controller;
pub mod debounce;
pub mod ip_range;
pub mod paginate;
pub mod predicate;
pub mod sort;
